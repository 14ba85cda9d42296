//! Response DTOs for the ipstack lookup endpoint.
//!
//! # Design
//! Scalar fields fall back to their defaults when missing or `null`: the
//! `fields` filter trims the payload to a subset, and the live API sends
//! `null` for anything it does not know about an address.
//!
//! The plan-gated modules (time zone, currency, connection, security) are
//! `Option`s, so "not in this plan" stays distinguishable from "included but
//! empty".

use serde::{Deserialize, Deserializer, Serialize};

/// Deserialize `null` as `T::default()`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A successful lookup result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LookupResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub ip: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub hostname: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub ip_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub continent_code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub continent_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub country_code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub country_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub region_code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub region_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub city: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub zip: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub latitude: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub longitude: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: Location,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<TimeZone>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<Currency>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection: Option<Connection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security: Option<Security>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default, deserialize_with = "null_as_default")]
    pub geoname_id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub capital: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub languages: Vec<Language>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub country_flag: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub country_flag_emoji: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub country_flag_emoji_unicode: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub calling_code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_eu: bool,
}

/// A language spoken at the location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    #[serde(default, deserialize_with = "null_as_default")]
    pub code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub native: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeZone {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub current_time: String,
    /// Offset from GMT in seconds.
    #[serde(default, deserialize_with = "null_as_default")]
    pub gmt_offset: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_daylight_saving: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    #[serde(default, deserialize_with = "null_as_default")]
    pub code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub plural: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub symbol: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub symbol_native: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    #[serde(default, deserialize_with = "null_as_default")]
    pub asn: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub isp: String,
}

/// The security module. Only returned when requested with `security=1` on
/// a plan that includes it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Security {
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_proxy: bool,
    #[serde(default)]
    pub proxy_type: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_crawler: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub crawler_name: String,
    #[serde(default)]
    pub crawler_type: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_tor: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub threat_level: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub threat_types: Vec<String>,
}
