//! In-process stand-in for the ipstack lookup API.
//!
//! Speaks the same wire format as the real service: every answer is a 200
//! with a JSON body, errors use the `{"success": false, "error": {..}}`
//! envelope, and the time zone, currency, connection and security modules
//! only appear when the configured plan includes them.

use std::{collections::HashMap, net::IpAddr, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use log::debug;
use serde_json::{json, Map, Value};
use tokio::net::TcpListener;

/// Subscription plans, from least to most capable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Plan {
    Free,
    Basic,
    Professional,
}

#[derive(Clone, Debug)]
pub struct MockConfig {
    pub access_key: String,
    pub plan: Plan,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            access_key: "test-key".to_string(),
            plan: Plan::Professional,
        }
    }
}

type Shared = Arc<MockConfig>;

const TOP_LEVEL_FIELDS: &[&str] = &[
    "ip",
    "hostname",
    "type",
    "continent_code",
    "continent_name",
    "country_code",
    "country_name",
    "region_code",
    "region_name",
    "city",
    "zip",
    "latitude",
    "longitude",
    "location",
    "time_zone",
    "currency",
    "connection",
    "security",
];

const SUPPORTED_LANGUAGES: &[&str] = &["en", "de", "es", "fr", "ja", "ru", "zh", "pt-br"];

pub fn app() -> Router {
    app_with(MockConfig::default())
}

pub fn app_with(config: MockConfig) -> Router {
    Router::new()
        .route("/{target}", get(lookup))
        .route("/moved/{target}", get(moved))
        .with_state(Arc::new(config))
}

pub async fn run_with(listener: TcpListener, config: MockConfig) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(config)).await
}

/// Build an error envelope the way the API does.
pub fn error_body(code: u16, kind: &str, info: &str) -> Value {
    json!({
        "success": false,
        "error": { "code": code, "type": kind, "info": info }
    })
}

async fn lookup(
    State(config): State<Shared>,
    Path(target): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    debug!("lookup {target} params={:?}", params.keys().collect::<Vec<_>>());
    Json(answer(&config, &target, &params).unwrap_or_else(|err| err))
}

/// Always redirects; used to check that clients do not follow redirects.
async fn moved(Path(target): Path<String>) -> impl IntoResponse {
    (
        StatusCode::MOVED_PERMANENTLY,
        [(header::LOCATION, format!("/{target}"))],
    )
}

fn answer(config: &MockConfig, target: &str, params: &HashMap<String, String>) -> Result<Value, Value> {
    match params.get("access_key").map(String::as_str) {
        None | Some("") => {
            return Err(error_body(101, "missing_access_key", "You have not supplied an API Access Key."))
        }
        Some(key) if key != config.access_key => {
            return Err(error_body(101, "invalid_access_key", "You have not supplied a valid API Access Key."))
        }
        Some(_) => {}
    }

    let fields = params.get("fields").map(|f| parse_fields(f)).transpose()?;

    if let Some(lang) = params.get("language") {
        if !SUPPORTED_LANGUAGES.contains(&lang.as_str()) {
            return Err(error_body(
                103,
                "invalid_api_function",
                "The requested language is not supported.",
            ));
        }
    }

    let security = flag(params, "security");
    if security && config.plan < Plan::Professional {
        return Err(error_body(
            105,
            "function_access_restricted",
            "The current subscription plan does not support the security module.",
        ));
    }

    let ip = resolve(target)
        .ok_or_else(|| error_body(404, "404_not_found", "The requested resource does not exist."))?;

    let mut record = record_for(ip);
    if flag(params, "hostname") {
        record.insert("hostname".to_string(), hostname_for(ip));
    }
    if config.plan >= Plan::Basic {
        record.insert("time_zone".to_string(), time_zone_for(ip));
        record.insert("currency".to_string(), currency_for(ip));
        record.insert("connection".to_string(), connection_for(ip));
    }
    if security {
        record.insert("security".to_string(), security_for(ip));
    }

    let record = match fields {
        Some(fields) => select(record, &fields),
        None => record,
    };
    Ok(Value::Object(record))
}

fn flag(params: &HashMap<String, String>, name: &str) -> bool {
    params.get(name).is_some_and(|v| v == "1")
}

fn parse_fields(raw: &str) -> Result<Vec<String>, Value> {
    let fields: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .collect();
    let valid = fields.iter().all(|f| {
        let top = f.split('.').next().unwrap_or_default();
        TOP_LEVEL_FIELDS.contains(&top)
    });
    if fields.is_empty() || !valid {
        return Err(error_body(
            301,
            "invalid_fields",
            "One or more invalid fields were specified using the fields parameter.",
        ));
    }
    Ok(fields)
}

/// Keep only the requested fields; `parent.child` keeps one nested key.
fn select(record: Map<String, Value>, fields: &[String]) -> Map<String, Value> {
    let mut out = Map::new();
    for field in fields {
        match field.split_once('.') {
            None => {
                if let Some(value) = record.get(field) {
                    out.insert(field.clone(), value.clone());
                }
            }
            Some((parent, child)) => {
                let Some(value) = record.get(parent).and_then(|p| p.get(child)) else {
                    continue;
                };
                let entry = out
                    .entry(parent.to_string())
                    .or_insert_with(|| Value::Object(Map::new()));
                if let Value::Object(map) = entry {
                    map.insert(child.to_string(), value.clone());
                }
            }
        }
    }
    out
}

fn resolve(target: &str) -> Option<IpAddr> {
    if let Ok(ip) = target.parse() {
        return Some(ip);
    }
    match target {
        "ipstack.com" => "134.201.250.155".parse().ok(),
        "dns.google" => "8.8.8.8".parse().ok(),
        _ => None,
    }
}

fn record_for(ip: IpAddr) -> Map<String, Value> {
    let kind = if ip.is_ipv4() { "ipv4" } else { "ipv6" };
    let value = match ip.to_string().as_str() {
        "134.201.250.155" => json!({
            "ip": "134.201.250.155",
            "hostname": null,
            "type": kind,
            "continent_code": "NA",
            "continent_name": "North America",
            "country_code": "US",
            "country_name": "United States",
            "region_code": "CA",
            "region_name": "California",
            "city": "Los Angeles",
            "zip": "90013",
            "latitude": 34.0453,
            "longitude": -118.2413,
            "location": {
                "geoname_id": 5368361,
                "capital": "Washington D.C.",
                "languages": [{ "code": "en", "name": "English", "native": "English" }],
                "country_flag": "https://assets.ipstack.com/flags/us.svg",
                "country_flag_emoji": "🇺🇸",
                "country_flag_emoji_unicode": "U+1F1FA U+1F1F8",
                "calling_code": "1",
                "is_eu": false
            }
        }),
        "8.8.8.8" => json!({
            "ip": "8.8.8.8",
            "hostname": null,
            "type": kind,
            "continent_code": "NA",
            "continent_name": "North America",
            "country_code": "US",
            "country_name": "United States",
            "region_code": "OH",
            "region_name": "Ohio",
            "city": "Glenmont",
            "zip": "44628",
            "latitude": 40.5369,
            "longitude": -82.1286,
            "location": {
                "geoname_id": null,
                "capital": "Washington D.C.",
                "languages": [{ "code": "en", "name": "English", "native": "English" }],
                "country_flag": "https://assets.ipstack.com/flags/us.svg",
                "country_flag_emoji": "🇺🇸",
                "country_flag_emoji_unicode": "U+1F1FA U+1F1F8",
                "calling_code": "1",
                "is_eu": false
            }
        }),
        // Unknown addresses come back with every geolocation field null.
        other => json!({
            "ip": other,
            "hostname": null,
            "type": kind,
            "continent_code": null,
            "continent_name": null,
            "country_code": null,
            "country_name": null,
            "region_code": null,
            "region_name": null,
            "city": null,
            "zip": null,
            "latitude": 0.0,
            "longitude": 0.0,
            "location": {
                "geoname_id": null,
                "capital": null,
                "languages": [],
                "country_flag": null,
                "country_flag_emoji": null,
                "country_flag_emoji_unicode": null,
                "calling_code": null,
                "is_eu": null
            }
        }),
    };
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn hostname_for(ip: IpAddr) -> Value {
    match ip.to_string().as_str() {
        "8.8.8.8" => json!("dns.google"),
        "134.201.250.155" => json!("134.201.250.155"),
        _ => Value::Null,
    }
}

fn time_zone_for(_ip: IpAddr) -> Value {
    json!({
        "id": "America/Los_Angeles",
        "current_time": "2018-03-29T07:35:08-07:00",
        "gmt_offset": -25200,
        "code": "PDT",
        "is_daylight_saving": true
    })
}

fn currency_for(_ip: IpAddr) -> Value {
    json!({
        "code": "USD",
        "name": "US Dollar",
        "plural": "US dollars",
        "symbol": "$",
        "symbol_native": "$"
    })
}

fn connection_for(ip: IpAddr) -> Value {
    match ip.to_string().as_str() {
        "8.8.8.8" => json!({ "asn": 15169, "isp": "Google LLC" }),
        _ => json!({ "asn": 25876, "isp": "Los Angeles Department of Water & Power" }),
    }
}

fn security_for(ip: IpAddr) -> Value {
    let tor_exit = ip.to_string() == "185.220.101.1";
    let (proxy_type, threat_level, threat_types) = if tor_exit {
        (json!("tor"), "high", json!(["tor", "anonymization"]))
    } else {
        (Value::Null, "low", Value::Null)
    };
    json!({
        "is_proxy": tor_exit,
        "proxy_type": proxy_type,
        "is_crawler": false,
        "crawler_name": null,
        "crawler_type": null,
        "is_tor": tor_exit,
        "threat_level": threat_level,
        "threat_types": threat_types
    })
}
