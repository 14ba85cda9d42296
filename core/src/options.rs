//! Per-lookup request parameters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

/// Output languages supported by the `language` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResponseLanguage {
    #[serde(rename = "en")]
    English,
    #[serde(rename = "de")]
    German,
    #[serde(rename = "es")]
    Spanish,
    #[serde(rename = "fr")]
    French,
    #[serde(rename = "ja")]
    Japanese,
    #[serde(rename = "ru")]
    Russian,
    #[serde(rename = "zh")]
    Chinese,
    #[serde(rename = "pt-br")]
    PortugueseBrazil,
}

impl ResponseLanguage {
    pub const ALL: [ResponseLanguage; 8] = [
        ResponseLanguage::English,
        ResponseLanguage::German,
        ResponseLanguage::Spanish,
        ResponseLanguage::French,
        ResponseLanguage::Japanese,
        ResponseLanguage::Russian,
        ResponseLanguage::Chinese,
        ResponseLanguage::PortugueseBrazil,
    ];

    pub fn code(self) -> &'static str {
        match self {
            ResponseLanguage::English => "en",
            ResponseLanguage::German => "de",
            ResponseLanguage::Spanish => "es",
            ResponseLanguage::French => "fr",
            ResponseLanguage::Japanese => "ja",
            ResponseLanguage::Russian => "ru",
            ResponseLanguage::Chinese => "zh",
            ResponseLanguage::PortugueseBrazil => "pt-br",
        }
    }
}

impl fmt::Display for ResponseLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported response language: {0}")]
pub struct UnknownLanguage(pub String);

impl FromStr for ResponseLanguage {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResponseLanguage::ALL
            .into_iter()
            .find(|lang| lang.code().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownLanguage(s.to_string()))
    }
}

/// Optional parameters for a single lookup. Unset fields add nothing to the
/// query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupOptions {
    /// Comma-separated output fields, e.g. `"ip,country_code,location.capital"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<String>,
    /// Ask the API to resolve the hostname of the address.
    #[serde(default)]
    pub hostname: bool,
    /// Include the security module (plan permitting).
    #[serde(default)]
    pub security: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<ResponseLanguage>,
}

impl LookupOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields(mut self, fields: impl Into<String>) -> Self {
        self.fields = Some(fields.into());
        self
    }

    pub fn hostname(mut self, enabled: bool) -> Self {
        self.hostname = enabled;
        self
    }

    pub fn security(mut self, enabled: bool) -> Self {
        self.security = enabled;
        self
    }

    pub fn language(mut self, language: ResponseLanguage) -> Self {
        self.language = Some(language);
        self
    }

    /// Append the query parameters these options ask for.
    pub(crate) fn apply(&self, url: &mut Url) {
        let mut query = url.query_pairs_mut();
        if self.hostname {
            query.append_pair("hostname", "1");
        }
        if self.security {
            query.append_pair("security", "1");
        }
        if let Some(language) = self.language {
            query.append_pair("language", language.code());
        }
        if let Some(fields) = self.fields.as_deref().filter(|f| !f.is_empty()) {
            query.append_pair("fields", fields);
        }
    }
}
