use serde::Deserialize;

/// Client settings, typically loaded from the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub access_key: String,
    /// Use `https`. Only paid plans may do so; the API answers
    /// `https_access_restricted` otherwise.
    pub secure: bool,
    /// Log request URLs (key redacted) and response headers.
    pub debug: bool,
    /// Replacement for `http(s)://api.ipstack.com`, e.g. a local proxy.
    pub endpoint: Option<String>,
}

impl ClientConfig {
    /// Read `IPSTACK_ACCESS_KEY`, `IPSTACK_SECURE`, `IPSTACK_DEBUG` and
    /// `IPSTACK_ENDPOINT`. Unset variables keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            access_key: var("IPSTACK_ACCESS_KEY").unwrap_or_default(),
            secure: var("IPSTACK_SECURE").is_some_and(|v| parse_flag(&v)),
            debug: var("IPSTACK_DEBUG").is_some_and(|v| parse_flag(&v)),
            endpoint: var("IPSTACK_ENDPOINT").filter(|v| !v.is_empty()),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}
