//! Request building, dispatch and response disambiguation for the ipstack API.
//!
//! # Design
//! `IpstackClient` holds a base URL (with the access key already in its query
//! string), a shared `Transport` and a debug flag. None of it changes after
//! construction, so a client can be cloned or shared across threads freely.
//!
//! Like the other clients in this workspace, a lookup is split in two:
//! `build_lookup` produces an `HttpRequest` and `parse_lookup` consumes an
//! `HttpResponse`. `lookup` glues them together around `Transport::send`.
//! Callers doing their own I/O can use the halves directly.
//!
//! The API answers success and failure with the same JSON object; only
//! failures carry `"success": false`. `LookupResponse::from_body` decides
//! which one a body is.

use std::fmt;
use std::sync::Arc;

use log::debug;
use serde_json::{Map, Value};
use url::Url;

use crate::config::ClientConfig;
use crate::error::{ApiError, Error, ErrorDetail, ErrorKind, Result};
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::options::LookupOptions;
use crate::types::LookupResult;

pub const API_HOST: &str = "api.ipstack.com";

/// Maximum number of addresses the bulk endpoint accepts.
pub const MAX_BULK_ADDRESSES: usize = 50;

/// Placeholder written over the access key in debug output.
pub const REDACTED: &str = "hidden";

const LOG_TARGET: &str = "ipstack";
const ACCESS_KEY_PARAM: &str = "access_key";

/// Settings applied, in order, when a client is constructed.
#[derive(Clone)]
pub enum ClientOption {
    /// Send requests through this transport instead of the default one.
    Transport(Arc<dyn Transport>),
    /// Log outgoing URLs (access key redacted) and response headers.
    Debug(bool),
    /// Talk to this scheme, host and port (and path prefix) instead of the
    /// public API. The access key carries over.
    Endpoint(Url),
}

impl fmt::Debug for ClientOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientOption::Transport(_) => f.write_str("Transport(..)"),
            ClientOption::Debug(on) => f.debug_tuple("Debug").field(on).finish(),
            ClientOption::Endpoint(url) => f.debug_tuple("Endpoint").field(&url.as_str()).finish(),
        }
    }
}

/// Client for the ipstack lookup API.
#[derive(Clone)]
pub struct IpstackClient {
    transport: Arc<dyn Transport>,
    url: Url,
    debug: bool,
}

impl fmt::Debug for IpstackClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IpstackClient")
            .field("url", &redact_access_key(&self.url).as_str())
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}

impl IpstackClient {
    /// Create a client for `access_key`.
    ///
    /// `secure` selects `https`, which the API only allows on paid plans.
    /// An empty key fails immediately with a `missing_access_key` error; no
    /// request is made.
    pub fn new<I>(access_key: &str, secure: bool, options: I) -> Result<Self>
    where
        I: IntoIterator<Item = ClientOption>,
    {
        if access_key.is_empty() {
            let err = ApiError::new(ErrorKind::MissingAccessKey, "No API Key was specified.");
            return Err(err.into());
        }

        let scheme = if secure { "https" } else { "http" };
        let mut url = Url::parse(&format!("{scheme}://{API_HOST}/"))?;
        url.query_pairs_mut().append_pair(ACCESS_KEY_PARAM, access_key);

        let mut client = Self {
            transport: default_transport(),
            url,
            debug: false,
        };
        for option in options {
            client.apply(option)?;
        }
        Ok(client)
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let mut options = vec![ClientOption::Debug(config.debug)];
        if let Some(endpoint) = &config.endpoint {
            options.push(ClientOption::Endpoint(Url::parse(endpoint)?));
        }
        Self::new(&config.access_key, config.secure, options)
    }

    fn apply(&mut self, option: ClientOption) -> Result<()> {
        match option {
            ClientOption::Transport(transport) => self.transport = transport,
            ClientOption::Debug(on) => self.debug = on,
            ClientOption::Endpoint(mut endpoint) => {
                if endpoint.cannot_be_a_base() {
                    return Err(Error::Config(format!("endpoint cannot be a base URL: {endpoint}")));
                }
                endpoint.set_query(self.url.query());
                endpoint.set_fragment(None);
                self.url = endpoint;
            }
        }
        Ok(())
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// Build the GET request for looking up `address`.
    ///
    /// `address` may be an IPv4 or IPv6 literal or a domain name; the API
    /// resolves domains itself. Only the first entry of `params` is used.
    pub fn build_lookup(&self, address: &str, params: &[LookupOptions]) -> Result<HttpRequest> {
        Ok(get_request(self.lookup_url(address, params)?))
    }

    /// Interpret a lookup response body. The status code is not consulted:
    /// the API reports errors in the body, usually with a 200.
    pub fn parse_lookup(&self, response: HttpResponse) -> Result<LookupResult> {
        LookupResponse::from_body(&response.body)?.into_result()
    }

    /// Look up the data behind an address with a single GET.
    ///
    /// There is no retry; transport failures, API errors and malformed
    /// bodies are all returned as-is.
    pub fn lookup(&self, address: &str, params: &[LookupOptions]) -> Result<LookupResult> {
        let url = self.lookup_url(address, params)?;
        if self.debug {
            debug!(target: LOG_TARGET, "HTTP request: {}", redact_access_key(&url));
        }

        let request = get_request(url);
        let response = self.transport.send(&request)?;
        if self.debug {
            debug!(
                target: LOG_TARGET,
                "HTTP GET:{} header:{:?}", response.status, response.headers
            );
        }

        self.parse_lookup(response)
    }

    /// Look up several addresses in one call (at most `MAX_BULK_ADDRESSES`).
    ///
    /// Not implemented yet: always returns an empty list without sending
    /// anything.
    pub fn bulk_lookup(&self, addresses: &[&str]) -> Result<Vec<LookupResult>> {
        if self.debug {
            debug!(
                target: LOG_TARGET,
                "bulk lookup of {} addresses (limit {}) is not implemented, returning no results",
                addresses.len(),
                MAX_BULK_ADDRESSES
            );
        }
        Ok(Vec::new())
    }

    /// Look up the address the request originates from.
    ///
    /// Not implemented yet: always returns `LookupResult::default()` without
    /// sending anything.
    pub fn requester_lookup(&self) -> Result<LookupResult> {
        if self.debug {
            debug!(target: LOG_TARGET, "requester lookup is not implemented, returning an empty result");
        }
        Ok(LookupResult::default())
    }

    fn lookup_url(&self, address: &str, params: &[LookupOptions]) -> Result<Url> {
        let mut url = self.url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::Config(format!("endpoint cannot be a base URL: {}", self.url)))?
            .pop_if_empty()
            .push(address);
        if let Some(options) = params.first() {
            options.apply(&mut url);
        }
        Ok(url)
    }
}

fn get_request(url: Url) -> HttpRequest {
    HttpRequest {
        url: url.into(),
        headers: vec![("accept".to_string(), "application/json".to_string())],
    }
}

#[cfg(feature = "http")]
fn default_transport() -> Arc<dyn Transport> {
    Arc::new(crate::http::UreqTransport::new())
}

#[cfg(not(feature = "http"))]
fn default_transport() -> Arc<dyn Transport> {
    use crate::http::TransportError;

    struct Unconfigured;

    impl Transport for Unconfigured {
        fn send(&self, _request: &HttpRequest) -> std::result::Result<HttpResponse, TransportError> {
            Err(TransportError::new(
                "no transport configured: enable the `http` feature or pass ClientOption::Transport",
            ))
        }
    }

    Arc::new(Unconfigured)
}

/// Copy of `url` with the access key replaced by `REDACTED`.
pub fn redact_access_key(url: &Url) -> Url {
    let mut redacted = url.clone();
    if url.query().is_none() {
        return redacted;
    }
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(key, value)| {
            let value = if key == ACCESS_KEY_PARAM {
                REDACTED.to_string()
            } else {
                value.into_owned()
            };
            (key.into_owned(), value)
        })
        .collect();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted
}

/// A lookup body, decided to be either a result or an API error.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupResponse {
    Success(LookupResult),
    Failure(ApiError),
}

impl LookupResponse {
    /// Decide what `body` is.
    ///
    /// Only an explicit `"success": false` makes a failure; the `error`
    /// object is ignored otherwise. A failure whose `error` object is missing
    /// or carries an unknown `type` is a decoding error, as is any body that
    /// is not UTF-8 JSON or not a JSON object of the expected shape.
    pub fn from_body(body: &[u8]) -> std::result::Result<Self, serde_json::Error> {
        let mut object: Map<String, Value> = serde_json::from_slice(body)?;
        let success: Option<bool> = match object.remove("success") {
            Some(flag) => serde_json::from_value(flag)?,
            None => None,
        };
        let error = object.remove("error");
        if success == Some(false) {
            let detail: ErrorDetail = match error {
                Some(error) if !error.is_null() => serde_json::from_value(error)?,
                _ => return Err(serde::de::Error::missing_field("error")),
            };
            return Ok(LookupResponse::Failure(ApiError {
                success: Some(false),
                error: detail,
            }));
        }
        Ok(LookupResponse::Success(serde_json::from_value(Value::Object(object))?))
    }

    pub fn into_result(self) -> Result<LookupResult> {
        match self {
            LookupResponse::Success(result) => Ok(result),
            LookupResponse::Failure(err) => Err(Error::Api(err)),
        }
    }
}
