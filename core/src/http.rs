//! HTTP transport types and the pluggable `Transport` capability.
//!
//! # Design
//! Requests and responses are plain data. The client builds an `HttpRequest`,
//! hands it to whatever `Transport` it was configured with, and parses the
//! returned `HttpResponse`. Tests substitute a fake transport; production
//! code uses `UreqTransport` (behind the default `http` feature).
//!
//! A transport must return every response it receives as data, whatever the
//! status code. Only failures to complete the round trip (DNS, connect, TLS,
//! timeouts) are `TransportError`s.

use std::fmt;

/// An HTTP GET request described as plain data.
///
/// Every ipstack lookup is a GET, so no method or body is carried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

/// An HTTP response described as plain data. The body is read in full once,
/// as raw bytes; decoding it is left to the client.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

/// A transport-level failure, surfaced to the caller unchanged.
#[derive(Debug)]
pub struct TransportError(Box<dyn std::error::Error + Send + Sync>);

impl TransportError {
    pub fn new(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self(err.into())
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(&*self.0)
    }
}

/// Sends one request and returns one response.
///
/// Implementations must be safe to share between threads; the client holds
/// its transport behind an `Arc` and lookups may run concurrently.
pub trait Transport: Send + Sync {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[cfg(feature = "http")]
pub use self::ureq_transport::{Timeouts, UreqTransport};

#[cfg(feature = "http")]
mod ureq_transport {
    use std::time::Duration;

    use super::{HttpRequest, HttpResponse, Transport, TransportError};

    /// Per-phase and overall timeouts for `UreqTransport`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Timeouts {
        pub connect: Duration,
        pub response_header: Duration,
        pub global: Duration,
    }

    impl Default for Timeouts {
        fn default() -> Self {
            Self {
                connect: Duration::from_secs(10),
                response_header: Duration::from_secs(10),
                global: Duration::from_secs(60),
            }
        }
    }

    /// Blocking transport backed by a ureq agent.
    ///
    /// Redirects are not followed: a 3xx comes back as the response. Non-2xx
    /// statuses are returned as data so the client can read the API's error
    /// envelope.
    #[derive(Clone)]
    pub struct UreqTransport {
        agent: ureq::Agent,
    }

    impl std::fmt::Debug for UreqTransport {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("UreqTransport").finish_non_exhaustive()
        }
    }

    impl UreqTransport {
        pub fn new() -> Self {
            Self::with_timeouts(Timeouts::default())
        }

        pub fn with_timeouts(timeouts: Timeouts) -> Self {
            // TLS handshakes count against the connect phase in ureq.
            let agent = ureq::Agent::config_builder()
                .http_status_as_error(false)
                .max_redirects(0)
                .max_redirects_will_error(false)
                .timeout_resolve(Some(timeouts.connect))
                .timeout_connect(Some(timeouts.connect))
                .timeout_send_request(Some(timeouts.connect))
                .timeout_recv_response(Some(timeouts.response_header))
                .timeout_global(Some(timeouts.global))
                .build()
                .new_agent();
            Self { agent }
        }
    }

    impl Default for UreqTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Transport for UreqTransport {
        fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            let mut builder = self.agent.get(&request.url);
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            let mut response = builder.call().map_err(TransportError::new)?;

            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .map(|(name, value)| {
                    (
                        name.as_str().to_string(),
                        String::from_utf8_lossy(value.as_bytes()).into_owned(),
                    )
                })
                .collect();
            let body = response
                .body_mut()
                .read_to_vec()
                .map_err(TransportError::new)?;

            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        }
    }
}
