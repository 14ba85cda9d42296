//! Blocking client for the ipstack IP geolocation API.
//!
//! # Overview
//! Builds authenticated lookup URLs, sends them through a pluggable
//! `Transport`, and decodes the JSON answer into either a `LookupResult` or
//! a structured `ApiError`.
//!
//! # Design
//! - `IpstackClient` is immutable after construction and cheap to clone.
//! - Lookups are split into `build_lookup` and `parse_lookup` so the I/O
//!   boundary stays explicit; `lookup` runs both around the transport.
//! - Plan-gated response modules are `Option`s, never zero-valued structs.
//! - Debug output goes through the `log` facade with target `ipstack` and
//!   never contains the access key.
//! - Bulk and requester lookups are declared but not implemented yet; they
//!   return empty values without touching the network.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod options;
pub mod types;

pub use client::{redact_access_key, ClientOption, IpstackClient, LookupResponse};
pub use config::ClientConfig;
pub use error::{ApiError, Error, ErrorDetail, ErrorKind, Result, UnknownErrorKind};
pub use http::{HttpRequest, HttpResponse, Transport, TransportError};
#[cfg(feature = "http")]
pub use http::{Timeouts, UreqTransport};
pub use options::{LookupOptions, ResponseLanguage};
pub use types::{Connection, Currency, Language, Location, LookupResult, Security, TimeZone};
