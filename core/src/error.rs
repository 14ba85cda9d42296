//! Error types for the ipstack client.
//!
//! # Design
//! API-reported failures keep their own type, `ApiError`, because the service
//! sends them in a JSON envelope that callers may want to inspect (kind, wire
//! code, message). Everything else that can go wrong during a lookup lands in
//! the crate-level `Error`: transport failures are passed through unchanged
//! and malformed bodies are reported as `Decode`, distinct from `Api`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::http::TransportError;

/// Errors returned by `IpstackClient` operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The API answered with an error envelope (`"success": false`).
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The transport could not complete the round trip.
    #[error("transport failed: {0}")]
    Transport(#[from] TransportError),

    /// The response body is not valid JSON or not shaped as expected.
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// An unrecognized symbolic error kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown error kind: {0}")]
pub struct UnknownErrorKind(pub String);

/// Symbolic error kinds reported by the ipstack API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ErrorKind {
    NotFound,
    MissingAccessKey,
    InvalidAccessKey,
    InactiveUser,
    InvalidApiFunction,
    UsageLimitReached,
    FunctionAccessRestricted,
    HttpsAccessRestricted,
    InvalidFields,
    TooManyIps,
    BatchNotSupportedOnPlan,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 11] = [
        ErrorKind::NotFound,
        ErrorKind::MissingAccessKey,
        ErrorKind::InvalidAccessKey,
        ErrorKind::InactiveUser,
        ErrorKind::InvalidApiFunction,
        ErrorKind::UsageLimitReached,
        ErrorKind::FunctionAccessRestricted,
        ErrorKind::HttpsAccessRestricted,
        ErrorKind::InvalidFields,
        ErrorKind::TooManyIps,
        ErrorKind::BatchNotSupportedOnPlan,
    ];

    /// The string the API uses for this kind in the `type` field.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::NotFound => "404_not_found",
            ErrorKind::MissingAccessKey => "missing_access_key",
            ErrorKind::InvalidAccessKey => "invalid_access_key",
            ErrorKind::InactiveUser => "inactive_user",
            ErrorKind::InvalidApiFunction => "invalid_api_function",
            ErrorKind::UsageLimitReached => "usage_limit_reached",
            ErrorKind::FunctionAccessRestricted => "function_access_restricted",
            ErrorKind::HttpsAccessRestricted => "https_access_restricted",
            ErrorKind::InvalidFields => "invalid_fields",
            ErrorKind::TooManyIps => "too_many_ips",
            ErrorKind::BatchNotSupportedOnPlan => "batch_not_supported_on_plan",
        }
    }

    /// The documented numeric code for this kind.
    ///
    /// Several kinds share a code (both access-key kinds are 101, both
    /// restriction kinds are 105), so the kind is the discriminator to match
    /// on. Codes parsed off the wire are kept as sent; this table is only
    /// used for errors raised locally.
    pub fn code(self) -> i32 {
        match self {
            ErrorKind::NotFound => 404,
            ErrorKind::MissingAccessKey | ErrorKind::InvalidAccessKey => 101,
            ErrorKind::InactiveUser => 102,
            ErrorKind::InvalidApiFunction => 103,
            ErrorKind::UsageLimitReached => 104,
            ErrorKind::FunctionAccessRestricted | ErrorKind::HttpsAccessRestricted => 105,
            ErrorKind::InvalidFields => 301,
            ErrorKind::TooManyIps => 302,
            ErrorKind::BatchNotSupportedOnPlan => 303,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorKind {
    type Err = UnknownErrorKind;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        // "not_found" is how the kind is usually written in the docs.
        if s == "not_found" {
            return Ok(ErrorKind::NotFound);
        }
        ErrorKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownErrorKind(s.to_string()))
    }
}

impl TryFrom<String> for ErrorKind {
    type Error = UnknownErrorKind;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ErrorKind> for String {
    fn from(kind: ErrorKind) -> Self {
        kind.as_str().to_string()
    }
}

/// The `error` object of an API error envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub code: i32,
    #[serde(rename = "type")]
    pub kind: ErrorKind,
    #[serde(default)]
    pub info: String,
}

/// An error reported by the ipstack API.
///
/// `success` is `Some(false)` for every error this crate hands out; the field
/// is kept tri-state because that is how the envelope is shaped on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub success: Option<bool>,
    pub error: ErrorDetail,
}

impl ApiError {
    /// Build an error locally, taking the code from the kind table.
    pub fn new(kind: ErrorKind, info: impl Into<String>) -> Self {
        Self {
            success: Some(false),
            error: ErrorDetail {
                code: kind.code(),
                kind,
                info: info.into(),
            },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.error.kind
    }

    pub fn code(&self) -> i32 {
        self.error.code
    }

    pub fn info(&self) -> &str {
        &self.error.info
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error.code, self.error.info)
    }
}

impl std::error::Error for ApiError {}
