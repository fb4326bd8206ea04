//! Error types for Warda
//!
//! This module defines the error taxonomy of the client data layer using
//! `thiserror`. A single API call ends in exactly one of three disjoint
//! failures ([`ApiError::Network`], [`ApiError::Server`], [`ApiError::Parse`]);
//! application plumbing (configuration, CLI) wraps them in [`WardaError`].

use thiserror::Error;

/// Structural problems with a nominally successful response body
///
/// Field paths use dotted/indexed notation, e.g. `timeline[2].emotion`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Body is not valid JSON, or has the wrong top-level shape
    #[error("malformed response body: {0}")]
    Malformed(String),

    /// A required field is absent
    #[error("missing field `{0}`")]
    MissingField(String),

    /// A required field is present but has the wrong type or value
    #[error("invalid field `{field}`: expected {expected}")]
    InvalidField {
        /// Path of the offending field
        field: String,
        /// Human readable description of the expected value
        expected: String,
    },
}

impl ParseError {
    /// Path of the field this error refers to, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            ParseError::Malformed(_) => None,
            ParseError::MissingField(field) => Some(field),
            ParseError::InvalidField { field, .. } => Some(field),
        }
    }
}

/// Terminal outcome of a failed API call
///
/// The variants never overlap: a transport failure is never reported as a
/// server error, and an unusable 2xx body is never reported as either.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Transport-level failure (DNS, connection refused, timeout, broken stream)
    #[error("Network error: {0}")]
    Network(String),

    /// Reachable server rejected the request with a non-2xx status
    #[error("Server error ({status}): {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// `detail` from the error body, or "Unknown error"
        message: String,
    },

    /// 2xx response whose body could not be decoded
    #[error("Response parsing error: {0}")]
    Parse(#[from] ParseError),
}

impl ApiError {
    /// Returns true for transport failures
    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }

    /// Returns true for non-2xx responses
    pub fn is_server(&self) -> bool {
        matches!(self, ApiError::Server { .. })
    }

    /// Returns true for undecodable 2xx responses
    pub fn is_parse(&self) -> bool {
        matches!(self, ApiError::Parse(_))
    }

    /// HTTP status of a server error
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Network(err.to_string())
    }
}

/// Failures of session segmentation under the strict timestamp policy
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SegmentError {
    /// A message carried a timestamp that could not be parsed
    #[error("unparseable timestamp {timestamp:?} on message {id}")]
    UnparseableTimestamp {
        /// Message id
        id: i64,
        /// Raw timestamp text
        timestamp: String,
    },
}

/// Application-level error type
///
/// Wraps the core errors together with configuration and I/O failures
/// raised by the CLI layer.
#[derive(Error, Debug)]
pub enum WardaError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A call against the backend failed
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Session segmentation failed
    #[error("Segmentation error: {0}")]
    Segment(#[from] SegmentError),

    /// Operation needs a user id but none was supplied
    #[error("No user id available; pass --user-id or set WARDA_USER_ID")]
    MissingUserId,

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for application plumbing
///
/// Uses `anyhow::Error` so the CLI can attach context freely; the data
/// layer itself returns [`ApiResult`].
pub type Result<T> = anyhow::Result<T>;

/// Result of a single API call
pub type ApiResult<T> = std::result::Result<T, ApiError>;
