//! Error types for the blog facade.
//!
//! # Design
//! Three failure classes stay separate so callers can tell them apart:
//! `ConstructionError` happens once, when the adapter is built;
//! `RemoteError` is whatever a single remote call failed with and is handed
//! back verbatim; `NotImplemented` is raised by placeholder operations before
//! any network interaction. `Error` unifies them for callers who just want `?`.

use thiserror::Error;

use crate::facade::Operation;

/// Failure building the remote client or binding the facade.
#[derive(Debug, Error)]
pub enum ConstructionError {
    /// The blog identifier was empty or whitespace.
    #[error("invalid blog identifier: {0:?}")]
    InvalidBlogIdentifier(String),

    /// A credential required by the adapter was empty.
    #[error("missing credential: {0}")]
    MissingCredential(&'static str),

    /// The configured base URL is not usable.
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),

    /// The underlying HTTP client could not be built.
    #[error("http client construction failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Failure returned by the remote client for one call.
///
/// `Clone + PartialEq` so a failure can be compared against the exact value
/// an adapter produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// 401 or 403: credentials rejected or missing.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// 404: blog or post does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// 429: the service is throttling this consumer.
    #[error("rate limit exceeded")]
    RateLimited,

    /// Any other non-2xx status.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The request never produced a response (DNS, TLS, timeout, ...).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The response body did not match the expected shape.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request parameters could not be encoded.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl RemoteError {
    /// Classify a non-success status code.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        match status {
            401 | 403 => Self::Unauthorized(message.into()),
            404 => Self::NotFound(message.into()),
            429 => Self::RateLimited,
            _ => Self::Status {
                status,
                message: message.into(),
            },
        }
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Raised synchronously by operations that are declared but not backed yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{} is not implemented yet", .operation.name())]
pub struct NotImplemented {
    pub operation: Operation,
}

/// Any error the crate can produce.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Construction(#[from] ConstructionError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    NotImplemented(#[from] NotImplemented),
}
