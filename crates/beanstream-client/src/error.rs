//! Beanstream client error types.

use beanstream_core::ResponseError;

use crate::config::ConfigError;

/// Errors from the SOAP transport. Nothing here is retried by the client.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Connection, TLS or body-read failure.
    #[error("HTTP error calling {operation}: {source}")]
    Http {
        operation: String,
        source: reqwest::Error,
    },
    /// The request exceeded the configured timeout.
    #[error("{operation} timed out after {timeout_secs}s")]
    Timeout {
        operation: String,
        timeout_secs: u64,
    },
    /// Non-2xx status without a SOAP fault in the body.
    #[error("{operation} returned HTTP {status}: {body}")]
    Status {
        operation: String,
        status: u16,
        body: String,
    },
    /// The gateway answered with a SOAP fault.
    #[error("SOAP fault from {operation}: {code}: {message}")]
    Fault {
        operation: String,
        code: String,
        message: String,
    },
    /// The SOAP envelope could not be decoded.
    #[error("invalid SOAP envelope: {0}")]
    Envelope(String),
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

/// Top-level error for a transaction call.
#[derive(Debug, thiserror::Error)]
pub enum BeanstreamError {
    /// The remote call failed.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The response could not be interpreted.
    #[error(transparent)]
    Response(#[from] ResponseError),
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}
