//! Error types

use thiserror::Error;

/// Core error types
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Chain {0} is not supported")]
    UnsupportedChain(u64),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Errors raised inside a bridge adapter
///
/// These never cross the `compare()` boundary: `BridgeAdapter::get_route`
/// turns every one of them into "no route".
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("HTTP request to {provider} failed: {message}")]
    Http { provider: String, message: String },

    #[error("{provider} did not answer within {timeout_ms}ms")]
    Timeout { provider: String, timeout_ms: u64 },

    #[error("{provider} returned HTTP {status}")]
    Status { provider: String, status: u16 },

    #[error("Malformed response from {provider}: {message}")]
    InvalidResponse { provider: String, message: String },

    #[error("{provider} has no route for this request")]
    NoRoute { provider: String },

    #[error("{provider} does not support {operation}")]
    Unsupported { provider: String, operation: String },
}

/// Health monitor errors
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("Monitoring is already running")]
    AlreadyRunning,

    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("Monitoring interval must be non-zero")]
    InvalidInterval,
}

/// Result type alias
pub type CoreResult<T> = Result<T, CoreError>;
pub type AdapterResult<T> = Result<T, AdapterError>;
pub type MonitorResult<T> = Result<T, MonitorError>;
