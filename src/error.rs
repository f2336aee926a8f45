use thiserror::Error;

/// Configuration problems detected before any work starts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// A cost or metric lookup failed. These are logged and absorbed by the
/// collecting stages, never surfaced to the caller.
#[derive(Error, Debug)]
pub enum DataSourceError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{service} returned {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("unable to obtain access token: {0}")]
    Credentials(String),

    #[error("unexpected response shape: {0}")]
    Decode(String),

    #[error("query job {0} did not complete")]
    Incomplete(String),
}

/// The webhook did not accept the report.
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Discord webhook request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Discord webhook failed: {status}, {body}")]
    UnexpectedStatus { status: u16, body: String },
}

/// Failures that end an invocation with a server error.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    #[error("{0}")]
    Unexpected(String),
}
