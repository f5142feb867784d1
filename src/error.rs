use thiserror::Error;

/// Invalid model configuration, raised when parameters are built or validated
#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
}

impl ModelError {
    pub(crate) fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        Self::InvalidParameter {
            name,
            value,
            reason,
        }
    }
}

/// Errors surfaced by an accounting transition
#[derive(Debug, Error, PartialEq)]
pub enum AccountingError {
    #[error("invalid interval input `{field}` = {value}: {reason}")]
    InvalidInput {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("accountant is not configured for {0} updates")]
    ModeMismatch(&'static str),

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl AccountingError {
    pub(crate) fn invalid(field: &'static str, value: f64, reason: &'static str) -> Self {
        Self::InvalidInput {
            field,
            value,
            reason,
        }
    }
}

/// Failures at the network boundary (location and weather lookups)
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request to {provider} failed: {source}")]
    Transport {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} returned status {status}")]
    Status {
        provider: &'static str,
        status: reqwest::StatusCode,
    },

    #[error("failed to decode {provider} response: {source}")]
    Decode {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} returned an unusable payload: {reason}")]
    Payload {
        provider: &'static str,
        reason: String,
    },
}

/// Failures while persisting interval records
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Rejected `--duration` values
#[derive(Debug, Error, PartialEq)]
pub enum DurationError {
    #[error("duration is empty")]
    Empty,

    #[error("invalid duration `{0}`: expected a non-negative number optionally followed by S, M or H")]
    Invalid(String),
}
