// ── Core error types ──
//
// User-facing errors from gcpdns-core. These are NOT API-specific --
// consumers never see HTTP status codes or JSON parse failures directly.
// The `From<gcpdns_api::Error>` impl translates transport-layer errors
// into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Validation errors ────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    Validation { message: String },

    #[error("CSV error at line {line}: {message}")]
    Csv { line: u64, message: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{entity} already exists: {key}")]
    Conflict { entity: &'static str, key: String },

    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("No managed zone hosts {name}")]
    ZoneNotFound { name: String },

    // ── Remote errors ────────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Cloud DNS API error: {message}")]
    Remote {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<gcpdns_api::Error> for CoreError {
    fn from(err: gcpdns_api::Error) -> Self {
        match err {
            gcpdns_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            gcpdns_api::Error::InvalidKeyFile { message } => {
                CoreError::AuthenticationFailed { message }
            }
            gcpdns_api::Error::Transport(e) => CoreError::Remote {
                status: e.status().map(|s| s.as_u16()),
                message: e.to_string(),
            },
            gcpdns_api::Error::InvalidUrl(e) => CoreError::Internal(format!("invalid URL: {e}")),
            gcpdns_api::Error::Api {
                status, message, ..
            } => CoreError::Remote {
                message,
                status: Some(status),
            },
            gcpdns_api::Error::RateLimited { message } => CoreError::Remote {
                message,
                status: Some(429),
            },
            gcpdns_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("deserialization error: {message}"))
            }
        }
    }
}
