use thiserror::Error;

/// Top-level error type for the `gcpdns-api` crate.
///
/// Covers every failure mode of the client: credential loading, the
/// OAuth token exchange, HTTP transport, and structured Cloud DNS API
/// errors. `gcpdns-core` maps these into domain-level failures.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Token exchange failed (rejected JWT, revoked key, etc.)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Service account key file could not be read or parsed.
    #[error("Invalid service account key: {message}")]
    InvalidKeyFile { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Cloud DNS API ───────────────────────────────────────────────
    /// Structured error from the Cloud DNS API (parsed from the
    /// `{"error": {"code", "message", "errors": [...]}}` envelope).
    #[error("Cloud DNS API error (HTTP {status}): {message}")]
    Api {
        status: u16,
        message: String,
        /// Machine-readable reason, e.g. "alreadyExists" or "notFound".
        reason: Option<String>,
    },

    /// Per-project quota or rate limit exhausted.
    #[error("Rate limited by the Cloud DNS API: {message}")]
    RateLimited { message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the API rejected the call because the resource
    /// already exists.
    pub fn is_conflict(&self) -> bool {
        match self {
            Self::Api { status: 409, .. } => true,
            Self::Api { reason, .. } => reason.as_deref() == Some("alreadyExists"),
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Api { status: 404, .. } => true,
            Self::Api { reason, .. } => reason.as_deref() == Some("notFound"),
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            _ => false,
        }
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::RateLimited { .. } => true,
            Self::Api { status, .. } => (500..600).contains(status),
            _ => false,
        }
    }
}
