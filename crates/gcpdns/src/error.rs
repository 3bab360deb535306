//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable
//! help text and per-class exit codes.

use miette::Diagnostic;
use thiserror::Error;

use gcpdns_core::CoreError;

/// Exit codes per error class.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const BATCH: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(gcpdns::auth_failed),
        help(
            "Verify the service-account key file and its IAM permissions.\n\
             The account needs the 'DNS Administrator' role on the project."
        )
    )]
    AuthFailed { message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(gcpdns::no_credentials),
        help(
            "Pass a key file with --credentials, set GCPDNS_CREDENTIALS,\n\
             or add a 'credentials' entry to the profile in {config_path}."
        )
    )]
    NoCredentials {
        profile: String,
        config_path: String,
    },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(gcpdns::not_found),
        help("Run: gcpdns {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("No managed zone hosts '{name}'")]
    #[diagnostic(
        code(gcpdns::zone_not_found),
        help("Run: gcpdns zone dump to see the zones this project manages")
    )]
    NoZoneFor { name: String },

    #[error("{resource_type} '{identifier}' already exists")]
    #[diagnostic(
        code(gcpdns::conflict),
        help("Use --replace to overwrite the existing {resource_type}.")
    )]
    Conflict {
        resource_type: String,
        identifier: String,
    },

    // ── API ──────────────────────────────────────────────────────────

    #[error("Cloud DNS API error: {message}")]
    #[diagnostic(code(gcpdns::api_error))]
    ApiError {
        message: String,
        status: Option<u16>,
    },

    // ── Batch ────────────────────────────────────────────────────────

    #[error("{failed} of {total} rows failed")]
    #[diagnostic(
        code(gcpdns::batch_failed),
        help("See the per-row report above; rerun with --ignore-errors to attempt all rows.")
    )]
    BatchFailed { failed: usize, total: usize },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(gcpdns::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(code(gcpdns::config))]
    Config(Box<figment::Error>),

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("CSV output failed: {0}")]
    #[diagnostic(code(gcpdns::csv))]
    Csv(String),

    // ── Internal ─────────────────────────────────────────────────────

    #[error("{0}")]
    #[diagnostic(code(gcpdns::internal))]
    Internal(String),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } | Self::NoZoneFor { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::BatchFailed { .. } => exit_code::BATCH,
            Self::Validation { .. } => exit_code::USAGE,
            Self::ApiError { status: None, .. } => exit_code::CONNECTION,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::Csv { line, message } => CliError::Validation {
                field: format!("CSV line {line}"),
                reason: message,
            },

            CoreError::Conflict { entity, key } => CliError::Conflict {
                resource_type: entity.into(),
                identifier: key,
            },

            CoreError::NotFound { entity, key } => CliError::NotFound {
                list_command: match entity {
                    "zone" => "zone dump".into(),
                    _ => "record dump <zone>".into(),
                },
                resource_type: entity.into(),
                identifier: key,
            },

            CoreError::ZoneNotFound { name } => CliError::NoZoneFor { name },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::Remote { message, status } => CliError::ApiError { message, status },

            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

impl From<gcpdns_api::Error> for CliError {
    fn from(err: gcpdns_api::Error) -> Self {
        CoreError::from(err).into()
    }
}

impl From<gcpdns_config::ConfigError> for CliError {
    fn from(err: gcpdns_config::ConfigError) -> Self {
        match err {
            gcpdns_config::ConfigError::Validation { field, reason } => {
                CliError::Validation { field, reason }
            }
            gcpdns_config::ConfigError::NoCredentials { profile } => CliError::NoCredentials {
                profile,
                config_path: gcpdns_config::config_path().display().to_string(),
            },
            gcpdns_config::ConfigError::Figment(e) => CliError::Config(e),
            gcpdns_config::ConfigError::Io(e) => CliError::Io(e),
            gcpdns_config::ConfigError::Serialization(e) => CliError::Internal(e.to_string()),
        }
    }
}
