//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use veloprov_config::ConfigError;
use veloprov_core::{CoreError, Step};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
    pub const MALFORMED: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the orchestrator during {step}")]
    #[diagnostic(
        code(veloprov::connection_failed),
        help(
            "Check the hostname and that the orchestrator is reachable.\n\
             Try a longer --timeout, or --insecure (-k) for a self-signed certificate."
        )
    )]
    ConnectionFailed {
        step: Step,
        #[source]
        source: veloprov_api::Error,
    },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed during {step}")]
    #[diagnostic(
        code(veloprov::auth_failed),
        help(
            "Verify the API token for this orchestrator.\n\
             Run: veloprov config set-token"
        )
    )]
    AuthFailed {
        step: Step,
        #[source]
        source: veloprov_api::Error,
    },

    #[error("No API token configured for orchestrator '{orchestrator}'")]
    #[diagnostic(
        code(veloprov::no_credentials),
        help(
            "Store one with: veloprov config set-token\n\
             Or set the VCO_TOKEN environment variable."
        )
    )]
    NoCredentials { orchestrator: String },

    // ── Orchestrator ─────────────────────────────────────────────────
    #[error("{step} failed: {message}")]
    #[diagnostic(code(veloprov::api_error))]
    ApiError {
        step: Step,
        message: String,
        code: Option<i64>,
    },

    #[error("Token belongs to enterprise '{actual}', expected '{expected}'")]
    #[diagnostic(
        code(veloprov::enterprise_mismatch),
        help("Use a token issued for '{expected}', or change provisioning.enterprise_name.")
    )]
    EnterpriseMismatch { expected: String, actual: String },

    // ── Documents ────────────────────────────────────────────────────
    #[error("Malformed configuration document: {reason}")]
    #[diagnostic(
        code(veloprov::malformed_document),
        help(
            "The edge's deviceSettings must contain lan.networks[0] and the\n\
             LAN-facing routed interface. Nothing was written to the orchestrator."
        )
    )]
    MalformedDocument { reason: String },

    #[error("Stack template has no '{name}' parameter")]
    #[diagnostic(
        code(veloprov::template_parameter),
        help("Pass a template that declares the parameter, or omit --template to use the bundled one.")
    )]
    TemplateParameterMissing { name: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(veloprov::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Orchestrator profile '{name}' not found in configuration")]
    #[diagnostic(
        code(veloprov::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: veloprov config init"
        )
    )]
    OrchestratorNotFound { name: String, available: String },

    #[error("No orchestrator configured")]
    #[diagnostic(
        code(veloprov::no_config),
        help(
            "Create a config with: veloprov config init\n\
             Expected at: {path}\n\
             Or pass --host and --token."
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(veloprov::config))]
    Config(Box<ConfigError>),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error("I/O error on {path}")]
    #[diagnostic(code(veloprov::io))]
    IoAt {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON in {context}")]
    #[diagnostic(code(veloprov::json), help("Check the JSON file contents and try again."))]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::Validation { .. } => exit_code::USAGE,
            Self::MalformedDocument { .. } | Self::TemplateParameterMissing { .. } => {
                exit_code::MALFORMED
            }
            _ => exit_code::GENERAL,
        }
    }
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ExternalCallFailure { step, source } => from_api(step, source),

            CoreError::EnterpriseMismatch { expected, actual } => {
                CliError::EnterpriseMismatch { expected, actual }
            }

            CoreError::MalformedConfigurationDocument { reason } => {
                CliError::MalformedDocument { reason }
            }

            CoreError::TemplateParameterMissing { name } => {
                CliError::TemplateParameterMissing { name }
            }

            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::Io { path, source } => CliError::IoAt {
                path: path.display().to_string(),
                source,
            },

            CoreError::Json { context, source } => CliError::Json { context, source },
        }
    }
}

fn from_api(step: Step, source: veloprov_api::Error) -> CliError {
    if source.is_auth_failure() {
        return CliError::AuthFailed { step, source };
    }
    if source.is_connect() {
        return CliError::ConnectionFailed { step, source };
    }
    let code = source.api_error_code();
    match source {
        veloprov_api::Error::InvalidUrl(e) => CliError::Validation {
            field: "host".into(),
            reason: e.to_string(),
        },
        veloprov_api::Error::Api { message, .. } => CliError::ApiError {
            step,
            message,
            code,
        },
        other => CliError::ApiError {
            step,
            message: other.to_string(),
            code,
        },
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { orchestrator } => CliError::NoCredentials { orchestrator },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(Box::new(other)),
        }
    }
}
