// ── Core error types ──
//
// Every failure aborts the run. Orchestrator call failures keep the api
// error as their source and name the step that issued the call, so the
// CLI can tell the user which part of provisioning broke.

use std::path::PathBuf;

use strum::Display;
use thiserror::Error;

/// A collaborator call made during provisioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Step {
    #[strum(to_string = "orchestrator client setup")]
    Connect,
    #[strum(to_string = "enterprise lookup")]
    GetEnterprise,
    #[strum(to_string = "configuration profile listing")]
    ListProfiles,
    #[strum(to_string = "configuration profile creation")]
    CreateProfile,
    #[strum(to_string = "edge provisioning")]
    ProvisionEdge,
    #[strum(to_string = "edge configuration fetch")]
    FetchConfiguration,
    #[strum(to_string = "edge configuration update")]
    UpdateConfiguration,
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Collaborator errors ──────────────────────────────────────────
    #[error("{step} failed: {source}")]
    ExternalCallFailure {
        step: Step,
        source: veloprov_api::Error,
    },

    #[error("Enterprise mismatch: expected '{expected}', token belongs to '{actual}'")]
    EnterpriseMismatch { expected: String, actual: String },

    // ── Document errors ──────────────────────────────────────────────
    #[error("Malformed configuration document: {reason}")]
    MalformedConfigurationDocument { reason: String },

    #[error("Template parameter '{name}' not found")]
    TemplateParameterMissing { name: String },

    // ── Input errors ─────────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid JSON in {context}: {source}")]
    Json {
        context: String,
        source: serde_json::Error,
    },
}

impl CoreError {
    /// Wrap an api error with the step that made the call.
    pub(crate) fn call(step: Step) -> impl FnOnce(veloprov_api::Error) -> Self {
        move |source| Self::ExternalCallFailure { step, source }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedConfigurationDocument {
            reason: reason.into(),
        }
    }

    /// Returns `true` if the orchestrator rejected the token.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::ExternalCallFailure { source, .. } if source.is_auth_failure())
    }

    /// Returns `true` if the orchestrator could not be reached.
    pub fn is_connect(&self) -> bool {
        matches!(self, Self::ExternalCallFailure { source, .. } if source.is_connect())
    }

    /// The step that failed, for collaborator errors.
    pub fn step(&self) -> Option<Step> {
        match self {
            Self::ExternalCallFailure { step, .. } => Some(*step),
            _ => None,
        }
    }
}
