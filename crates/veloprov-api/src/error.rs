use thiserror::Error;

/// Top-level error type for the `veloprov-api` crate.
///
/// Covers every failure mode of a portal call: authentication, transport,
/// the orchestrator's error envelope, and response decoding.
/// `veloprov-core` wraps these with the provisioning step that failed.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Token rejected by the orchestrator.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Token could not be turned into a header value.
    #[error("Invalid API token: {0}")]
    InvalidToken(String),

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Portal API ──────────────────────────────────────────────────
    /// The orchestrator answered the call with an error, either through
    /// a non-2xx status or the `{"error": {code, message}}` envelope.
    #[error("{method} failed: {message}")]
    Api {
        method: String,
        message: String,
        code: Option<i64>,
        status: Option<u16>,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the token was rejected.
    pub fn is_auth_failure(&self) -> bool {
        match self {
            Self::Authentication { .. } | Self::InvalidToken(_) => true,
            Self::Api { status, .. } => *status == Some(401),
            _ => false,
        }
    }

    /// Returns `true` if the orchestrator could not be reached at all.
    pub fn is_connect(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_connect() || e.is_timeout(),
            Self::Tls(_) => true,
            _ => false,
        }
    }

    /// Extract the orchestrator's error code, if available.
    pub fn api_error_code(&self) -> Option<i64> {
        match self {
            Self::Api { code, .. } => *code,
            _ => None,
        }
    }
}
