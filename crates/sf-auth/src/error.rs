//! Error types for spotsf-auth.
//!
//! Error messages are sanitized so credential values never reach logs or
//! user-facing surfaces.

/// Result type alias for spotsf-auth operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for spotsf-auth operations.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional source error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Create a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Create a new error with the given kind and source.
    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// Returns true if this is an authentication failure.
    pub fn is_authentication(&self) -> bool {
        matches!(self.kind, ErrorKind::Authentication(_))
    }

    /// Returns true if the caller must run the interactive login.
    pub fn is_interaction_required(&self) -> bool {
        matches!(self.kind, ErrorKind::InteractionRequired)
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// Token exchange failed: bad credentials, revoked refresh token, or a
    /// token endpoint response with no access token in it.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Network unreachable. Message is user-actionable and surfaced verbatim.
    #[error("{0}")]
    Connectivity(String),

    /// The PKCE flow needs the UI layer to run the interactive redirect hop.
    #[error("Interactive login required")]
    InteractionRequired,

    /// Non-OAuth HTTP failure during authentication.
    #[error("HTTP error: {0}")]
    Http(String),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(String),

    /// Form body serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Credential store error.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Invalid authenticator configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        // DNS/connect/timeout failures are the user's network, not their
        // credentials. Everything else keeps its (sanitized) message.
        if err.is_connect() || err.is_timeout() {
            return Error::with_source(
                ErrorKind::Connectivity("Check your network connection".to_string()),
                err,
            );
        }

        let message = err.to_string();
        let sanitized = if message.contains("access_token") || message.contains("token=") {
            "HTTP request failed (details redacted for security)".to_string()
        } else {
            message
        };
        Error::with_source(ErrorKind::Http(sanitized), err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(ErrorKind::Json(err.to_string()), err)
    }
}

impl From<serde_urlencoded::ser::Error> for Error {
    fn from(err: serde_urlencoded::ser::Error) -> Self {
        Error::with_source(ErrorKind::Serialization(err.to_string()), err)
    }
}

impl From<spotsf_store::Error> for Error {
    fn from(err: spotsf_store::Error) -> Self {
        Error::with_source(ErrorKind::Storage(err.to_string()), err)
    }
}
