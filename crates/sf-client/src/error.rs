//! Error types for spotsf-client.

/// Result type alias for spotsf-client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for spotsf-client operations.
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

    /// The HTTP status code, if this is a request failure.
    pub fn status(&self) -> Option<u16> {
        match self.kind {
            ErrorKind::Http { status, .. } => Some(status),
            _ => None,
        }
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// Non-2xx response other than a resolved 401.
    #[error("Request failed with status code {status}")]
    Http { status: u16, message: String },

    /// Network unreachable. Message is user-actionable and surfaced verbatim.
    #[error("{0}")]
    Connectivity(String),

    /// Authentication failed and could not be recovered by renewal.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The PKCE flow needs the UI layer to run the interactive login.
    #[error("Interactive login required")]
    InteractionRequired,

    /// Response body could not be decoded.
    #[error("JSON error: {0}")]
    Json(String),

    /// Credential store error.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Invalid client configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            return Error::with_source(
                ErrorKind::Connectivity("Check your network connection".to_string()),
                err,
            );
        }
        if err.is_decode() {
            return Error::with_source(ErrorKind::Json(err.to_string()), err);
        }

        let message = err.to_string();
        let sanitized = if message.contains("access_token") || message.contains("token=") {
            "HTTP request failed (details redacted for security)".to_string()
        } else {
            message
        };
        Error::with_source(
            ErrorKind::Http {
                status: err.status().map(|s| s.as_u16()).unwrap_or(0),
                message: sanitized,
            },
            err,
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(ErrorKind::Json(err.to_string()), err)
    }
}

impl From<spotsf_auth::Error> for Error {
    fn from(err: spotsf_auth::Error) -> Self {
        use spotsf_auth::ErrorKind as Auth;
        let kind = match &err.kind {
            Auth::Authentication(msg) => ErrorKind::Authentication(msg.clone()),
            Auth::Connectivity(msg) => ErrorKind::Connectivity(msg.clone()),
            Auth::InteractionRequired => ErrorKind::InteractionRequired,
            Auth::Storage(msg) => ErrorKind::Storage(msg.clone()),
            Auth::Config(msg) => ErrorKind::Config(msg.clone()),
            Auth::Json(msg) => ErrorKind::Json(msg.clone()),
            other => ErrorKind::Authentication(other.to_string()),
        };
        Error::with_source(kind, err)
    }
}

impl From<spotsf_store::Error> for Error {
    fn from(err: spotsf_store::Error) -> Self {
        Error::with_source(ErrorKind::Storage(err.to_string()), err)
    }
}
