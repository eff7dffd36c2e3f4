//! Error types for spotsf-search.

/// Result type alias for spotsf-search operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for spotsf-search operations.
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
        match &self.kind {
            ErrorKind::Client(err) => err.status(),
            _ => None,
        }
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// A filter object outside the configured set, or similar caller error.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Failure in the HTTP/auth layer, surfaced unchanged.
    #[error(transparent)]
    Client(spotsf_client::Error),

    /// Credential store error.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<spotsf_client::Error> for Error {
    fn from(err: spotsf_client::Error) -> Self {
        Error::new(ErrorKind::Client(err))
    }
}

impl From<spotsf_store::Error> for Error {
    fn from(err: spotsf_store::Error) -> Self {
        Error::with_source(ErrorKind::Storage(err.to_string()), err)
    }
}
