//! Connected-app and login credential configuration.
//!
//! Explicit structs passed into the flows at construction; no module-level
//! globals. Sensitive fields are redacted in Debug output.

use crate::error::{Error, ErrorKind, Result};

/// Connected-app registration used by both flows.
#[derive(Clone)]
pub struct ConnectedApp {
    /// Consumer key (client_id).
    pub client_id: String,
    /// Consumer secret (client_secret). Required by the password flow,
    /// absent in the PKCE flow.
    client_secret: Option<String>,
}

impl std::fmt::Debug for ConnectedApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectedApp")
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl ConnectedApp {
    /// Create a connected app with just a client id.
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: None,
        }
    }

    /// Set the client secret.
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.client_secret = Some(secret.into());
        self
    }

    /// Get the client secret, failing if none was configured.
    pub(crate) fn require_secret(&self) -> Result<&str> {
        self.client_secret.as_deref().ok_or_else(|| {
            Error::new(ErrorKind::Config(
                "client_secret is required for the password flow".to_string(),
            ))
        })
    }

    /// Get the client secret, if configured.
    pub(crate) fn secret(&self) -> Option<&str> {
        self.client_secret.as_deref()
    }
}

/// Username/password credentials for the resource-owner password grant.
///
/// Salesforce expects the security token appended to the password; the flow
/// does that concatenation, callers keep the two apart.
#[derive(Clone)]
pub struct PasswordCredentials {
    /// Login username.
    pub username: String,
    password: String,
    security_token: String,
}

impl std::fmt::Debug for PasswordCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordCredentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("security_token", &"[REDACTED]")
            .finish()
    }
}

impl PasswordCredentials {
    /// Create password credentials.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        security_token: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            security_token: security_token.into(),
        }
    }

    /// Password with the security token appended, as the grant expects.
    pub(crate) fn password_with_token(&self) -> String {
        format!("{}{}", self.password, self.security_token)
    }
}
