//! Persisted token set with local expiry tracking.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Clock skew allowed when deciding whether a token is still usable.
const EXPIRY_SKEW_SECONDS: i64 = 60;

/// The credential set persisted between invocations.
///
/// Owned by the store, mutated only through the authenticator. The refresh
/// token is present in the PKCE variant only; the password variant stores a
/// bare access token. `Debug` output redacts both token values.
#[derive(Clone, Serialize, Deserialize)]
pub struct TokenSet {
    /// Current access token.
    pub access_token: String,
    /// Refresh token, if the grant returned one.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Local expiry timestamp, if the grant reported a lifetime.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSet")
            .field("access_token", &"[REDACTED]")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl TokenSet {
    /// Create a token set holding just an access token.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
            expires_at: None,
        }
    }

    /// Attach a refresh token.
    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    /// Set the expiry from a lifetime in seconds, measured from now.
    pub fn with_lifetime_seconds(mut self, seconds: i64) -> Self {
        self.expires_at = Some(Utc::now() + Duration::seconds(seconds));
        self
    }

    /// Whether the access token should be treated as expired.
    ///
    /// Tokens without a recorded expiry are assumed usable until the server
    /// says otherwise (a 401 on use). A skew margin keeps us from presenting
    /// a token that expires mid-request.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(at) => Utc::now() + Duration::seconds(EXPIRY_SKEW_SECONDS) >= at,
            None => false,
        }
    }
}
