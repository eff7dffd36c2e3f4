//! Token endpoint wire types.

use serde::Deserialize;
use spotsf_store::TokenSet;

use crate::error::{Error, ErrorKind, Result};

/// Response from `/services/oauth2/token`.
///
/// `access_token` is optional on the wire so that a 2xx body without one can
/// be rejected as an authentication failure instead of a parse error.
/// Sensitive fields are redacted in Debug output.
#[derive(Clone, Deserialize)]
pub struct TokenResponse {
    /// Access token. Absent means the exchange failed.
    #[serde(default)]
    pub access_token: Option<String>,
    /// Refresh token (PKCE flow with `refresh_token` scope).
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Token lifetime in seconds, when the server reports one.
    #[serde(default)]
    pub expires_in: Option<i64>,
    /// Org instance URL.
    #[serde(default)]
    pub instance_url: Option<String>,
    /// Token type (usually "Bearer").
    #[serde(default)]
    pub token_type: Option<String>,
    /// Scopes granted.
    #[serde(default)]
    pub scope: Option<String>,
    /// Issued-at timestamp (epoch milliseconds as a string).
    #[serde(default)]
    pub issued_at: Option<String>,
}

impl std::fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenResponse")
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("expires_in", &self.expires_in)
            .field("instance_url", &self.instance_url)
            .field("token_type", &self.token_type)
            .field("scope", &self.scope)
            .field("issued_at", &self.issued_at)
            .finish()
    }
}

impl TokenResponse {
    /// Convert to a storable token set.
    ///
    /// Fails with an authentication error when the response carried no
    /// access token; nothing is written to the store in that case.
    pub fn into_token_set(self) -> Result<TokenSet> {
        let access_token = self.access_token.ok_or_else(|| {
            Error::new(ErrorKind::Authentication(
                "token response contained no access token".to_string(),
            ))
        })?;

        let mut tokens = TokenSet::new(access_token);
        if let Some(refresh_token) = self.refresh_token {
            tokens = tokens.with_refresh_token(refresh_token);
        }
        if let Some(seconds) = self.expires_in {
            tokens = tokens.with_lifetime_seconds(seconds);
        }
        Ok(tokens)
    }
}

/// OAuth error response body.
#[derive(Debug, Deserialize)]
pub(crate) struct OAuthErrorResponse {
    pub error: String,
    #[serde(default)]
    pub error_description: String,
}

/// Turn a token endpoint response into a token set.
///
/// Non-2xx responses are decoded as OAuth error bodies and mapped to
/// authentication failures; 2xx responses must carry an access token.
pub(crate) async fn handle_token_response(response: reqwest::Response) -> Result<TokenSet> {
    if !response.status().is_success() {
        let status = response.status().as_u16();
        return match response.json::<OAuthErrorResponse>().await {
            Ok(oauth) => Err(Error::new(ErrorKind::Authentication(format!(
                "{} - {}",
                oauth.error, oauth.error_description
            )))),
            Err(_) => Err(Error::new(ErrorKind::Authentication(format!(
                "token endpoint returned status {}",
                status
            )))),
        };
    }

    let token: TokenResponse = response.json().await?;
    token.into_token_set()
}
