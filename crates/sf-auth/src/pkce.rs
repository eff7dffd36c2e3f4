//! OAuth 2.0 authorization-code flow with PKCE.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use rand::distr::Alphanumeric;
use rand::Rng;
use sha2::{Digest, Sha256};
use spotsf_store::TokenSet;
use tracing::instrument;

use crate::config::ConnectedApp;
use crate::error::Result;
use crate::token::handle_token_response;

/// Length of the generated code verifier (43..=128 per RFC 7636).
const CODE_VERIFIER_LENGTH: usize = 64;

/// Scope requested during authorization: API access plus a refresh token so
/// later invocations can renew without prompting.
const AUTHORIZE_SCOPE: &str = "refresh_token api";

/// A started authorization: the URL to open and the verifier to hold on to
/// until the code comes back.
#[derive(Clone)]
pub struct PkceAuthorization {
    /// Authorization URL the UI layer must open in a browser.
    pub url: String,
    /// Code verifier to pass to [`PkceFlow::complete`].
    pub code_verifier: String,
}

impl std::fmt::Debug for PkceAuthorization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PkceAuthorization")
            .field("url", &self.url)
            .field("code_verifier", &"[REDACTED]")
            .finish()
    }
}

/// PKCE-flow authentication against a connected app.
///
/// The interactive hop (opening the browser, receiving the redirect) is the
/// UI layer's job; this type produces the authorization URL and performs the
/// two token-endpoint grants (`authorization_code`, `refresh_token`).
#[derive(Clone)]
pub struct PkceFlow {
    app: ConnectedApp,
    authorize_url: String,
    login_url: String,
    redirect_uri: String,
    http_client: reqwest::Client,
}

impl std::fmt::Debug for PkceFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PkceFlow")
            .field("app", &self.app)
            .field("authorize_url", &self.authorize_url)
            .field("login_url", &self.login_url)
            .field("redirect_uri", &self.redirect_uri)
            .finish_non_exhaustive()
    }
}

impl PkceFlow {
    /// Create a PKCE flow.
    ///
    /// `authorize_base` is the org host carrying `/services/oauth2/authorize`
    /// (e.g. `https://acme.my.salesforce.com`); `login_url` is the token
    /// endpoint host, usually [`crate::PRODUCTION_LOGIN_URL`].
    pub fn new(
        app: ConnectedApp,
        authorize_base: impl Into<String>,
        login_url: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            app,
            authorize_url: format!(
                "{}/services/oauth2/authorize",
                authorize_base.into().trim_end_matches('/')
            ),
            login_url: login_url.into().trim_end_matches('/').to_string(),
            redirect_uri: redirect_uri.into(),
            http_client: reqwest::Client::new(),
        }
    }

    /// Start an authorization: generate a fresh verifier/challenge pair and
    /// build the URL the UI layer must open.
    pub fn begin(&self) -> PkceAuthorization {
        let code_verifier: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(CODE_VERIFIER_LENGTH)
            .map(char::from)
            .collect();
        let challenge = URL_SAFE_NO_PAD.encode(Sha256::digest(code_verifier.as_bytes()));

        let url = format!(
            "{}?response_type=code&client_id={}&redirect_uri={}&scope={}&code_challenge={}&code_challenge_method=S256",
            self.authorize_url,
            urlencoding::encode(&self.app.client_id),
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode(AUTHORIZE_SCOPE),
            challenge,
        );

        PkceAuthorization { url, code_verifier }
    }

    /// Exchange an authorization code for tokens.
    ///
    /// Code and verifier are not logged.
    #[instrument(skip(self, code, code_verifier))]
    pub async fn complete(&self, code: &str, code_verifier: &str) -> Result<TokenSet> {
        let mut params = vec![
            ("grant_type", "authorization_code"),
            ("code", code),
            ("code_verifier", code_verifier),
            ("client_id", &self.app.client_id),
            ("redirect_uri", &self.redirect_uri),
        ];
        if let Some(secret) = self.app.secret() {
            params.push(("client_secret", secret));
        }
        let body = serde_urlencoded::to_string(params)?;

        let response = self
            .http_client
            .post(format!("{}/services/oauth2/token", self.login_url))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await?;

        handle_token_response(response).await
    }

    /// Exchange a refresh token for a fresh access token.
    ///
    /// Salesforce does not rotate the refresh token on this grant, so the
    /// result keeps the one passed in unless the response carries a new one.
    #[instrument(skip(self, refresh_token))]
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenSet> {
        let mut params = vec![
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", &self.app.client_id),
        ];
        if let Some(secret) = self.app.secret() {
            params.push(("client_secret", secret));
        }
        let body = serde_urlencoded::to_string(params)?;

        let response = self
            .http_client
            .post(format!("{}/services/oauth2/token", self.login_url))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await?;

        let mut tokens = handle_token_response(response).await?;
        if tokens.refresh_token.is_none() {
            tokens.refresh_token = Some(refresh_token.to_string());
        }
        Ok(tokens)
    }
}
