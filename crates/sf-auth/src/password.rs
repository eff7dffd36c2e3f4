//! Resource-owner password grant.

use spotsf_store::TokenSet;
use tracing::instrument;

use crate::config::{ConnectedApp, PasswordCredentials};
use crate::error::Result;
use crate::token::handle_token_response;

/// Password-flow authentication against a connected app.
///
/// Exchanges the configured client id/secret plus username and
/// password + security token for an access token. No refresh token is
/// involved; an expired token is replaced by running the grant again.
#[derive(Clone)]
pub struct PasswordFlow {
    app: ConnectedApp,
    credentials: PasswordCredentials,
    login_url: String,
    http_client: reqwest::Client,
}

impl std::fmt::Debug for PasswordFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordFlow")
            .field("app", &self.app)
            .field("credentials", &self.credentials)
            .field("login_url", &self.login_url)
            .finish_non_exhaustive()
    }
}

impl PasswordFlow {
    /// Create a password flow against the production login URL.
    pub fn new(app: ConnectedApp, credentials: PasswordCredentials) -> Self {
        Self::with_login_url(app, credentials, crate::PRODUCTION_LOGIN_URL)
    }

    /// Create a password flow against a custom login URL (sandbox, tests).
    pub fn with_login_url(
        app: ConnectedApp,
        credentials: PasswordCredentials,
        login_url: impl Into<String>,
    ) -> Self {
        Self {
            app,
            credentials,
            login_url: login_url.into().trim_end_matches('/').to_string(),
            http_client: reqwest::Client::new(),
        }
    }

    /// Run the password grant and return the resulting token set.
    ///
    /// Credential parameters never enter the tracing span. A connect-level
    /// network failure maps to a user-actionable connectivity error; a token
    /// endpoint response without an access token maps to an authentication
    /// error and writes nothing anywhere.
    #[instrument(skip(self))]
    pub async fn request_token(&self) -> Result<TokenSet> {
        let secret = self.app.require_secret()?;
        let password = self.credentials.password_with_token();
        let params = [
            ("grant_type", "password"),
            ("client_id", &self.app.client_id),
            ("client_secret", secret),
            ("username", &self.credentials.username),
            ("password", &password),
        ];
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_flow(login_url: &str) -> PasswordFlow {
        PasswordFlow::with_login_url(
            ConnectedApp::new("client_id_value").with_secret("client_secret_value"),
            PasswordCredentials::new("user@example.com", "hunter2", "SECTOKEN"),
            login_url,
        )
    }

    #[tokio::test]
    async fn test_password_grant_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/services/oauth2/token"))
            .and(body_string_contains("grant_type=password"))
            .and(body_string_contains("username=user%40example.com"))
            .and(body_string_contains("password=hunter2SECTOKEN"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "00Dxx!token",
                "instance_url": "https://acme.my.salesforce.com",
                "token_type": "Bearer"
            })))
            .mount(&mock_server)
            .await;

        let tokens = test_flow(&mock_server.uri()).request_token().await.unwrap();
        assert_eq!(tokens.access_token, "00Dxx!token");
        assert!(tokens.refresh_token.is_none());
    }

    #[tokio::test]
    async fn test_failed_exchange_is_authentication_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/services/oauth2/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": "invalid_grant",
                "error_description": "authentication failure"
            })))
            .mount(&mock_server)
            .await;

        let err = test_flow(&mock_server.uri())
            .request_token()
            .await
            .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Authentication(_)));
    }

    #[tokio::test]
    async fn test_token_response_without_access_token_fails() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/services/oauth2/token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"token_type": "Bearer"})),
            )
            .mount(&mock_server)
            .await;

        let err = test_flow(&mock_server.uri())
            .request_token()
            .await
            .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Authentication(_)));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_maps_to_connectivity() {
        // Nothing listens on the discard port: connection refused.
        let err = test_flow("http://127.0.0.1:9")
            .request_token()
            .await
            .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Connectivity(_)));
        assert_eq!(err.to_string(), "Check your network connection");
    }
}
