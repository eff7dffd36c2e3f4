//! Flow-polymorphic authenticator with single-flight renewal.

use std::sync::Arc;

use spotsf_store::SecretStore;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use crate::error::{Error, ErrorKind, Result};
use crate::password::PasswordFlow;
use crate::pkce::{PkceAuthorization, PkceFlow};

enum Flow {
    Password(PasswordFlow),
    Pkce(PkceFlow),
}

impl std::fmt::Debug for Flow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Flow::Password(flow) => flow.fmt(f),
            Flow::Pkce(flow) => flow.fmt(f),
        }
    }
}

/// Obtains, renews, and invalidates the access token for one org session.
///
/// One of the two flows is chosen at construction; callers only see
/// [`access_token`](Self::access_token) and
/// [`handle_unauthorized`](Self::handle_unauthorized).
///
/// Renewal is serialized through an async mutex and re-checks the store
/// after acquiring it, so concurrent callers that observe the same expired
/// or rejected token run one grant between them.
pub struct Authenticator {
    flow: Flow,
    store: Arc<dyn SecretStore>,
    renewal: Mutex<()>,
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("flow", &self.flow)
            .field("renewal", &self.renewal)
            .finish_non_exhaustive()
    }
}

impl Authenticator {
    /// Create a password-flow authenticator.
    pub fn password(flow: PasswordFlow, store: Arc<dyn SecretStore>) -> Self {
        Self {
            flow: Flow::Password(flow),
            store,
            renewal: Mutex::new(()),
        }
    }

    /// Create a PKCE-flow authenticator.
    pub fn pkce(flow: PkceFlow, store: Arc<dyn SecretStore>) -> Self {
        Self {
            flow: Flow::Pkce(flow),
            store,
            renewal: Mutex::new(()),
        }
    }

    /// The store holding this session's credentials.
    pub fn store(&self) -> &Arc<dyn SecretStore> {
        &self.store
    }

    /// Get a usable access token, renewing if the stored one is missing or
    /// locally expired.
    #[instrument(skip(self))]
    pub async fn access_token(&self) -> Result<String> {
        if let Some(tokens) = self.store.credentials()? {
            if !tokens.is_expired() {
                return Ok(tokens.access_token);
            }
            debug!("stored access token expired, renewing");
        }
        self.renew(None).await
    }

    /// Recover from a 401: drop the rejected token and renew once.
    ///
    /// `stale_token` is the token the server rejected; if another caller has
    /// already replaced it, the replacement is returned without a new grant.
    #[instrument(skip(self, stale_token))]
    pub async fn handle_unauthorized(&self, stale_token: &str) -> Result<String> {
        self.renew(Some(stale_token)).await
    }

    /// Remove the stored credentials, forcing a full login next time.
    pub fn invalidate(&self) -> Result<()> {
        self.store.clear_credentials()?;
        Ok(())
    }

    /// Start the interactive PKCE login. Fails for the password flow, which
    /// has no interactive step.
    pub fn begin_login(&self) -> Result<PkceAuthorization> {
        match &self.flow {
            Flow::Pkce(flow) => Ok(flow.begin()),
            Flow::Password(_) => Err(Error::new(ErrorKind::Config(
                "the password flow has no interactive login".to_string(),
            ))),
        }
    }

    /// Finish the interactive PKCE login with the redirect's authorization
    /// code, persisting the resulting token set.
    #[instrument(skip(self, code, code_verifier))]
    pub async fn complete_login(&self, code: &str, code_verifier: &str) -> Result<String> {
        let flow = match &self.flow {
            Flow::Pkce(flow) => flow,
            Flow::Password(_) => {
                return Err(Error::new(ErrorKind::Config(
                    "the password flow has no interactive login".to_string(),
                )))
            }
        };

        let tokens = flow.complete(code, code_verifier).await?;
        self.store.set_credentials(&tokens)?;
        Ok(tokens.access_token)
    }

    /// Single-flight renewal.
    ///
    /// With `stale_token` set, a stored token is fresh when it differs from
    /// the rejected one; otherwise freshness is the local expiry check.
    async fn renew(&self, stale_token: Option<&str>) -> Result<String> {
        let _guard = self.renewal.lock().await;

        // Re-check under the lock: a concurrent renewal may have finished
        // while we waited for it.
        if let Some(tokens) = self.store.credentials()? {
            let fresh = match stale_token {
                Some(stale) => tokens.access_token != stale,
                None => true,
            };
            if fresh && !tokens.is_expired() {
                return Ok(tokens.access_token);
            }
        }

        let outcome = match &self.flow {
            Flow::Password(flow) => flow.request_token().await,
            Flow::Pkce(flow) => {
                let refresh_token = self
                    .store
                    .credentials()?
                    .and_then(|tokens| tokens.refresh_token);
                match refresh_token {
                    Some(refresh_token) => match flow.refresh(&refresh_token).await {
                        Ok(tokens) => Ok(tokens),
                        Err(err) if err.is_authentication() => {
                            // Revoked or expired refresh token: clear the
                            // session and ask the UI for a full re-login.
                            self.store.clear_credentials()?;
                            return Err(Error::with_source(ErrorKind::InteractionRequired, err));
                        }
                        Err(err) => Err(err),
                    },
                    None => return Err(Error::new(ErrorKind::InteractionRequired)),
                }
            }
        };

        match outcome {
            Ok(tokens) => {
                self.store.set_credentials(&tokens)?;
                Ok(tokens.access_token)
            }
            Err(err) => {
                if err.is_authentication() {
                    self.store.clear_credentials()?;
                }
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConnectedApp, PasswordCredentials};
    use spotsf_store::{MemoryStore, TokenSet};
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn password_authenticator(login_url: &str) -> (Authenticator, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let flow = PasswordFlow::with_login_url(
            ConnectedApp::new("client_id").with_secret("client_secret"),
            PasswordCredentials::new("user@example.com", "pw", "tok"),
            login_url,
        );
        (
            Authenticator::password(flow, store.clone() as Arc<dyn SecretStore>),
            store,
        )
    }

    fn pkce_authenticator(login_url: &str) -> (Authenticator, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let flow = PkceFlow::new(
            ConnectedApp::new("client_id"),
            "https://acme.my.salesforce.com",
            login_url,
            "https://localhost/redirect",
        );
        (
            Authenticator::pkce(flow, store.clone() as Arc<dyn SecretStore>),
            store,
        )
    }

    fn token_body(access_token: &str) -> serde_json::Value {
        serde_json::json!({ "access_token": access_token, "token_type": "Bearer" })
    }

    #[tokio::test]
    async fn test_stored_token_returned_without_network() {
        let mock_server = MockServer::start().await;
        // No mocks mounted: any request would 404 and fail the exchange.
        let (auth, store) = password_authenticator(&mock_server.uri());

        store.set_credentials(&TokenSet::new("cached_token")).unwrap();
        assert_eq!(auth.access_token().await.unwrap(), "cached_token");
    }

    #[tokio::test]
    async fn test_password_login_on_empty_store() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/services/oauth2/token"))
            .and(body_string_contains("grant_type=password"))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body("new_token")))
            .expect(1)
            .mount(&mock_server)
            .await;

        let (auth, store) = password_authenticator(&mock_server.uri());
        assert_eq!(auth.access_token().await.unwrap(), "new_token");
        assert_eq!(
            store.credentials().unwrap().unwrap().access_token,
            "new_token"
        );
    }

    #[tokio::test]
    async fn test_expired_token_is_renewed() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/services/oauth2/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body("renewed")))
            .expect(1)
            .mount(&mock_server)
            .await;

        let (auth, store) = password_authenticator(&mock_server.uri());
        store
            .set_credentials(&TokenSet::new("old").with_lifetime_seconds(-10))
            .unwrap();

        assert_eq!(auth.access_token().await.unwrap(), "renewed");
    }

    #[tokio::test]
    async fn test_failed_exchange_clears_store_and_writes_nothing() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/services/oauth2/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": "invalid_grant",
                "error_description": "authentication failure"
            })))
            .mount(&mock_server)
            .await;

        let (auth, store) = password_authenticator(&mock_server.uri());
        let err = auth.access_token().await.unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Authentication(_)));
        assert!(store.credentials().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_handle_unauthorized_renews_once() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/services/oauth2/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body("replacement")))
            .expect(1)
            .mount(&mock_server)
            .await;

        let (auth, store) = password_authenticator(&mock_server.uri());
        store.set_credentials(&TokenSet::new("rejected")).unwrap();

        assert_eq!(
            auth.handle_unauthorized("rejected").await.unwrap(),
            "replacement"
        );
    }

    #[tokio::test]
    async fn test_handle_unauthorized_skips_grant_when_already_renewed() {
        let mock_server = MockServer::start().await;
        // expect(0): a token request here means the single-flight check failed.
        Mock::given(method("POST"))
            .and(path("/services/oauth2/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body("unused")))
            .expect(0)
            .mount(&mock_server)
            .await;

        let (auth, store) = password_authenticator(&mock_server.uri());
        store.set_credentials(&TokenSet::new("already_fresh")).unwrap();

        assert_eq!(
            auth.handle_unauthorized("rejected_old").await.unwrap(),
            "already_fresh"
        );
    }

    #[tokio::test]
    async fn test_concurrent_renewal_is_single_flight() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/services/oauth2/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body("single")))
            .expect(1)
            .mount(&mock_server)
            .await;

        let (auth, store) = password_authenticator(&mock_server.uri());
        store
            .set_credentials(&TokenSet::new("expired").with_lifetime_seconds(-10))
            .unwrap();

        let (a, b) = tokio::join!(
            auth.handle_unauthorized("expired"),
            auth.handle_unauthorized("expired")
        );
        assert_eq!(a.unwrap(), "single");
        assert_eq!(b.unwrap(), "single");
    }

    #[tokio::test]
    async fn test_pkce_without_credentials_requires_interaction() {
        let mock_server = MockServer::start().await;
        let (auth, _store) = pkce_authenticator(&mock_server.uri());

        let err = auth.access_token().await.unwrap_err();
        assert!(err.is_interaction_required());
    }

    #[tokio::test]
    async fn test_pkce_renews_via_refresh_token() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/services/oauth2/token"))
            .and(body_string_contains("grant_type=refresh_token"))
            .and(body_string_contains("refresh_token=keep_me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body("refreshed")))
            .expect(1)
            .mount(&mock_server)
            .await;

        let (auth, store) = pkce_authenticator(&mock_server.uri());
        store
            .set_credentials(
                &TokenSet::new("expired")
                    .with_refresh_token("keep_me")
                    .with_lifetime_seconds(-10),
            )
            .unwrap();

        assert_eq!(auth.access_token().await.unwrap(), "refreshed");
        // The refresh token survives the renewal.
        assert_eq!(
            store.credentials().unwrap().unwrap().refresh_token,
            Some("keep_me".to_string())
        );
    }

    #[tokio::test]
    async fn test_pkce_failed_refresh_clears_session() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/services/oauth2/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": "invalid_grant",
                "error_description": "expired access/refresh token"
            })))
            .mount(&mock_server)
            .await;

        let (auth, store) = pkce_authenticator(&mock_server.uri());
        store
            .set_credentials(
                &TokenSet::new("expired")
                    .with_refresh_token("revoked")
                    .with_lifetime_seconds(-10),
            )
            .unwrap();

        let err = auth.access_token().await.unwrap_err();
        assert!(err.is_interaction_required());
        assert!(store.credentials().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_complete_login_persists_tokens() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/services/oauth2/token"))
            .and(body_string_contains("grant_type=authorization_code"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "interactive",
                "refresh_token": "granted_refresh",
                "expires_in": 7200
            })))
            .mount(&mock_server)
            .await;

        let (auth, store) = pkce_authenticator(&mock_server.uri());
        let token = auth.complete_login("the_code", "the_verifier").await.unwrap();
        assert_eq!(token, "interactive");

        let stored = store.credentials().unwrap().unwrap();
        assert_eq!(stored.refresh_token, Some("granted_refresh".to_string()));
    }

    #[test]
    fn test_begin_login_rejected_for_password_flow() {
        let (auth, _store) = password_authenticator("https://login.salesforce.com");
        let err = auth.begin_login().unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Config(_)));
    }
}
