//! Authenticated GET dispatch with bounded re-authentication retry.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use spotsf_auth::Authenticator;
use tracing::{debug, instrument, warn};

use crate::config::OrgConfig;
use crate::error::{Error, ErrorKind, Result};

/// Org-scoped REST client.
///
/// Builds absolute URLs from the org config, attaches bearer auth from the
/// authenticator, and decodes JSON responses. The only failure it resolves
/// locally is a 401: renew once, retry once.
#[derive(Clone)]
pub struct RestClient {
    http: reqwest::Client,
    config: OrgConfig,
    auth: Arc<Authenticator>,
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl RestClient {
    /// Create a client for the given org and authenticator.
    pub fn new(config: OrgConfig, auth: Arc<Authenticator>) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            auth,
        }
    }

    /// The org configuration.
    pub fn config(&self) -> &OrgConfig {
        &self.config
    }

    /// The authenticator backing this client.
    pub fn authenticator(&self) -> &Arc<Authenticator> {
        &self.auth
    }

    /// Execute a GET against a REST path and decode the JSON response.
    ///
    /// `path` is relative to `/services/data/v<version>/`; `query` entries
    /// are URL-encoded by the transport. On a 401 the authenticator renews
    /// the token and the request is retried exactly once; a second 401
    /// surfaces as `Http { status: 401 }` like any other non-2xx.
    #[instrument(skip(self, query), fields(path = %path))]
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let url = self.config.rest_url(path);
        let mut token = self.auth.access_token().await?;
        let mut retried = false;

        loop {
            let mut request = self.http.get(&url).bearer_auth(&token);
            if !query.is_empty() {
                request = request.query(query);
            }

            let response = request.send().await?;
            let status = response.status();

            if status.as_u16() == 401 && !retried {
                retried = true;
                debug!("access token rejected, renewing and retrying once");
                token = self.auth.handle_unauthorized(&token).await?;
                continue;
            }

            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                warn!(status = status.as_u16(), "request failed");
                return Err(Error::new(ErrorKind::Http {
                    status: status.as_u16(),
                    message,
                }));
            }

            return Ok(response.json().await?);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spotsf_auth::{ConnectedApp, PasswordCredentials, PasswordFlow};
    use spotsf_store::{MemoryStore, SecretStore, TokenSet};
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server_uri: &str, store: Arc<MemoryStore>) -> RestClient {
        let flow = PasswordFlow::with_login_url(
            ConnectedApp::new("client_id").with_secret("client_secret"),
            PasswordCredentials::new("user@example.com", "pw", "tok"),
            server_uri,
        );
        let auth = Authenticator::password(flow, store as Arc<dyn SecretStore>);
        let config = OrgConfig::new("acme").with_instance_url(server_uri);
        RestClient::new(config, Arc::new(auth))
    }

    fn seeded_store(token: &str) -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        store.set_credentials(&TokenSet::new(token)).unwrap();
        store
    }

    #[tokio::test]
    async fn test_get_attaches_bearer_and_query() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/services/data/v62.0/search/"))
            .and(header("Authorization", "Bearer seeded"))
            .and(query_param("q", "FIND {acme} IN ALL FIELDS"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "searchRecords": []
            })))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri(), seeded_store("seeded"));
        let result: serde_json::Value = client
            .get("search/", &[("q", "FIND {acme} IN ALL FIELDS")])
            .await
            .unwrap();
        assert!(result["searchRecords"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_401_renews_and_retries_once() {
        let mock_server = MockServer::start().await;

        // Stale token gets rejected; renewed token succeeds.
        Mock::given(method("GET"))
            .and(path("/services/data/v62.0/limits"))
            .and(header("Authorization", "Bearer stale"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("POST"))
            .and(path("/services/oauth2/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "renewed"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/services/data/v62.0/limits"))
            .and(header("Authorization", "Bearer renewed"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri(), seeded_store("stale"));
        let result: serde_json::Value = client.get("limits", &[]).await.unwrap();
        assert_eq!(result["ok"], true);
    }

    #[tokio::test]
    async fn test_second_401_surfaces_without_further_retry() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/services/data/v62.0/limits"))
            .respond_with(ResponseTemplate::new(401))
            .expect(2)
            .mount(&mock_server)
            .await;
        // Renewal succeeds exactly once; the retried request still 401s.
        Mock::given(method("POST"))
            .and(path("/services/oauth2/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "renewed"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri(), seeded_store("stale"));
        let err = client
            .get::<serde_json::Value>("limits", &[])
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(401));
    }

    #[tokio::test]
    async fn test_non_2xx_surfaces_status_code() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/services/data/v62.0/limits"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri(), seeded_store("seeded"));
        let err = client
            .get::<serde_json::Value>("limits", &[])
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.to_string(), "Request failed with status code 500");
    }

    #[tokio::test]
    async fn test_unreachable_host_maps_to_connectivity() {
        let store = seeded_store("seeded");
        let client = test_client("http://127.0.0.1:9", store);
        let err = client
            .get::<serde_json::Value>("limits", &[])
            .await
            .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Connectivity(_)));
    }
}
