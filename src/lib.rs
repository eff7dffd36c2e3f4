//! # spotsf
//!
//! Salesforce quick-search core: type a free-text query, get matching
//! records from one org, grouped and filterable by object type, each with a
//! one-click URL to the record in the browser.
//!
//! This crate re-exports the public surface of the member crates:
//!
//! - [`store`] — typed persistent storage for credentials and the icon cache
//! - [`auth`] — password-flow and PKCE-flow authentication with renewal
//! - [`client`] — org configuration and the 401-healing REST client
//! - [`search`] — object metadata, SOSL search, and the icon cache
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use spotsf::{
//!     Authenticator, ConnectedApp, FileStore, OrgConfig, OrgSearch,
//!     PasswordCredentials, PasswordFlow, RestClient, SecretStore,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store: Arc<dyn SecretStore> = Arc::new(FileStore::new()?);
//!     let flow = PasswordFlow::new(
//!         ConnectedApp::new("client_id").with_secret("client_secret"),
//!         PasswordCredentials::new("user@example.com", "password", "token"),
//!     );
//!     let auth = Arc::new(Authenticator::password(flow, store));
//!
//!     let config = OrgConfig::new("acme").with_additional_objects("Lead");
//!     let search = OrgSearch::new(RestClient::new(config, auth));
//!
//!     search.warm_icon_cache().await?;
//!     for record in search.find("acme corp", None).await? {
//!         println!("{} -> {}", record.name, record.url);
//!     }
//!     Ok(())
//! }
//! ```

pub use spotsf_auth as auth;
pub use spotsf_client as client;
pub use spotsf_search as search;
pub use spotsf_store as store;

pub use spotsf_auth::{
    Authenticator, ConnectedApp, PasswordCredentials, PasswordFlow, PkceAuthorization, PkceFlow,
    PRODUCTION_LOGIN_URL, SANDBOX_LOGIN_URL,
};
pub use spotsf_client::{OrgConfig, RestClient, DEFAULT_API_VERSION, DEFAULT_OBJECTS};
pub use spotsf_search::{ObjectDescriptor, OrgSearch, SearchRecord};
pub use spotsf_store::{FileStore, MemoryStore, SecretStore, TokenSet};
