//! # spotsf-auth
//!
//! Salesforce authentication for the quick-search core.
//!
//! Two interchangeable strategies obtain an access token, selected at
//! construction:
//!
//! - **Password flow** — resource-owner password grant using the connected
//!   app's client id/secret plus username and password + security token.
//! - **PKCE flow** — authorization-code grant with a S256 code challenge and
//!   `refresh_token api` scope; subsequent renewals use the stored refresh
//!   token without prompting.
//!
//! The [`Authenticator`] wraps either flow together with a
//! [`spotsf_store::SecretStore`]: it hands out a usable access token, renews
//! expired tokens, and recovers from a 401 by dropping the stale token and
//! renewing once. Renewal is single-flight: concurrent callers that observe
//! an expired token trigger one grant, not several.
//!
//! The interactive redirect hop of the PKCE flow belongs to the UI layer:
//! when no refresh token can help, renewal fails with
//! [`ErrorKind::InteractionRequired`] and the caller drives
//! [`PkceFlow::begin`] / [`Authenticator::complete_login`].
//!
//! ## Security
//!
//! Secrets (tokens, client secret, password) are redacted in Debug output,
//! skipped in tracing spans, and never included in error messages.

mod authenticator;
mod config;
mod error;
mod password;
mod pkce;
mod token;

pub use authenticator::Authenticator;
pub use config::{ConnectedApp, PasswordCredentials};
pub use error::{Error, ErrorKind, Result};
pub use password::PasswordFlow;
pub use pkce::{PkceAuthorization, PkceFlow};
pub use token::TokenResponse;

/// Default Salesforce login URL for production orgs.
pub const PRODUCTION_LOGIN_URL: &str = "https://login.salesforce.com";

/// Default Salesforce login URL for sandbox orgs.
pub const SANDBOX_LOGIN_URL: &str = "https://test.salesforce.com";
