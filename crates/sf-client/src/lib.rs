//! # spotsf-client
//!
//! Org-scoped HTTP client for the Salesforce quick-search core.
//!
//! [`OrgConfig`] describes one org: the `my.salesforce.com` domain, the API
//! version, and the configured object set. [`RestClient`] joins org-scoped
//! URLs, attaches bearer auth obtained from the
//! [`Authenticator`](spotsf_auth::Authenticator), and executes GET requests.
//!
//! ## 401 handling
//!
//! Access tokens expire mid-session; surfacing that to the UI as a raw auth
//! failure would be wrong for a transient, self-healing condition. On a 401
//! the client asks the authenticator to renew and retries the request exactly
//! once, in a visible bounded loop. A second 401 (and every other non-2xx)
//! surfaces as [`ErrorKind::Http`] with its status code. This is the only
//! automatic retry in the system.

mod client;
mod config;
mod error;

pub use client::RestClient;
pub use config::{OrgConfig, DEFAULT_API_VERSION, DEFAULT_OBJECTS};
pub use error::{Error, ErrorKind, Result};
