//! # spotsf-store
//!
//! Typed persistent storage for the Salesforce quick-search core.
//!
//! Two kinds of state survive between invocations:
//! - the OAuth token set (access token, optional refresh token, expiry), and
//! - the per-object icon URL cache populated after a successful login.
//!
//! Both live behind the [`SecretStore`] trait so the storage schema stays in
//! one place instead of being scattered across ad-hoc string keys. The
//! default backend is [`FileStore`] (JSON documents under `~/.spotsf/` with
//! restrictive permissions); [`MemoryStore`] backs tests and hosts without a
//! home directory.
//!
//! ## Security
//!
//! Token values are redacted in `Debug` output and never appear in error
//! messages.

mod error;
mod store;
mod tokens;

pub use error::{Error, ErrorKind, Result};
pub use store::{default_store_dir, FileStore, MemoryStore, SecretStore};
pub use tokens::TokenSet;
