//! # spotsf-search
//!
//! Search layer of the Salesforce quick-search core.
//!
//! [`OrgSearch`] is the inbound surface the UI layer consumes:
//!
//! - [`objects`](OrgSearch::objects) — display metadata (label, plural
//!   label, icon) for the configured object types, fetched in one
//!   `ui-api/object-info/batch` request.
//! - [`find`](OrgSearch::find) — free-text SOSL search scoped to the
//!   configured object types, optionally narrowed to one type, returning at
//!   most 20 uniform [`SearchRecord`]s with Lightning record URLs.
//! - [`warm_icon_cache`](OrgSearch::warm_icon_cache) — post-login side
//!   effect persisting one SVG icon URL per object type, looked up lazily
//!   while mapping search hits.
//!
//! Queries shorter than three characters return an empty result without a
//! request; every SOSL special character in user input is backslash-escaped
//! before it enters the search expression.

mod error;
mod icons;
mod objects;
mod records;
mod service;
pub mod sosl;

pub use error::{Error, ErrorKind, Result};
pub use objects::ObjectDescriptor;
pub use records::SearchRecord;
pub use service::OrgSearch;
