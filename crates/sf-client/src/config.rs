//! Org configuration.
//!
//! One explicit struct built at process start and passed by reference into
//! the client; no module-level globals.

use crate::error::{Error, ErrorKind, Result};

/// Default Salesforce API version.
pub const DEFAULT_API_VERSION: &str = "62.0";

/// Object types searched when no extras are configured.
pub const DEFAULT_OBJECTS: [&str; 3] = ["Account", "Contact", "Opportunity"];

/// Configuration for one Salesforce org.
#[derive(Debug, Clone)]
pub struct OrgConfig {
    /// Org domain prefix, e.g. `acme` for `acme.my.salesforce.com`.
    pub domain: String,
    /// REST API version, e.g. `62.0`.
    pub api_version: String,
    /// Configured object API names. Every search and metadata request is
    /// scoped to this set.
    pub objects: Vec<String>,
    /// Override for the API base URL (sandboxes, tests). When unset the URL
    /// is derived from the domain.
    instance_url: Option<String>,
}

impl OrgConfig {
    /// Create a config for the given org domain with the default object set.
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            objects: DEFAULT_OBJECTS.iter().map(|s| s.to_string()).collect(),
            instance_url: None,
        }
    }

    /// Load the config from environment variables.
    ///
    /// `SPOTSF_DOMAIN` is required; `SPOTSF_API_VERSION` and
    /// `SPOTSF_OBJECTS` (comma-separated extras) are optional.
    pub fn from_env() -> Result<Self> {
        let domain = std::env::var("SPOTSF_DOMAIN").map_err(|_| {
            Error::new(ErrorKind::Config(
                "SPOTSF_DOMAIN environment variable not set".to_string(),
            ))
        })?;

        let mut config = Self::new(domain);
        if let Ok(version) = std::env::var("SPOTSF_API_VERSION") {
            config.api_version = version;
        }
        if let Ok(extras) = std::env::var("SPOTSF_OBJECTS") {
            config = config.with_additional_objects(&extras);
        }
        Ok(config)
    }

    /// Set the API version.
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Append extra object API names from a comma-separated list, keeping
    /// the default three in front.
    pub fn with_additional_objects(mut self, extras: &str) -> Self {
        self.objects.extend(
            extras
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from),
        );
        self
    }

    /// Replace the configured object set entirely.
    pub fn with_objects(mut self, objects: Vec<String>) -> Self {
        self.objects = objects;
        self
    }

    /// Point API requests at an explicit base URL instead of the derived
    /// `my.salesforce.com` host.
    pub fn with_instance_url(mut self, url: impl Into<String>) -> Self {
        self.instance_url = Some(url.into().trim_end_matches('/').to_string());
        self
    }

    /// Whether an object API name belongs to the configured set.
    pub fn contains_object(&self, api_name: &str) -> bool {
        self.objects.iter().any(|o| o == api_name)
    }

    /// API base URL for this org.
    pub fn base_url(&self) -> String {
        match &self.instance_url {
            Some(url) => url.clone(),
            None => format!("https://{}.my.salesforce.com", self.domain),
        }
    }

    /// REST API URL for a path under `/services/data/v<version>/`.
    pub fn rest_url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!(
            "{}/services/data/v{}/{}",
            self.base_url(),
            self.api_version,
            path
        )
    }

    /// Lightning-experience host for this org.
    pub fn lightning_url(&self) -> String {
        format!("https://{}.lightning.force.com", self.domain)
    }

    /// Lightning record detail page for an object type and record id.
    pub fn record_view_url(&self, object_api_name: &str, record_id: &str) -> String {
        format!(
            "{}/lightning/r/{}/{}/view",
            self.lightning_url(),
            object_api_name,
            record_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_objects() {
        let config = OrgConfig::new("acme");
        assert_eq!(config.objects, vec!["Account", "Contact", "Opportunity"]);
        assert!(config.contains_object("Contact"));
        assert!(!config.contains_object("Lead"));
    }

    #[test]
    fn test_additional_objects_are_appended() {
        let config = OrgConfig::new("acme").with_additional_objects("Lead, Case,,Asset ");
        assert_eq!(
            config.objects,
            vec!["Account", "Contact", "Opportunity", "Lead", "Case", "Asset"]
        );
    }

    #[test]
    fn test_urls_derive_from_domain() {
        let config = OrgConfig::new("acme");
        assert_eq!(config.base_url(), "https://acme.my.salesforce.com");
        assert_eq!(
            config.rest_url("search/"),
            "https://acme.my.salesforce.com/services/data/v62.0/search/"
        );
        assert_eq!(
            config.lightning_url(),
            "https://acme.lightning.force.com"
        );
    }

    #[test]
    fn test_record_view_url() {
        let config = OrgConfig::new("acme");
        assert_eq!(
            config.record_view_url("Account", "001xx"),
            "https://acme.lightning.force.com/lightning/r/Account/001xx/view"
        );
    }

    #[test]
    fn test_instance_url_override() {
        let config = OrgConfig::new("acme").with_instance_url("http://127.0.0.1:8080/");
        assert_eq!(config.base_url(), "http://127.0.0.1:8080");
        assert_eq!(
            config.rest_url("query/"),
            "http://127.0.0.1:8080/services/data/v62.0/query/"
        );
        // The record URL still points at the real org.
        assert_eq!(
            config.record_view_url("Contact", "003xx"),
            "https://acme.lightning.force.com/lightning/r/Contact/003xx/view"
        );
    }
}
