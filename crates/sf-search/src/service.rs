//! The inbound search surface consumed by the UI layer.

use spotsf_client::RestClient;
use tracing::{debug, instrument};

use crate::error::{Error, ErrorKind, Result};
use crate::icons::{icon_query, svg_icons, IconQueryResult};
use crate::objects::{ObjectDescriptor, ObjectInfoBatch};
use crate::records::{RawSearchResult, SearchRecord};
use crate::sosl;

/// Queries shorter than this return an empty result without a request.
const MIN_QUERY_LENGTH: usize = 3;

/// Search and metadata operations for one org.
///
/// Wraps a [`RestClient`]; the configured object set comes from the client's
/// [`OrgConfig`](spotsf_client::OrgConfig) and bounds every request this
/// type makes.
#[derive(Debug, Clone)]
pub struct OrgSearch {
    client: RestClient,
}

impl OrgSearch {
    /// Create the search surface over an authenticated client.
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }

    /// The underlying client.
    pub fn client(&self) -> &RestClient {
        &self.client
    }

    /// Fetch display metadata for all configured object types in one batched
    /// request. Descriptor order follows the batch response order.
    #[instrument(skip(self))]
    pub async fn objects(&self) -> Result<Vec<ObjectDescriptor>> {
        let names = self.client.config().objects.join(",");
        let path = format!("ui-api/object-info/batch/{}", names);
        let batch: ObjectInfoBatch = self.client.get(&path, &[]).await?;
        Ok(batch
            .results
            .into_iter()
            .map(|entry| entry.result.into())
            .collect())
    }

    /// Full-text search across the configured object types.
    ///
    /// `filter_object` narrows the search to a single type, which must
    /// belong to the configured set. At most 20 records come back; the limit
    /// is part of the search expression, not post-filtering.
    #[instrument(skip(self), fields(query_len = query.chars().count()))]
    pub async fn find(
        &self,
        query: &str,
        filter_object: Option<&str>,
    ) -> Result<Vec<SearchRecord>> {
        if query.chars().count() < MIN_QUERY_LENGTH {
            return Ok(Vec::new());
        }

        let config = self.client.config();
        let objects: Vec<&str> = match filter_object {
            Some(name) => {
                if !config.contains_object(name) {
                    return Err(Error::new(ErrorKind::InvalidInput(format!(
                        "object type '{}' is not in the configured set",
                        name
                    ))));
                }
                vec![name]
            }
            None => config.objects.iter().map(String::as_str).collect(),
        };

        let expression = sosl::find_expression(query, &objects);
        let result: RawSearchResult = self.client.get("search/", &[("q", &expression)]).await?;

        let store = self.client.authenticator().store();
        let records = result
            .search_records
            .into_iter()
            .map(|hit| {
                // Cache misses (and store hiccups) mean no icon, never a
                // failed search.
                let icon_url = store
                    .icon_for_object(&hit.attributes.object_type)
                    .unwrap_or_default();
                SearchRecord {
                    url: config.record_view_url(&hit.attributes.object_type, &hit.id),
                    id: hit.id,
                    object_api_name: hit.attributes.object_type,
                    name: hit.name,
                    icon_url,
                }
            })
            .collect();
        Ok(records)
    }

    /// Populate the persisted icon cache from tab-definition metadata.
    ///
    /// Run after a successful login; each object type keeps its first SVG
    /// icon URL. Replaces whatever the cache held before.
    #[instrument(skip(self))]
    pub async fn warm_icon_cache(&self) -> Result<()> {
        let query = icon_query(&self.client.config().objects);
        let result: IconQueryResult = self.client.get("query/", &[("q", &query)]).await?;
        let icons = svg_icons(result.records);
        debug!(count = icons.len(), "icon cache populated");
        self.client.authenticator().store().set_icons(&icons)?;
        Ok(())
    }
}
