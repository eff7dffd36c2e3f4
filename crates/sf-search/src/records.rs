//! Search hit wire types and the uniform record shape.

use serde::{Deserialize, Serialize};

/// One search hit, mapped to a uniform shape for the UI layer.
///
/// Produced fresh per query and never mutated afterwards. `url` resolves to
/// the record's Lightning detail page; `icon_url` comes from the icon cache
/// and is `None` on a cache miss.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRecord {
    /// Record id.
    pub id: String,
    /// Object API name of the hit, always one of the configured types.
    pub object_api_name: String,
    /// Record display name.
    pub name: String,
    /// Lightning record detail URL.
    pub url: String,
    /// Cached icon URL for the object type, if any.
    pub icon_url: Option<String>,
}

/// Wire shape of the `search/` response.
#[derive(Debug, Deserialize)]
pub(crate) struct RawSearchResult {
    #[serde(rename = "searchRecords", default)]
    pub search_records: Vec<RawSearchRecord>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawSearchRecord {
    pub attributes: RawRecordAttributes,
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
}

/// Hit attributes. The response also carries a canonical API resource URL
/// here; the record URL is synthesized from the Lightning template instead,
/// so only the type is kept.
#[derive(Debug, Deserialize)]
pub(crate) struct RawRecordAttributes {
    #[serde(rename = "type")]
    pub object_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_search_result_deserialization() {
        let json = r#"{
            "searchRecords": [
                {
                    "attributes": {
                        "type": "Account",
                        "url": "/services/data/v62.0/sobjects/Account/001xx"
                    },
                    "Id": "001xx",
                    "Name": "Acme Corp"
                }
            ]
        }"#;

        let result: RawSearchResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.search_records.len(), 1);
        let hit = &result.search_records[0];
        assert_eq!(hit.attributes.object_type, "Account");
        assert_eq!(hit.id, "001xx");
        assert_eq!(hit.name, "Acme Corp");
    }

    #[test]
    fn test_empty_search_result() {
        let result: RawSearchResult = serde_json::from_str(r#"{"searchRecords": []}"#).unwrap();
        assert!(result.search_records.is_empty());
    }
}
