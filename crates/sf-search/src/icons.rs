//! Icon cache population from tab definitions.
//!
//! Tab metadata carries the per-object icons Lightning shows; one SOQL
//! parent-child query fetches them for the configured object types, and the
//! first SVG per type is persisted for lookup during record mapping.

use std::collections::BTreeMap;

use serde::Deserialize;

const SVG_CONTENT_TYPE: &str = "image/svg+xml";

/// Build the TabDefinition/Icons parent-child query for the given objects.
pub(crate) fn icon_query<S: AsRef<str>>(objects: &[S]) -> String {
    let names = objects
        .iter()
        .map(|obj| format!("'{}'", obj.as_ref().replace('\'', "\\'")))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "SELECT SobjectName, (SELECT Url, ContentType FROM Icons) FROM TabDefinition WHERE SobjectName IN ({})",
        names
    )
}

/// Wire shape of the `query/` response for the icon query.
#[derive(Debug, Deserialize)]
pub(crate) struct IconQueryResult {
    #[serde(default)]
    pub records: Vec<TabDefinitionRecord>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TabDefinitionRecord {
    #[serde(rename = "SobjectName")]
    pub sobject_name: String,
    #[serde(rename = "Icons", default)]
    pub icons: Option<IconSubquery>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct IconSubquery {
    #[serde(default)]
    pub records: Vec<IconRecord>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct IconRecord {
    #[serde(rename = "Url")]
    pub url: String,
    #[serde(rename = "ContentType", default)]
    pub content_type: String,
}

/// Pick the first SVG icon URL per object type.
pub(crate) fn svg_icons(records: Vec<TabDefinitionRecord>) -> BTreeMap<String, String> {
    let mut icons = BTreeMap::new();
    for tab in records {
        let Some(subquery) = tab.icons else { continue };
        if let Some(icon) = subquery
            .records
            .into_iter()
            .find(|icon| icon.content_type == SVG_CONTENT_TYPE)
        {
            icons.entry(tab.sobject_name).or_insert(icon.url);
        }
    }
    icons
}
