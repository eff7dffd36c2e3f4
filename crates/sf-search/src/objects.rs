//! Object display metadata from the UI API.

use serde::{Deserialize, Serialize};

/// Display metadata for one configured object type.
///
/// Immutable once fetched; fetched fresh per invocation rather than
/// persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectDescriptor {
    /// Object API name, e.g. `Account`.
    pub api_name: String,
    /// Singular display label.
    pub label: String,
    /// Plural display label.
    pub label_plural: String,
    /// Theme icon URL.
    pub icon_url: String,
    /// Theme icon color (hex without `#`).
    pub icon_color: String,
}

/// Wire shape of `ui-api/object-info/batch/<names>`.
#[derive(Debug, Deserialize)]
pub(crate) struct ObjectInfoBatch {
    pub results: Vec<ObjectInfoEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ObjectInfoEntry {
    pub result: ObjectInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ObjectInfo {
    pub api_name: String,
    pub label: String,
    pub label_plural: String,
    #[serde(default)]
    pub theme_info: Option<ThemeInfo>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ThemeInfo {
    #[serde(default)]
    pub icon_url: String,
    #[serde(default)]
    pub color: String,
}

impl From<ObjectInfo> for ObjectDescriptor {
    fn from(info: ObjectInfo) -> Self {
        let theme = info.theme_info.unwrap_or_default();
        Self {
            api_name: info.api_name,
            label: info.label,
            label_plural: info.label_plural,
            icon_url: theme.icon_url,
            icon_color: theme.color,
        }
    }
}
