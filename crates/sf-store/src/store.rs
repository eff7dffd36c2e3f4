//! Store trait and backends.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::error::{Error, ErrorKind, Result};
use crate::tokens::TokenSet;

/// Typed storage for the credential set and the icon cache.
///
/// All writes are durable across process restarts for persistent backends.
/// The interface is deliberately narrow: the schema lives here, not in
/// callers holding string keys.
pub trait SecretStore: Send + Sync {
    /// Load the stored token set, if any.
    fn credentials(&self) -> Result<Option<TokenSet>>;

    /// Persist a token set, replacing any previous one.
    fn set_credentials(&self, tokens: &TokenSet) -> Result<()>;

    /// Remove the stored token set.
    fn clear_credentials(&self) -> Result<()>;

    /// Look up the cached icon URL for an object API name.
    fn icon_for_object(&self, api_name: &str) -> Result<Option<String>>;

    /// Replace the icon cache with the given object-to-URL map.
    fn set_icons(&self, icons: &BTreeMap<String, String>) -> Result<()>;

    /// Remove everything: credentials and icon cache.
    fn clear(&self) -> Result<()>;
}

/// Token document with storage metadata.
#[derive(Debug, Serialize, Deserialize)]
struct StoredTokens {
    tokens: TokenSet,
    stored_at: chrono::DateTime<chrono::Utc>,
}

/// Icon cache document: object API name to icon URL.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredIcons {
    icons: BTreeMap<String, String>,
}

/// File-based store.
///
/// Keeps two JSON documents (`tokens.json`, `icons.json`) in a single
/// directory, `~/.spotsf/` by default.
#[derive(Debug, Clone)]
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    /// Create a file store at the default path.
    pub fn new() -> Result<Self> {
        Ok(Self {
            base_path: default_store_dir()?,
        })
    }

    /// Create a file store at a custom path.
    pub fn with_path(path: impl AsRef<Path>) -> Self {
        Self {
            base_path: path.as_ref().to_path_buf(),
        }
    }

    fn tokens_path(&self) -> PathBuf {
        self.base_path.join("tokens.json")
    }

    fn icons_path(&self) -> PathBuf {
        self.base_path.join("icons.json")
    }

    fn write_document<T: Serialize>(&self, path: &Path, document: &T) -> Result<()> {
        if !self.base_path.exists() {
            std::fs::create_dir_all(&self.base_path)?;
        }

        let json = serde_json::to_string_pretty(document)?;
        std::fs::write(path, json)?;

        // Tokens are secrets: keep them readable by the owner only.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(path, perms)?;
        }

        Ok(())
    }

    fn read_document<T: serde::de::DeserializeOwned>(&self, path: &Path) -> Result<Option<T>> {
        if !path.exists() {
            return Ok(None);
        }
        let json = std::fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&json)?))
    }

    fn remove_document(&self, path: &Path) -> Result<()> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

impl SecretStore for FileStore {
    fn credentials(&self) -> Result<Option<TokenSet>> {
        let stored: Option<StoredTokens> = self.read_document(&self.tokens_path())?;
        Ok(stored.map(|s| s.tokens))
    }

    fn set_credentials(&self, tokens: &TokenSet) -> Result<()> {
        let stored = StoredTokens {
            tokens: tokens.clone(),
            stored_at: chrono::Utc::now(),
        };
        self.write_document(&self.tokens_path(), &stored)
    }

    fn clear_credentials(&self) -> Result<()> {
        self.remove_document(&self.tokens_path())
    }

    fn icon_for_object(&self, api_name: &str) -> Result<Option<String>> {
        let stored: Option<StoredIcons> = self.read_document(&self.icons_path())?;
        Ok(stored.and_then(|s| s.icons.get(api_name).cloned()))
    }

    fn set_icons(&self, icons: &BTreeMap<String, String>) -> Result<()> {
        let stored = StoredIcons {
            icons: icons.clone(),
        };
        self.write_document(&self.icons_path(), &stored)
    }

    fn clear(&self) -> Result<()> {
        self.clear_credentials()?;
        self.remove_document(&self.icons_path())
    }
}

/// In-memory store for tests and hosts without a home directory.
///
/// Not durable; interior mutability via `RwLock` so it can be shared behind
/// the same `Arc<dyn SecretStore>` seam as the file backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tokens: RwLock<Option<TokenSet>>,
    icons: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SecretStore for MemoryStore {
    fn credentials(&self) -> Result<Option<TokenSet>> {
        Ok(self.tokens.read().expect("store lock poisoned").clone())
    }

    fn set_credentials(&self, tokens: &TokenSet) -> Result<()> {
        *self.tokens.write().expect("store lock poisoned") = Some(tokens.clone());
        Ok(())
    }

    fn clear_credentials(&self) -> Result<()> {
        *self.tokens.write().expect("store lock poisoned") = None;
        Ok(())
    }

    fn icon_for_object(&self, api_name: &str) -> Result<Option<String>> {
        Ok(self
            .icons
            .read()
            .expect("store lock poisoned")
            .get(api_name)
            .cloned())
    }

    fn set_icons(&self, icons: &BTreeMap<String, String>) -> Result<()> {
        *self.icons.write().expect("store lock poisoned") = icons.clone();
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.clear_credentials()?;
        self.icons.write().expect("store lock poisoned").clear();
        Ok(())
    }
}

/// Get the default store directory.
pub fn default_store_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| {
        Error::new(ErrorKind::Config("Could not find home directory".to_string()))
    })?;
    Ok(home.join(".spotsf"))
}
