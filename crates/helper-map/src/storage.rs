/*
[INPUT]:  Storage directory, string keys and values
[OUTPUT]: Cross-view key-value store persisted as a JSON file
[POS]:    Persistence layer - shared "local storage" read by sibling views
[UPDATE]: When changing the storage file layout or cached keys
*/

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use helper_map_adapter::Coordinate;
use thiserror::Error;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Key holding the last resolved coordinate as `{"lat": .., "lng": ..}`.
pub const USER_LOCATION_KEY: &str = "userLocation";

const STORAGE_FILE: &str = "local_storage.json";
const APP_DIR: &str = "helper-map";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("could not determine data directory")]
    NoDataDir,

    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage file is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// String key-value store shared by every view of the application.
///
/// Values are opaque strings, the same contract browser local storage offers;
/// typed helpers on top encode JSON.
#[derive(Debug)]
pub struct LocalStorage {
    path: PathBuf,
    items: Mutex<BTreeMap<String, String>>,
}

impl LocalStorage {
    /// Open the store under the platform data directory.
    pub async fn open_default() -> Result<Self, StorageError> {
        let data_dir = dirs::data_dir()
            .ok_or(StorageError::NoDataDir)?
            .join(APP_DIR);
        Self::open(data_dir).await
    }

    /// Open (or create) the store in `dir`.
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).await?;
        let path = dir.join(STORAGE_FILE);
        let items = Self::load_items(&path).await?;
        debug!(path = %path.display(), items = items.len(), "local storage opened");

        Ok(Self {
            path,
            items: Mutex::new(items),
        })
    }

    async fn load_items(path: &Path) -> Result<BTreeMap<String, String>, StorageError> {
        if !fs::try_exists(path).await? {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(path).await?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn get_item(&self, key: &str) -> Option<String> {
        self.items.lock().await.get(key).cloned()
    }

    /// Insert or overwrite `key` and flush to disk.
    pub async fn set_item(&self, key: &str, value: impl Into<String>) -> Result<(), StorageError> {
        let mut items = self.items.lock().await;
        items.insert(key.to_string(), value.into());
        self.save_items(&items).await
    }

    async fn save_items(&self, items: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let content = serde_json::to_string_pretty(items)?;
        fs::write(&self.path, content).await?;
        Ok(())
    }

    /// Overwrite the cached user location.
    pub async fn set_user_location(&self, at: Coordinate) -> Result<(), StorageError> {
        let value = serde_json::to_string(&at)?;
        self.set_item(USER_LOCATION_KEY, value).await
    }

    /// Cached user location, if present and readable.
    pub async fn user_location(&self) -> Option<Coordinate> {
        let raw = self.get_item(USER_LOCATION_KEY).await?;
        match serde_json::from_str::<Coordinate>(&raw) {
            Ok(coordinate) => Some(coordinate),
            Err(err) => {
                warn!(error = %err, "ignoring unreadable cached user location");
                None
            }
        }
    }
}
