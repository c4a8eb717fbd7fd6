//! File-based object store.
//!
//! Each object lives in `<root>/<name>.json`, written with the stable JSON
//! format from [`crate::serialization`].

use std::io::ErrorKind;
use std::path::PathBuf;

use restcheck_application::ports::{ObjectHandle, ObjectStore, StoreError};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::fs;
use tracing::debug;

use crate::serialization::{from_json_bytes, to_json_stable_bytes};

/// Stores objects as JSON files under a root directory.
#[derive(Debug, Clone)]
pub struct FileObjectStore {
    root: PathBuf,
}

impl FileObjectStore {
    /// Creates a store rooted at `root`. The directory is created on first write.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the file path for an object name.
    fn object_path(&self, name: &str) -> Result<PathBuf, StoreError> {
        let usable = !name.is_empty()
            && name != "."
            && name != ".."
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if usable {
            Ok(self.root.join(format!("{name}.json")))
        } else {
            Err(StoreError::InvalidName(name.to_string()))
        }
    }
}

impl ObjectStore for FileObjectStore {
    async fn persist<T: Serialize + Sync>(
        &self,
        name: &str,
        value: &T,
    ) -> Result<ObjectHandle, StoreError> {
        let path = self.object_path(name)?;
        let content =
            to_json_stable_bytes(value).map_err(|e| StoreError::Serialization(e.to_string()))?;

        fs::create_dir_all(&self.root).await?;
        fs::write(&path, &content).await?;

        debug!(path = %path.display(), bytes = content.len(), "object persisted");
        Ok(ObjectHandle::new(name))
    }

    async fn restore<T: DeserializeOwned + Send>(
        &self,
        handle: &ObjectHandle,
    ) -> Result<T, StoreError> {
        let path = self.object_path(handle.name())?;
        let content = fs::read(&path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                StoreError::NotFound(path.clone())
            } else {
                StoreError::Io(e)
            }
        })?;

        from_json_bytes(&content).map_err(|e| StoreError::Serialization(e.to_string()))
    }
}
