//! Object persistence port

use std::future::Future;
use std::io;
use std::path::PathBuf;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors from persisting or restoring objects.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The handle name cannot be used as a file name.
    #[error("invalid object name: {0:?}")]
    InvalidName(String),

    /// Nothing has been persisted under this handle.
    #[error("object not found: {0}")]
    NotFound(PathBuf),

    /// The object could not be encoded or decoded.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Names a persisted object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectHandle {
    name: String,
}

impl ObjectHandle {
    /// Creates a handle for `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Returns the handle name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Port for writing objects somewhere and reading them back.
///
/// A round trip through `persist` and `restore` must preserve every field.
pub trait ObjectStore: Send + Sync {
    /// Persists `value` under `name`, replacing any previous object.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is unusable or the write fails.
    fn persist<T: Serialize + Sync>(
        &self,
        name: &str,
        value: &T,
    ) -> impl Future<Output = Result<ObjectHandle, StoreError>> + Send;

    /// Restores the object behind `handle`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if nothing was persisted, or an
    /// error if the stored data does not decode as `T`.
    fn restore<T: DeserializeOwned + Send>(
        &self,
        handle: &ObjectHandle,
    ) -> impl Future<Output = Result<T, StoreError>> + Send;
}
