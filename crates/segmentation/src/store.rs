//! Durable storage boundary for the segment catalog.

use crm_core::{CrmError, CrmResult};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Opaque blob storage for the serialized catalog.
///
/// The catalog is always written and read as a single unit; implementations
/// never see individual segments and perform no partial writes.
pub trait SegmentStore: Send + Sync {
    /// Read the stored catalog blob. `None` means nothing has been written yet.
    fn read(&self) -> CrmResult<Option<String>>;

    /// Replace the stored catalog blob.
    fn write(&self, payload: &str) -> CrmResult<()>;
}

/// Catalog storage in a single JSON file.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SegmentStore for FileStore {
    fn read(&self) -> CrmResult<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        std::fs::read_to_string(&self.path).map(Some).map_err(|e| {
            CrmError::StoreUnavailable(format!("read {}: {e}", self.path.display()))
        })
    }

    fn write(&self, payload: &str) -> CrmResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    CrmError::StoreUnavailable(format!("create {}: {e}", parent.display()))
                })?;
            }
        }
        std::fs::write(&self.path, payload).map_err(|e| {
            CrmError::StoreUnavailable(format!("write {}: {e}", self.path.display()))
        })?;
        debug!(path = %self.path.display(), bytes = payload.len(), "Catalog blob written");
        Ok(())
    }
}

/// In-memory blob store for tests and ephemeral catalogs.
#[derive(Default)]
pub struct MemoryStore {
    blob: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SegmentStore for MemoryStore {
    fn read(&self) -> CrmResult<Option<String>> {
        Ok(self.blob.lock().clone())
    }

    fn write(&self, payload: &str) -> CrmResult<()> {
        *self.blob.lock() = Some(payload.to_string());
        Ok(())
    }
}
