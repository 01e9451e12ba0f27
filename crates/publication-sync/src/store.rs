//! Durable single-document cache store.
//!
//! Writes go to a temp file in the destination directory which is synced and
//! then renamed over the destination, so readers never observe a torn file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{StoreError, StoreResult};
use crate::models::CacheDocument;

/// JSON file holding exactly one [`CacheDocument`].
#[derive(Debug, Clone)]
pub struct CacheStore {
    path: PathBuf,
}

impl CacheStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored document.
    ///
    /// Returns `Ok(None)` when nothing has been stored yet. A document that
    /// fails to parse or whose `count` disagrees with its contents is
    /// [`StoreError::Corrupt`], never treated as absent.
    pub fn load(&self) -> StoreResult<Option<CacheDocument>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StoreError::Read { path: self.path.clone(), source }),
        };

        let doc: CacheDocument = serde_json::from_slice(&bytes)
            .map_err(|e| StoreError::corrupt(&self.path, e.to_string()))?;
        doc.validate().map_err(|reason| StoreError::corrupt(&self.path, reason))?;

        Ok(Some(doc))
    }

    /// Atomically replace the stored document.
    pub fn save(&self, doc: &CacheDocument) -> StoreResult<()> {
        let mut bytes = serde_json::to_vec_pretty(doc)
            .map_err(|e| StoreError::persistence(&self.path, format!("cannot serialize: {e}")))?;
        bytes.push(b'\n');

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|e| {
            StoreError::persistence(&self.path, format!("cannot create {}: {e}", dir.display()))
        })?;

        // Dropping the temp file on any early return deletes it.
        let mut temp = tempfile::NamedTempFile::new_in(&dir).map_err(|e| {
            StoreError::persistence(&self.path, format!("cannot create temp file: {e}"))
        })?;
        temp.as_file_mut()
            .write_all(&bytes)
            .map_err(|e| StoreError::persistence(&self.path, format!("cannot write temp file: {e}")))?;
        temp.as_file()
            .sync_all()
            .map_err(|e| StoreError::persistence(&self.path, format!("cannot sync temp file: {e}")))?;
        temp.persist(&self.path)
            .map_err(|e| StoreError::persistence(&self.path, format!("cannot rename temp file: {e}")))?;

        tracing::debug!(path = %self.path.display(), count = doc.count(), "Saved cache document");
        Ok(())
    }

    /// Write the bootstrap document and return it.
    pub fn bootstrap(&self) -> StoreResult<CacheDocument> {
        let doc = CacheDocument::bootstrap();
        self.save(&doc)?;
        Ok(doc)
    }
}
