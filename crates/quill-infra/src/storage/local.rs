//! Local-disk upload storage.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use quill_core::ports::{StorageError, UploadStorage};

/// Stores uploads as plain files in one directory, under the name the client sent.
///
/// Two uploads with the same name overwrite each other.
pub struct LocalUploadStorage {
    root: PathBuf,
    public_prefix: String,
}

impl LocalUploadStorage {
    /// `public_prefix` is the URL path the directory is served under, e.g. `/uploads`.
    pub fn new(root: impl Into<PathBuf>, public_prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_prefix: public_prefix.into().trim_end_matches('/').to_string(),
        }
    }

    /// Reduce a client-supplied name to its final path component.
    fn sanitize(file_name: &str) -> Result<String, StorageError> {
        Path::new(file_name)
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.is_empty())
            .map(str::to_owned)
            .ok_or_else(|| StorageError::InvalidName(file_name.to_string()))
    }
}

#[async_trait]
impl UploadStorage for LocalUploadStorage {
    async fn store(&self, file_name: &str, bytes: Vec<u8>) -> Result<String, StorageError> {
        let name = Self::sanitize(file_name)?;

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?;
        tokio::fs::write(self.root.join(&name), &bytes)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?;

        tracing::debug!(file = %name, size = bytes.len(), "Upload stored");
        Ok(format!("{}/{}", self.public_prefix, name))
    }
}
