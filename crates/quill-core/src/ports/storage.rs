//! Upload storage port.

use async_trait::async_trait;

/// Where uploaded images end up.
#[async_trait]
pub trait UploadStorage: Send + Sync {
    /// Store `bytes` under `file_name`, replacing any file of the same name.
    ///
    /// Returns the public URL path of the stored file.
    async fn store(&self, file_name: &str, bytes: Vec<u8>) -> Result<String, StorageError>;
}

/// Upload storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Invalid file name: {0}")]
    InvalidName(String),

    #[error("I/O error: {0}")]
    Io(String),
}
