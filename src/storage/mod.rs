use async_trait::async_trait;
use thiserror::Error;

use crate::utils::attachment::{AttachmentKind, DecodedFile};

pub mod cloudinary;
pub mod local;

pub use cloudinary::CloudinaryStore;
pub use local::LocalStore;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to write attachment: {0}")]
    Io(#[from] std::io::Error),
    #[error("upload request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("invalid storage url: {0}")]
    InvalidUrl(String),
    #[error("upload rejected with status {0}")]
    Rejected(reqwest::StatusCode),
}

/// Destination for applicant documents. Returns the location persisted on
/// the application record.
#[async_trait]
pub trait AttachmentStore: Send + Sync {
    async fn store(
        &self,
        application_id: &str,
        kind: AttachmentKind,
        file: &DecodedFile,
    ) -> Result<String, StorageError>;

    /// Remove everything stored for an application that was never recorded.
    async fn discard(&self, application_id: &str) -> Result<(), StorageError>;
}

/// File name for one attachment, e.g. `surat_komitmen.pdf`.
pub fn file_name(kind: AttachmentKind, file: &DecodedFile) -> String {
    format!("{}.{}", stringcase::snake_case(kind.label()), file.extension)
}
