use std::path::PathBuf;

use async_trait::async_trait;
use tokio::{fs, io::AsyncWriteExt};

use super::{AttachmentStore, StorageError, file_name};
use crate::utils::attachment::{AttachmentKind, DecodedFile};

/// Writes attachments under `<root>/<application id>/`.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl AttachmentStore for LocalStore {
    async fn store(
        &self,
        application_id: &str,
        kind: AttachmentKind,
        file: &DecodedFile,
    ) -> Result<String, StorageError> {
        let dir = self.root.join(application_id);
        fs::create_dir_all(&dir).await?;

        let path = dir.join(file_name(kind, file));
        let mut output = fs::File::create(&path).await?;
        output.write_all(&file.bytes).await?;
        output.flush().await?;

        tracing::debug!(path = %path.display(), bytes = file.bytes.len(), "attachment stored");
        Ok(path.to_string_lossy().into_owned())
    }

    async fn discard(&self, application_id: &str) -> Result<(), StorageError> {
        match fs::remove_dir_all(self.root.join(application_id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_file_per_application() {
        let root = std::env::temp_dir().join(format!("portal-store-{}", std::process::id()));
        let store = LocalStore::new(&root);
        let file = DecodedFile {
            mime: "application/pdf".to_string(),
            extension: "pdf",
            bytes: b"%PDF-1.4".to_vec(),
        };

        let location = store
            .store("REG-20260106-ABCDEF01", AttachmentKind::Ktm, &file)
            .await
            .unwrap();

        assert!(location.ends_with("ktm.pdf"));
        assert_eq!(fs::read(&location).await.unwrap(), b"%PDF-1.4");
        fs::remove_dir_all(&root).await.unwrap();
    }

    #[tokio::test]
    async fn discard_removes_the_application_directory() {
        let root = std::env::temp_dir().join(format!("portal-discard-{}", std::process::id()));
        let store = LocalStore::new(&root);
        let file = DecodedFile {
            mime: "application/pdf".to_string(),
            extension: "pdf",
            bytes: b"%PDF-1.4".to_vec(),
        };
        store
            .store("REG-20260106-DEADBEEF", AttachmentKind::Cv, &file)
            .await
            .unwrap();

        store.discard("REG-20260106-DEADBEEF").await.unwrap();

        assert!(!root.join("REG-20260106-DEADBEEF").exists());
        // Nothing left to remove is not an error
        store.discard("REG-20260106-DEADBEEF").await.unwrap();
        fs::remove_dir_all(&root).await.unwrap();
    }
}
