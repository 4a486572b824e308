use std::sync::Arc;

use crate::config::{
    Config, database,
    settings::{StorageBackend, UploadBackend},
};
use crate::repositories::{
    ApplicationRepository, MemoryApplicationRepository, MySqlApplicationRepository,
};
use crate::storage::{AttachmentStore, CloudinaryStore, LocalStore};

/// Shared handles injected into every handler through `Extension`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub repository: Arc<dyn ApplicationRepository>,
    pub attachments: Arc<dyn AttachmentStore>,
}

impl AppState {
    pub fn new(
        config: Config,
        repository: Arc<dyn ApplicationRepository>,
        attachments: Arc<dyn AttachmentStore>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            repository,
            attachments,
        }
    }

    pub async fn from_config(config: Config) -> Result<Self, sqlx::Error> {
        let repository: Arc<dyn ApplicationRepository> = match &config.storage {
            StorageBackend::MySql { database_url } => {
                let pool = database::connect(database_url).await?;
                Arc::new(MySqlApplicationRepository::new(pool))
            }
            StorageBackend::Memory => Arc::new(MemoryApplicationRepository::new()),
        };

        let attachments: Arc<dyn AttachmentStore> = match &config.uploads {
            UploadBackend::Local { dir } => {
                tracing::info!("Storing attachments under {}", dir.display());
                Arc::new(LocalStore::new(dir.clone()))
            }
            UploadBackend::Cloudinary(cloudinary) => {
                tracing::info!("Uploading attachments to Cloudinary");
                Arc::new(CloudinaryStore::new(cloudinary.clone()))
            }
        };

        Ok(Self::new(config, repository, attachments))
    }
}
