use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::config::settings::test_config;
use crate::repositories::{ApplicationRepository, MockApplicationRepository};
use crate::state::AppState;
use crate::storage::{AttachmentStore, StorageError};
use crate::utils::attachment::{AttachmentKind, DecodedFile};

/// Attachment store that remembers what it was asked to keep.
#[derive(Default)]
pub struct RecordingStore {
    pub stored: Mutex<Vec<(String, AttachmentKind)>>,
    pub discarded: Mutex<Vec<String>>,
    fail_on: Option<AttachmentKind>,
}

impl RecordingStore {
    /// Store that refuses one kind of attachment.
    pub fn failing_on(kind: AttachmentKind) -> Self {
        Self {
            fail_on: Some(kind),
            ..Self::default()
        }
    }
}

#[async_trait]
impl AttachmentStore for RecordingStore {
    async fn store(
        &self,
        application_id: &str,
        kind: AttachmentKind,
        _file: &DecodedFile,
    ) -> Result<String, StorageError> {
        if self.fail_on == Some(kind) {
            return Err(StorageError::Rejected(reqwest::StatusCode::BAD_GATEWAY));
        }
        if let Ok(mut stored) = self.stored.lock() {
            stored.push((application_id.to_string(), kind));
        }
        Ok(format!("memory://{}/{:?}", application_id, kind))
    }

    async fn discard(&self, application_id: &str) -> Result<(), StorageError> {
        if let Ok(mut stored) = self.stored.lock() {
            stored.retain(|(id, _)| id != application_id);
        }
        if let Ok(mut discarded) = self.discarded.lock() {
            discarded.push(application_id.to_string());
        }
        Ok(())
    }
}

pub fn state_with_store(
    repository: impl ApplicationRepository + 'static,
    store: Arc<RecordingStore>,
) -> AppState {
    AppState::new(test_config(), Arc::new(repository), store)
}

pub fn state_with(repository: impl ApplicationRepository + 'static) -> (AppState, Arc<RecordingStore>) {
    let store = Arc::new(RecordingStore::default());
    (state_with_store(repository, store.clone()), store)
}

pub fn mock_state(repository: MockApplicationRepository) -> AppState {
    state_with(repository).0
}
