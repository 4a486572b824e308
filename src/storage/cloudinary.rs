use async_trait::async_trait;
use chrono::Utc;
use reqwest::multipart;
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};

use super::{AttachmentStore, StorageError, file_name};
use crate::config::settings::CloudinaryConfig;
use crate::utils::attachment::{AttachmentKind, DecodedFile};

#[derive(Serialize, Deserialize, Debug)]
pub struct CloudinaryResponse {
    pub public_id: String,
    pub secure_url: String,
    pub format: Option<String>,
}

fn generate_signature(params: &[(&str, String)], api_secret: &str) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let param_string = sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha1::new();
    hasher.update(format!("{}{}", param_string, api_secret));

    format!("{:x}", hasher.finalize())
}

pub struct CloudinaryStore {
    config: CloudinaryConfig,
    client: reqwest::Client,
}

impl CloudinaryStore {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn upload_url(&self) -> String {
        format!(
            "https://api.cloudinary.com/v1_1/{}/auto/upload",
            self.config.cloud_name
        )
    }

    fn folder(&self, application_id: &str) -> String {
        format!("{}/{}", self.config.folder, application_id)
    }

    // Admin API delete-by-prefix, one call per resource type
    fn delete_url(
        &self,
        resource_type: &str,
        application_id: &str,
    ) -> Result<reqwest::Url, StorageError> {
        let mut url = reqwest::Url::parse(&format!(
            "https://api.cloudinary.com/v1_1/{}/resources/{}/upload",
            self.config.cloud_name, resource_type
        ))
        .map_err(|e| StorageError::InvalidUrl(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("prefix", &format!("{}/", self.folder(application_id)));
        Ok(url)
    }
}

// `auto` uploads land as `image` for PDFs; `raw` covers anything else.
const RESOURCE_TYPES: [&str; 2] = ["image", "raw"];

#[async_trait]
impl AttachmentStore for CloudinaryStore {
    async fn store(
        &self,
        application_id: &str,
        kind: AttachmentKind,
        file: &DecodedFile,
    ) -> Result<String, StorageError> {
        let timestamp = Utc::now().timestamp().to_string();
        let folder = self.folder(application_id);

        // signature = sha1("folder=...&timestamp=...<api_secret>")
        let signature = generate_signature(
            &[("folder", folder.clone()), ("timestamp", timestamp.clone())],
            &self.config.api_secret,
        );

        let part = multipart::Part::bytes(file.bytes.clone())
            .file_name(file_name(kind, file))
            .mime_str(&file.mime)?;

        let form = multipart::Form::new()
            .part("file", part)
            .text("timestamp", timestamp)
            .text("api_key", self.config.api_key.clone())
            .text("signature", signature)
            .text("folder", folder);

        let res = self
            .client
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await?;

        if res.status().is_client_error() || res.status().is_server_error() {
            tracing::warn!(status = %res.status(), application_id, "cloudinary upload rejected");
            return Err(StorageError::Rejected(res.status()));
        }

        let response: CloudinaryResponse = res.json().await?;
        tracing::debug!(public_id = %response.public_id, "attachment uploaded");

        Ok(response.secure_url)
    }

    async fn discard(&self, application_id: &str) -> Result<(), StorageError> {
        for resource_type in RESOURCE_TYPES {
            let res = self
                .client
                .delete(self.delete_url(resource_type, application_id)?)
                .basic_auth(&self.config.api_key, Some(&self.config.api_secret))
                .send()
                .await?;

            if !res.status().is_success() {
                tracing::warn!(status = %res.status(), application_id, "cloudinary delete rejected");
                return Err(StorageError::Rejected(res.status()));
            }
        }

        tracing::debug!(application_id, "attachments discarded");
        Ok(())
    }
}
