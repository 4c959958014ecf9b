//! Object storage for uploaded documents
//!
//! Files land under `<root>/<bucket>/<uuid>.<ext>` and are served from
//! `<public_base>/<bucket>/<key>`. The returned public URL is what gets stored
//! on the application or minutes row.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

use crate::error::PortalError;

pub const SCHOLARSHIP_BUCKET: &str = "scholarship-documents";
pub const MINUTES_BUCKET: &str = "meeting-minutes";

const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "png", "jpg", "jpeg"];

/// An upload as posted by the browser
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadRequest {
    pub file_name: String,
    pub content_base64: String,
}

impl UploadRequest {
    pub fn decode(&self) -> Result<Vec<u8>, PortalError> {
        STANDARD
            .decode(self.content_base64.trim())
            .map_err(|e| PortalError::ValidationError(format!("Upload is not valid base64: {}", e)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredObject {
    pub bucket: String,
    pub key: String,
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct ObjectStore {
    root: PathBuf,
    public_base: String,
}

impl ObjectStore {
    pub fn new(root: impl Into<PathBuf>, public_base: &str) -> Self {
        Self {
            root: root.into(),
            public_base: public_base.trim_end_matches('/').to_string(),
        }
    }

    /// Store `bytes` under a random key in `bucket`
    pub async fn put(
        &self,
        bucket: &str,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<StoredObject, PortalError> {
        if bytes.is_empty() {
            return Err(PortalError::ValidationError("Uploaded file is empty".to_string()));
        }
        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(PortalError::ValidationError(format!(
                "Uploaded file is {} bytes; the limit is {} bytes",
                bytes.len(),
                MAX_UPLOAD_BYTES
            )));
        }

        let extension = extension_of(file_name)?;
        let key = format!("{}.{}", Uuid::new_v4(), extension);

        let dir = self.root.join(bucket);
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(&key), bytes).await?;

        let url = format!("{}/{}/{}", self.public_base, bucket, key);
        info!("Stored {} ({} bytes) as {}/{}", file_name, bytes.len(), bucket, key);

        Ok(StoredObject {
            bucket: bucket.to_string(),
            key,
            url,
        })
    }

    pub async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, PortalError> {
        if key.contains('/') || key.contains("..") || bucket.contains('/') || bucket.contains("..") {
            return Err(PortalError::NotFound(format!("{}/{}", bucket, key)));
        }
        match tokio::fs::read(self.root.join(bucket).join(key)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(PortalError::NotFound(format!("{}/{}", bucket, key)))
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn extension_of(file_name: &str) -> Result<String, PortalError> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    if ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        Ok(extension)
    } else {
        Err(PortalError::ValidationError(format!(
            "Unsupported file type for {}; allowed: {}",
            file_name,
            ALLOWED_EXTENSIONS.join(", ")
        )))
    }
}
