//! Disk staging for multipart uploads.
//!
//! Each accepted file field is streamed chunk by chunk into a
//! [`NamedTempFile`] inside the configured staging directory. The temp file
//! is deleted when its [`StagedFile`] drops, whether or not the row made it
//! into the database.

use std::path::Path;

use async_trait::async_trait;
use axum::extract::multipart::Field;
use songvault_core::{StoreError, UploadPart};
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::infra::errors::AppResult;

/// Multipart field name that carries song files.
pub const AUDIO_FIELD: &str = "audio";

const GENERIC_BINARY: &str = "application/octet-stream";

#[derive(Debug)]
pub struct StagedFile {
    name: String,
    content_type: Option<String>,
    file: NamedTempFile,
}

impl StagedFile {
    /// Drain `field` into a new temp file under `dir`.
    pub async fn stage(mut field: Field<'_>, dir: &Path) -> AppResult<Self> {
        let name = field.file_name().unwrap_or_default().to_owned();
        let content_type = resolve_content_type(&name, field.content_type());

        let file = tempfile::Builder::new()
            .prefix("songvault-upload-")
            .tempfile_in(dir)?;
        let mut writer = tokio::fs::File::from_std(file.reopen()?);
        let mut len = 0u64;

        while let Some(chunk) = field.chunk().await? {
            writer.write_all(&chunk).await?;
            len += chunk.len() as u64;
        }
        writer.flush().await?;

        debug!(
            file_name = %name,
            bytes = len,
            path = %file.path().display(),
            "staged upload field"
        );

        Ok(Self {
            name,
            content_type,
            file,
        })
    }
}

#[async_trait]
impl UploadPart for StagedFile {
    fn display_name(&self) -> &str {
        &self.name
    }

    fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    async fn read_payload(&mut self) -> Result<Vec<u8>, StoreError> {
        Ok(tokio::fs::read(self.file.path()).await?)
    }
}

/// Prefer the part's declared type; fall back to a guess from the filename
/// when the client sent nothing or only the generic binary type.
fn resolve_content_type(name: &str, declared: Option<&str>) -> Option<String> {
    match declared.map(str::trim) {
        Some(value) if !value.is_empty() && value != GENERIC_BINARY => {
            Some(value.to_owned())
        }
        _ => mime_guess::from_path(name).first_raw().map(str::to_owned),
    }
}
