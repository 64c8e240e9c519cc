use std::{fmt, sync::Arc};

use tracing::{debug, info, instrument};

use super::upload::UploadPart;
use crate::database::ports::songs::SongRepository;
use crate::domain::{NewSong, SongAudio, SongId, SongSummary};
use crate::error::{Result, StoreError};

/// Outcome of a fully successful upload batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSummary {
    pub ids: Vec<SongId>,
    pub bytes: usize,
}

/// The media store: upload, list, stream and delete songs.
///
/// Each file of an upload is committed on its own. A failure part-way through
/// a batch leaves the rows already written in place.
#[derive(Clone)]
pub struct SongService {
    repo: Arc<dyn SongRepository>,
}

impl fmt::Debug for SongService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SongService").finish_non_exhaustive()
    }
}

impl SongService {
    pub fn new(repo: Arc<dyn SongRepository>) -> Self {
        Self { repo }
    }

    #[instrument(skip_all, fields(files = parts.len()))]
    pub async fn upload<P: UploadPart>(
        &self,
        parts: Vec<P>,
    ) -> Result<UploadSummary> {
        if parts.is_empty() {
            return Err(StoreError::BadRequest("No files were uploaded".into()));
        }

        let mut summary = UploadSummary {
            ids: Vec::with_capacity(parts.len()),
            bytes: 0,
        };

        // Parts are consumed one at a time so each staging copy is released
        // as soon as its row is written; on error the rest drop with the
        // iterator.
        for mut part in parts {
            let file_data = part.read_payload().await?;
            let bytes = file_data.len();
            let name = part.display_name().to_owned();

            let id = self
                .repo
                .insert(NewSong {
                    name,
                    file_data,
                    content_type: part.content_type().map(str::to_owned),
                })
                .await?;

            debug!(song_id = %id, bytes, "stored uploaded file");
            summary.ids.push(id);
            summary.bytes += bytes;
        }

        info!(
            stored = summary.ids.len(),
            bytes = summary.bytes,
            "upload batch stored"
        );
        Ok(summary)
    }

    pub async fn list(&self) -> Result<Vec<SongSummary>> {
        self.repo.list().await
    }

    pub async fn get_audio(&self, id: SongId) -> Result<SongAudio> {
        self.repo
            .find_audio(id)
            .await?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    pub async fn delete(&self, id: SongId) -> Result<()> {
        match self.repo.delete(id).await? {
            0 => Err(StoreError::NotFound(id.to_string())),
            _ => {
                info!(song_id = %id, "song deleted");
                Ok(())
            }
        }
    }

    pub async fn ping(&self) -> Result<()> {
        self.repo.ping().await
    }
}
