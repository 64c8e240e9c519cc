use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use crate::database::ports::songs::SongRepository;
use crate::domain::{NewSong, SongAudio, SongId, SongSummary};
use crate::error::{Result, StoreError};

#[derive(Debug, Clone)]
pub struct PostgresSongRepository {
    pool: PgPool,
}

impl PostgresSongRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl SongRepository for PostgresSongRepository {
    #[instrument(skip(self), level = "trace")]
    async fn insert(&self, song: NewSong) -> Result<SongId> {
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO songs (name, file_data, content_type)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(&song.name)
        .bind(&song.file_data)
        .bind(song.content_type.as_deref())
        .fetch_one(self.pool())
        .await
        .map_err(|e| {
            StoreError::Storage(format!("Failed to insert song: {e}"))
        })?;

        debug!(song_id = id, bytes = song.file_data.len(), "song row inserted");
        Ok(SongId(id))
    }

    #[instrument(skip(self), level = "trace")]
    async fn list(&self) -> Result<Vec<SongSummary>> {
        sqlx::query_as::<_, SongSummary>(
            r#"
            SELECT id, name
            FROM songs
            ORDER BY id
            "#,
        )
        .fetch_all(self.pool())
        .await
        .map_err(|e| StoreError::Storage(format!("Failed to list songs: {e}")))
    }

    #[instrument(skip(self), level = "trace")]
    async fn find_audio(&self, id: SongId) -> Result<Option<SongAudio>> {
        sqlx::query_as::<_, SongAudio>(
            r#"
            SELECT name, file_data, content_type
            FROM songs
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| {
            StoreError::Storage(format!("Failed to load song {id}: {e}"))
        })
    }

    #[instrument(skip(self), level = "trace")]
    async fn delete(&self, id: SongId) -> Result<u64> {
        let result = sqlx::query("DELETE FROM songs WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(|e| {
                StoreError::Storage(format!("Failed to delete song {id}: {e}"))
            })?;

        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(self.pool())
            .await
            .map_err(|e| {
                StoreError::Storage(format!("Database ping failed: {e}"))
            })?;
        Ok(())
    }
}
