use async_trait::async_trait;

use crate::domain::{NewSong, SongAudio, SongId, SongSummary};
use crate::error::Result;

/// Persistence boundary for song rows.
///
/// Every call is an independent statement; implementations must not group
/// calls into a shared transaction.
#[async_trait]
pub trait SongRepository: Send + Sync {
    /// Insert one row and return the id storage assigned to it.
    async fn insert(&self, song: NewSong) -> Result<SongId>;

    /// Every stored song, without payloads, in ascending id order.
    async fn list(&self) -> Result<Vec<SongSummary>>;

    async fn find_audio(&self, id: SongId) -> Result<Option<SongAudio>>;

    /// Remove a row, returning the number of rows affected (0 or 1).
    async fn delete(&self, id: SongId) -> Result<u64>;

    /// Cheap round-trip used by health checks.
    async fn ping(&self) -> Result<()>;
}
