//! In-process [`SongRepository`] used by tests and local experiments.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::database::ports::songs::SongRepository;
use crate::domain::{NewSong, Song, SongAudio, SongId, SongSummary};
use crate::error::{Result, StoreError};

#[derive(Debug, Default)]
struct Inner {
    rows: BTreeMap<SongId, Song>,
    last_id: i64,
    inserts_before_failure: Option<usize>,
    unavailable: bool,
}

#[derive(Debug, Default)]
pub struct InMemorySongRepository {
    inner: Mutex<Inner>,
}

impl InMemorySongRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Let `n` more inserts succeed, then fail every following insert.
    pub fn fail_inserts_after(&self, n: usize) {
        self.inner.lock().inserts_before_failure = Some(n);
    }

    /// Make every operation fail as if the database were unreachable.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.inner.lock().unavailable = unavailable;
    }

    pub fn len(&self) -> usize {
        self.inner.lock().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of every stored row, including payloads.
    pub fn rows(&self) -> Vec<Song> {
        self.inner.lock().rows.values().cloned().collect()
    }

    fn check_available(inner: &Inner) -> Result<()> {
        if inner.unavailable {
            return Err(StoreError::Storage(
                "in-memory store marked unavailable".into(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl SongRepository for InMemorySongRepository {
    async fn insert(&self, song: NewSong) -> Result<SongId> {
        let mut inner = self.inner.lock();
        Self::check_available(&inner)?;

        if let Some(remaining) = inner.inserts_before_failure.as_mut() {
            if *remaining == 0 {
                return Err(StoreError::Storage(
                    "injected insert failure".into(),
                ));
            }
            *remaining -= 1;
        }

        inner.last_id += 1;
        let id = SongId(inner.last_id);
        inner.rows.insert(
            id,
            Song {
                id,
                name: song.name,
                file_data: song.file_data,
                content_type: song.content_type,
            },
        );
        Ok(id)
    }

    async fn list(&self) -> Result<Vec<SongSummary>> {
        let inner = self.inner.lock();
        Self::check_available(&inner)?;
        Ok(inner.rows.values().map(Song::summary).collect())
    }

    async fn find_audio(&self, id: SongId) -> Result<Option<SongAudio>> {
        let inner = self.inner.lock();
        Self::check_available(&inner)?;
        Ok(inner.rows.get(&id).map(|song| SongAudio {
            name: song.name.clone(),
            file_data: song.file_data.clone(),
            content_type: song.content_type.clone(),
        }))
    }

    async fn delete(&self, id: SongId) -> Result<u64> {
        let mut inner = self.inner.lock();
        Self::check_available(&inner)?;
        Ok(u64::from(inner.rows.remove(&id).is_some()))
    }

    async fn ping(&self) -> Result<()> {
        Self::check_available(&self.inner.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_song(name: &str, bytes: &[u8]) -> NewSong {
        NewSong {
            name: name.to_string(),
            file_data: bytes.to_vec(),
            content_type: None,
        }
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let repo = InMemorySongRepository::new();
        let first = repo.insert(new_song("a.mp3", b"abc")).await.unwrap();
        assert_eq!(repo.delete(first).await.unwrap(), 1);

        let second = repo.insert(new_song("b.mp3", b"def")).await.unwrap();
        assert!(second > first);
        assert_eq!(repo.delete(first).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn list_is_in_insertion_order() {
        let repo = InMemorySongRepository::new();
        for name in ["c.mp3", "a.mp3", "b.mp3"] {
            repo.insert(new_song(name, b"x")).await.unwrap();
        }

        let names: Vec<_> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, ["c.mp3", "a.mp3", "b.mp3"]);
    }

    #[tokio::test]
    async fn injected_failure_trips_after_budget() {
        let repo = InMemorySongRepository::new();
        repo.fail_inserts_after(1);

        repo.insert(new_song("ok.mp3", b"1")).await.unwrap();
        let err = repo.insert(new_song("boom.mp3", b"2")).await.unwrap_err();
        assert!(err.is_storage());
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn unavailable_store_fails_every_operation() {
        let repo = InMemorySongRepository::new();
        repo.set_unavailable(true);

        assert!(repo.ping().await.is_err());
        assert!(repo.list().await.is_err());
        assert!(repo.find_audio(SongId(1)).await.is_err());
        assert!(repo.delete(SongId(1)).await.is_err());

        repo.set_unavailable(false);
        assert!(repo.ping().await.is_ok());
    }
}
