//! Requires a reachable PostgreSQL via `DATABASE_URL`; run with
//! `cargo test -p songvault-core --features pg-tests`.
#![cfg(feature = "pg-tests")]

use std::sync::Arc;

use songvault_core::{
    BufferedPart, NewSong, SongId, SongService, StoreError,
    database::{PostgresDatabase, SongRepository},
};
use sqlx::PgPool;

fn new_song(name: &str, bytes: &[u8]) -> NewSong {
    NewSong {
        name: name.to_string(),
        file_data: bytes.to_vec(),
        content_type: None,
    }
}

#[sqlx::test(migrator = "songvault_core::MIGRATOR")]
async fn insert_then_find_returns_identical_bytes(pool: PgPool) {
    let repo = PostgresDatabase::from_pool(pool).songs();
    let payload: Vec<u8> = (0..=255u8).cycle().take(4096).collect();

    let id = repo.insert(new_song("noise.bin", &payload)).await.unwrap();
    let audio = repo.find_audio(id).await.unwrap().expect("row exists");

    assert_eq!(audio.name, "noise.bin");
    assert_eq!(audio.file_data, payload);
    assert_eq!(audio.content_type, None);
}

#[sqlx::test(migrator = "songvault_core::MIGRATOR")]
async fn zero_length_payload_round_trips(pool: PgPool) {
    let repo = PostgresDatabase::from_pool(pool).songs();
    let id = repo.insert(new_song("empty.mp3", b"")).await.unwrap();

    let audio = repo.find_audio(id).await.unwrap().expect("row exists");
    assert!(audio.file_data.is_empty());
}

#[sqlx::test(migrator = "songvault_core::MIGRATOR")]
async fn list_is_ordered_by_id_and_omits_payload(pool: PgPool) {
    let repo = PostgresDatabase::from_pool(pool).songs();
    let first = repo.insert(new_song("z.mp3", b"1")).await.unwrap();
    let second = repo.insert(new_song("a.mp3", b"2")).await.unwrap();

    let listed = repo.list().await.unwrap();
    let ids: Vec<SongId> = listed.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![first, second]);
    assert_eq!(listed[0].name, "z.mp3");
}

#[sqlx::test(migrator = "songvault_core::MIGRATOR")]
async fn delete_reports_rows_affected(pool: PgPool) {
    let repo = PostgresDatabase::from_pool(pool).songs();
    let id = repo.insert(new_song("gone.mp3", b"x")).await.unwrap();

    assert_eq!(repo.delete(id).await.unwrap(), 1);
    assert_eq!(repo.delete(id).await.unwrap(), 0);
    assert!(repo.find_audio(id).await.unwrap().is_none());
}

#[sqlx::test(migrator = "songvault_core::MIGRATOR")]
async fn identity_ids_are_not_reused(pool: PgPool) {
    let repo = PostgresDatabase::from_pool(pool).songs();
    let first = repo.insert(new_song("a", b"a")).await.unwrap();
    repo.delete(first).await.unwrap();
    let second = repo.insert(new_song("b", b"b")).await.unwrap();

    assert!(second > first);
}

#[sqlx::test(migrator = "songvault_core::MIGRATOR")]
async fn service_scenario_against_postgres(pool: PgPool) {
    let service =
        SongService::new(Arc::new(PostgresDatabase::from_pool(pool).songs()));

    service
        .upload(vec![BufferedPart::new("a.mp3", vec![1u8, 2, 3])])
        .await
        .unwrap();
    let listed = service.list().await.unwrap();
    assert_eq!(listed.len(), 1);
    let id = listed[0].id;

    assert_eq!(service.get_audio(id).await.unwrap().file_data, vec![1, 2, 3]);
    service.delete(id).await.unwrap();
    assert!(matches!(
        service.get_audio(id).await,
        Err(StoreError::NotFound(_))
    ));
}
