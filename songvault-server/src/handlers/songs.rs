use axum::{
    Json,
    body::Body,
    extract::{Multipart, Path, State},
    http::{HeaderValue, StatusCode, header},
    response::Response,
};
use songvault_core::{DEFAULT_AUDIO_CONTENT_TYPE, SongId, SongSummary};
use tracing::debug;

use crate::{
    infra::{
        app_state::AppState,
        errors::{AppError, AppResult},
    },
    media::{AUDIO_FIELD, StagedFile},
};

/// `POST /api/upload`: store every `audio` field of a multipart body.
///
/// Fields without a filename are not files and are skipped. All files are
/// staged to disk before the first insert. Rows are written one file at a
/// time and are not rolled back when a later file fails.
pub async fn upload_songs(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<&'static str> {
    let staging_dir = state.config().upload.staging_dir();
    let mut staged = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(AUDIO_FIELD) {
            debug!(field = ?field.name(), "ignoring non-audio multipart field");
            continue;
        }
        if field.file_name().is_none_or(str::is_empty) {
            debug!("ignoring audio field without a filename");
            continue;
        }
        staged.push(StagedFile::stage(field, &staging_dir).await?);
    }

    let summary = state
        .songs()
        .upload(staged)
        .await
        .map_err(|err| AppError::from_store(err, "Failed to save songs."))?;
    debug!(songs = ?summary.ids, "upload request complete");

    Ok("Songs saved successfully!")
}

/// `GET /api/songs`
pub async fn list_songs(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<SongSummary>>> {
    let songs = state
        .songs()
        .list()
        .await
        .map_err(|err| AppError::from_store(err, "Failed to load songs."))?;
    Ok(Json(songs))
}

/// `GET /api/audio/{id}`: the stored bytes, framed for inline playback.
pub async fn stream_song(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    let audio = state
        .songs()
        .get_audio(SongId(id))
        .await
        .map_err(|err| AppError::from_store(err, "Failed to load song."))?;

    let content_type = state
        .config()
        .audio
        .content_type_mode
        .resolve(audio.content_type.as_deref());
    let content_type = HeaderValue::from_str(content_type).unwrap_or_else(|_| {
        HeaderValue::from_static(DEFAULT_AUDIO_CONTENT_TYPE)
    });

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, audio.len())
        .header(header::CONTENT_DISPOSITION, inline_disposition(&audio.name))
        .body(Body::from(audio.file_data))
        .map_err(|err| {
            tracing::error!(
                error = %err,
                song_id = id,
                "failed to build audio response"
            );
            AppError::internal("Failed to load song.")
        })
}

/// `DELETE /api/songs/{id}`
pub async fn delete_song(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<&'static str> {
    state
        .songs()
        .delete(SongId(id))
        .await
        .map_err(|err| AppError::from_store(err, "Failed to delete song."))?;
    Ok("Song deleted successfully!")
}

/// `inline; filename="…"` with quotes and backslashes escaped. Names that
/// are not plain printable ASCII get an ASCII fallback plus an RFC 5987
/// `filename*` carrying the exact UTF-8 name.
pub fn inline_disposition(name: &str) -> String {
    let mut fallback = String::with_capacity(name.len());
    let mut lossless = true;

    for ch in name.chars() {
        match ch {
            '"' | '\\' => {
                fallback.push('\\');
                fallback.push(ch);
            }
            ' ' => fallback.push(ch),
            c if c.is_ascii_graphic() => fallback.push(c),
            _ => {
                lossless = false;
                fallback.push('_');
            }
        }
    }

    if lossless {
        format!("inline; filename=\"{fallback}\"")
    } else {
        format!(
            "inline; filename=\"{fallback}\"; filename*=UTF-8''{}",
            urlencoding::encode(name)
        )
    }
}
