use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Content type emitted for every stored song in [`ContentTypeMode::Fixed`].
pub const DEFAULT_AUDIO_CONTENT_TYPE: &str = "audio/mpeg";

/// Storage-assigned identifier of a song row.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    sqlx::Type,
)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct SongId(pub i64);

impl fmt::Display for SongId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for SongId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl FromStr for SongId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// A fully materialized song row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Song {
    pub id: SongId,
    pub name: String,
    pub file_data: Vec<u8>,
    pub content_type: Option<String>,
}

impl Song {
    pub fn summary(&self) -> SongSummary {
        SongSummary {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

/// List entry returned by the catalog; never carries the payload.
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow,
)]
pub struct SongSummary {
    pub id: SongId,
    pub name: String,
}

/// Values for a row about to be inserted. The id is assigned by storage.
#[derive(Clone, PartialEq, Eq)]
pub struct NewSong {
    pub name: String,
    pub file_data: Vec<u8>,
    pub content_type: Option<String>,
}

impl fmt::Debug for NewSong {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewSong")
            .field("name", &self.name)
            .field("bytes", &self.file_data.len())
            .field("content_type", &self.content_type)
            .finish()
    }
}

/// Name and payload of a single song, as needed for playback.
#[derive(Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct SongAudio {
    pub name: String,
    pub file_data: Vec<u8>,
    pub content_type: Option<String>,
}

impl SongAudio {
    pub fn len(&self) -> usize {
        self.file_data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.file_data.is_empty()
    }
}

impl fmt::Debug for SongAudio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SongAudio")
            .field("name", &self.name)
            .field("bytes", &self.file_data.len())
            .field("content_type", &self.content_type)
            .finish()
    }
}

/// How the `Content-Type` of a streamed song is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentTypeMode {
    /// Always `audio/mpeg`, whatever was uploaded.
    #[default]
    Fixed,
    /// Replay the type recorded at upload time when there is one.
    Stored,
}

impl ContentTypeMode {
    pub fn resolve<'a>(&self, stored: Option<&'a str>) -> &'a str {
        match (self, stored) {
            (Self::Stored, Some(value)) if !value.trim().is_empty() => value,
            _ => DEFAULT_AUDIO_CONTENT_TYPE,
        }
    }
}

impl FromStr for ContentTypeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed" => Ok(Self::Fixed),
            "stored" => Ok(Self::Stored),
            other => Err(format!(
                "unknown content type mode `{other}` (expected `fixed` or `stored`)"
            )),
        }
    }
}

impl fmt::Display for ContentTypeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed => f.write_str("fixed"),
            Self::Stored => f.write_str("stored"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn song_id_parses_and_serializes_as_plain_integer() {
        let id: SongId = " 42 ".parse().unwrap();
        assert_eq!(id, SongId(42));
        assert!("abc".parse::<SongId>().is_err());

        let summary = SongSummary {
            id,
            name: "a.mp3".into(),
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json, serde_json::json!({ "id": 42, "name": "a.mp3" }));
    }

    #[test]
    fn fixed_mode_ignores_stored_type() {
        assert_eq!(
            ContentTypeMode::Fixed.resolve(Some("audio/flac")),
            DEFAULT_AUDIO_CONTENT_TYPE
        );
        assert_eq!(ContentTypeMode::Fixed.resolve(None), "audio/mpeg");
    }

    #[test]
    fn stored_mode_falls_back_when_type_missing() {
        assert_eq!(
            ContentTypeMode::Stored.resolve(Some("audio/ogg")),
            "audio/ogg"
        );
        assert_eq!(ContentTypeMode::Stored.resolve(Some("  ")), "audio/mpeg");
        assert_eq!(ContentTypeMode::Stored.resolve(None), "audio/mpeg");
    }

    #[test]
    fn content_type_mode_from_str() {
        assert_eq!("Stored".parse(), Ok(ContentTypeMode::Stored));
        assert_eq!("fixed".parse(), Ok(ContentTypeMode::Fixed));
        assert!("sniff".parse::<ContentTypeMode>().is_err());
    }
}
