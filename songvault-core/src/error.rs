use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Song not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Anything that is not the caller's fault surfaces as a storage failure.
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Io(_))
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
