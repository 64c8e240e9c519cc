//! # Songvault Server
//!
//! HTTP front of the Songvault media store: multipart upload, song listing,
//! inline audio streaming and deletion, backed by PostgreSQL.

pub mod handlers;
pub mod infra;
pub mod media;
pub mod routes;

pub use infra::app_state::AppState;
pub use routes::{create_api_router, create_app};
