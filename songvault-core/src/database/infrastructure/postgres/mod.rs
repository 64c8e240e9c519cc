pub mod songs;

pub use songs::PostgresSongRepository;
