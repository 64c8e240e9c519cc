pub mod infrastructure;
pub mod ports;
pub mod postgres;

pub use infrastructure::{
    memory::InMemorySongRepository, postgres::PostgresSongRepository,
};
pub use ports::songs::SongRepository;
pub use postgres::{PoolSettings, PoolStats, PostgresDatabase};
