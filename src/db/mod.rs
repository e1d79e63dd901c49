//! Database module for SQLite persistence.

pub mod connection;
pub mod repository;
pub mod schema;

pub use connection::{DbConfig, DbConn, DbPool, run_migrations};
pub use repository::{
    LyricsRepoError, LyricsRepository, NewTrack, TrackRepoError, TrackRepository,
};
