//! Shared application state for the lyrics API.
//!
//! Handlers depend on the [`LibraryState`] trait rather than on the diesel
//! repositories directly, so the persistence layer is injected and can be
//! swapped out in tests.

use crate::db::{DbPool, LyricsRepoError, LyricsRepository, TrackRepository};
use crate::lyrics::LyricLine;
use crate::models::Track;

/// Persistence operations the lyrics API needs.
pub trait LibraryState: Send + Sync + 'static {
    /// Find a track by ID.
    fn find_track(&self, track_id: i32) -> Option<Track>;
    /// Replace the stored lyrics sequence for a track, all-or-nothing.
    fn replace_lyrics(&self, track_id: i32, lines: &[LyricLine]) -> Result<(), LyricsRepoError>;
    /// Get the stored lyrics sequence for a track, in stored order.
    fn lyrics_for_track(&self, track_id: i32) -> Vec<LyricLine>;
}

/// Database-backed implementation of [`LibraryState`].
pub struct DatabaseLibraryState {
    track_repo: TrackRepository,
    lyrics_repo: LyricsRepository,
}

impl DatabaseLibraryState {
    pub fn new(pool: DbPool) -> Self {
        Self {
            track_repo: TrackRepository::new(pool.clone()),
            lyrics_repo: LyricsRepository::new(pool),
        }
    }
}

impl LibraryState for DatabaseLibraryState {
    fn find_track(&self, track_id: i32) -> Option<Track> {
        self.track_repo.find_by_id(track_id).ok().flatten()
    }

    fn replace_lyrics(&self, track_id: i32, lines: &[LyricLine]) -> Result<(), LyricsRepoError> {
        self.lyrics_repo.replace_for_track(track_id, lines)
    }

    fn lyrics_for_track(&self, track_id: i32) -> Vec<LyricLine> {
        self.lyrics_repo.find_for_track(track_id).unwrap_or_default()
    }
}
