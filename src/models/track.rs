//! Track models.

use chrono::NaiveDateTime;

/// A track in the music library.
///
/// Holds only what uploaded lyrics are keyed by; library browsing and
/// playlist management live outside this service.
#[derive(Debug, Clone)]
pub struct Track {
    pub id: i32,
    pub title: String,
    pub artist: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
