//! Database repositories for tracks and their synchronized lyrics.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use thiserror::Error;

use crate::db::DbPool;
use crate::db::schema::{lyric_lines, tracks};
use crate::lyrics::LyricLine;
use crate::models::Track;

/// Errors that can occur during track repository operations.
#[derive(Debug, Error)]
pub enum TrackRepoError {
    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("Connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
}

/// Errors that can occur during lyrics repository operations.
#[derive(Debug, Error)]
pub enum LyricsRepoError {
    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("Connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
}

/// Database row representation for tracks.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tracks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TrackRow {
    pub id: i32,
    pub title: String,
    pub artist: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<TrackRow> for Track {
    fn from(row: TrackRow) -> Self {
        Track {
            id: row.id,
            title: row.title,
            artist: row.artist,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Data for inserting a new track.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tracks)]
pub struct NewTrack<'a> {
    pub title: &'a str,
    pub artist: Option<&'a str>,
}

impl<'a> NewTrack<'a> {
    pub fn new(title: &'a str, artist: Option<&'a str>) -> Self {
        Self { title, artist }
    }
}

/// Repository for track database operations.
#[derive(Clone)]
pub struct TrackRepository {
    pool: DbPool,
}

impl TrackRepository {
    /// Create a new track repository.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create a new track.
    pub fn create(&self, new_track: &NewTrack) -> Result<Track, TrackRepoError> {
        let mut conn = self.pool.get()?;

        diesel::insert_into(tracks::table)
            .values(new_track)
            .execute(&mut conn)?;

        // Fetch the created track
        let track = tracks::table
            .order(tracks::id.desc())
            .select(TrackRow::as_select())
            .first(&mut conn)?;

        Ok(Track::from(track))
    }

    /// Find a track by ID.
    pub fn find_by_id(&self, track_id: i32) -> Result<Option<Track>, TrackRepoError> {
        let mut conn = self.pool.get()?;

        let result = tracks::table
            .filter(tracks::id.eq(track_id))
            .select(TrackRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(result.map(Track::from))
    }

    /// Get all tracks.
    pub fn find_all(&self) -> Result<Vec<Track>, TrackRepoError> {
        let mut conn = self.pool.get()?;

        let results = tracks::table
            .order(tracks::id.asc())
            .select(TrackRow::as_select())
            .load(&mut conn)?;

        Ok(results.into_iter().map(Track::from).collect())
    }

    /// Delete a track and its stored lyrics.
    pub fn delete(&self, track_id: i32) -> Result<bool, TrackRepoError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            diesel::delete(lyric_lines::table.filter(lyric_lines::track_id.eq(track_id)))
                .execute(conn)?;
            let deleted = diesel::delete(tracks::table.filter(tracks::id.eq(track_id)))
                .execute(conn)?;
            Ok(deleted > 0)
        })
        .map_err(TrackRepoError::from)
    }
}

/// Database row representation for lyric lines.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = lyric_lines)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct LyricLineRow {
    #[allow(dead_code)]
    pub id: i32,
    #[allow(dead_code)]
    pub track_id: i32,
    #[allow(dead_code)]
    pub position: i32,
    pub offset_cs: i32,
    pub text: String,
}

impl From<LyricLineRow> for LyricLine {
    fn from(row: LyricLineRow) -> Self {
        LyricLine {
            offset_seconds: f64::from(row.offset_cs) / 100.0,
            text: row.text,
        }
    }
}

/// Data for inserting a lyric line.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = lyric_lines)]
struct NewLyricLine<'a> {
    track_id: i32,
    position: i32,
    offset_cs: i32,
    text: &'a str,
}

/// Repository for synchronized lyrics storage.
///
/// Offsets are stored as integral centiseconds (the timed-line format's
/// native precision) so stored sequences round-trip exactly. The `position`
/// column persists the caller's ordering; reads never re-sort.
#[derive(Clone)]
pub struct LyricsRepository {
    pool: DbPool,
}

impl LyricsRepository {
    /// Create a new lyrics repository.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Replace the stored sequence for a track with `lines`.
    ///
    /// Delete and insert run in one transaction: either the whole new
    /// sequence is stored or the old one is left untouched.
    pub fn replace_for_track(
        &self,
        track_id: i32,
        lines: &[LyricLine],
    ) -> Result<(), LyricsRepoError> {
        let mut conn = self.pool.get()?;

        let rows: Vec<NewLyricLine> = lines
            .iter()
            .enumerate()
            .map(|(position, line)| NewLyricLine {
                track_id,
                position: position as i32,
                offset_cs: (line.offset_seconds * 100.0).round() as i32,
                text: &line.text,
            })
            .collect();

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            diesel::delete(lyric_lines::table.filter(lyric_lines::track_id.eq(track_id)))
                .execute(conn)?;
            diesel::insert_into(lyric_lines::table)
                .values(&rows)
                .execute(conn)?;
            Ok(())
        })
        .map_err(LyricsRepoError::from)
    }

    /// Get the stored sequence for a track, in stored order.
    pub fn find_for_track(&self, track_id: i32) -> Result<Vec<LyricLine>, LyricsRepoError> {
        let mut conn = self.pool.get()?;

        let results = lyric_lines::table
            .filter(lyric_lines::track_id.eq(track_id))
            .order(lyric_lines::position.asc())
            .select(LyricLineRow::as_select())
            .load(&mut conn)?;

        Ok(results.into_iter().map(LyricLine::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::{DbConfig, run_migrations};

    fn test_pool() -> DbPool {
        // A single-connection pool so every get() sees the same :memory: db.
        let config = DbConfig {
            database_url: ":memory:".to_string(),
            max_connections: 1,
            connection_timeout: 5,
        };
        let pool = config.build_pool().unwrap();
        let mut conn = pool.get().unwrap();
        run_migrations(&mut conn).unwrap();
        pool
    }

    fn lyric(offset_seconds: f64, text: &str) -> LyricLine {
        LyricLine {
            offset_seconds,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_create_and_find_track() {
        let pool = test_pool();
        let repo = TrackRepository::new(pool);

        let track = repo
            .create(&NewTrack::new("Echoes", Some("Pink Floyd")))
            .unwrap();
        assert_eq!(track.title, "Echoes");

        let found = repo.find_by_id(track.id).unwrap().unwrap();
        assert_eq!(found.artist.as_deref(), Some("Pink Floyd"));
        assert!(repo.find_by_id(track.id + 1).unwrap().is_none());
    }

    #[test]
    fn test_delete_track_removes_lyrics() {
        let pool = test_pool();
        let tracks = TrackRepository::new(pool.clone());
        let lyrics = LyricsRepository::new(pool);

        let track = tracks.create(&NewTrack::new("Gone", None)).unwrap();
        lyrics
            .replace_for_track(track.id, &[lyric(1.0, "a")])
            .unwrap();

        assert!(tracks.delete(track.id).unwrap());
        assert!(!tracks.delete(track.id).unwrap());
        assert!(lyrics.find_for_track(track.id).unwrap().is_empty());
    }

    #[test]
    fn test_replace_for_track_round_trips() {
        let pool = test_pool();
        let tracks = TrackRepository::new(pool.clone());
        let lyrics = LyricsRepository::new(pool);

        let track = tracks.create(&NewTrack::new("Synced", None)).unwrap();
        let sequence = vec![lyric(0.0, "World"), lyric(1.5, "Hello"), lyric(1.5, "")];
        lyrics.replace_for_track(track.id, &sequence).unwrap();

        assert_eq!(lyrics.find_for_track(track.id).unwrap(), sequence);
    }

    #[test]
    fn test_replace_for_track_replaces_not_merges() {
        let pool = test_pool();
        let tracks = TrackRepository::new(pool.clone());
        let lyrics = LyricsRepository::new(pool);

        let track = tracks.create(&NewTrack::new("Replaced", None)).unwrap();
        lyrics
            .replace_for_track(track.id, &[lyric(1.0, "old"), lyric(2.0, "old too")])
            .unwrap();
        lyrics
            .replace_for_track(track.id, &[lyric(3.0, "new")])
            .unwrap();

        assert_eq!(
            lyrics.find_for_track(track.id).unwrap(),
            vec![lyric(3.0, "new")]
        );
    }

    #[test]
    fn test_sequences_are_per_track() {
        let pool = test_pool();
        let tracks = TrackRepository::new(pool.clone());
        let lyrics = LyricsRepository::new(pool);

        let first = tracks.create(&NewTrack::new("First", None)).unwrap();
        let second = tracks.create(&NewTrack::new("Second", None)).unwrap();
        lyrics
            .replace_for_track(first.id, &[lyric(1.0, "one")])
            .unwrap();
        lyrics
            .replace_for_track(second.id, &[lyric(2.0, "two")])
            .unwrap();

        assert_eq!(
            lyrics.find_for_track(first.id).unwrap(),
            vec![lyric(1.0, "one")]
        );
        assert_eq!(
            lyrics.find_for_track(second.id).unwrap(),
            vec![lyric(2.0, "two")]
        );
    }
}
