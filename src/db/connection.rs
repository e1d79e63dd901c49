//! Database connection pool and management.

use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel::sqlite::SqliteConnection;
use std::time::Duration;

/// Type alias for our connection pool.
pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

/// Type alias for a pooled connection.
pub type DbConn = PooledConnection<ConnectionManager<SqliteConnection>>;

/// Database configuration.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file.
    pub database_url: String,
    /// Maximum number of connections in the pool.
    pub max_connections: u32,
    /// Connection timeout in seconds.
    pub connection_timeout: u64,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            database_url: "echo.db".to_string(),
            max_connections: 10,
            connection_timeout: 30,
        }
    }
}

impl DbConfig {
    /// Create a new database configuration.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }

    /// Build a connection pool from this configuration.
    pub fn build_pool(&self) -> Result<DbPool, Box<dyn std::error::Error>> {
        let manager = ConnectionManager::<SqliteConnection>::new(&self.database_url);

        Pool::builder()
            .max_size(self.max_connections)
            .connection_timeout(Duration::from_secs(self.connection_timeout))
            .build(manager)
            .map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
    }
}

/// Numbered schema migrations, applied in order.
///
/// The schema version lives in the `schema_version` table; each migration
/// runs at most once, so these statements never need `IF NOT EXISTS` or
/// column probing. Append new steps, never edit applied ones.
const MIGRATIONS: &[(i32, &str)] = &[
    (
        1,
        r#"
        CREATE TABLE tracks (
            id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
            title TEXT NOT NULL,
            artist TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    ),
    (
        2,
        r#"
        CREATE TABLE lyric_lines (
            id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
            track_id INTEGER NOT NULL REFERENCES tracks(id),
            position INTEGER NOT NULL,
            offset_cs INTEGER NOT NULL,
            text TEXT NOT NULL
        )
        "#,
    ),
    (
        3,
        "CREATE INDEX idx_lyric_lines_track_id ON lyric_lines(track_id)",
    ),
];

/// Run the SQL migrations to set up the database schema.
///
/// Applies every migration newer than the recorded schema version inside a
/// single transaction, then records the new version.
pub fn run_migrations(conn: &mut SqliteConnection) -> Result<(), diesel::result::Error> {
    diesel::sql_query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY NOT NULL,
            applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(conn)?;

    let current = diesel::sql_query(
        "SELECT COALESCE(MAX(version), 0) AS version FROM schema_version",
    )
    .get_result::<VersionResult>(conn)?
    .version;

    conn.transaction::<_, diesel::result::Error, _>(|conn| {
        for (version, sql) in MIGRATIONS.iter().filter(|(v, _)| *v > current) {
            diesel::sql_query(*sql).execute(conn)?;
            diesel::sql_query("INSERT INTO schema_version (version) VALUES (?)")
                .bind::<diesel::sql_types::Integer, _>(*version)
                .execute(conn)?;
        }
        Ok(())
    })
}

/// Helper struct for the schema version query.
#[derive(QueryableByName)]
struct VersionResult {
    #[diesel(sql_type = diesel::sql_types::Integer)]
    version: i32,
}
