//! Personal music-library lyrics server.

use std::sync::Arc;

use axum::extract::FromRef;
use axum::{Router, routing::put};
use clap::{Parser, Subcommand};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use echo::api::{DatabaseLibraryState, LibraryState, handlers};
use echo::db::{DbConfig, DbPool, NewTrack, TrackRepository, run_migrations};

/// Personal music-library lyrics service.
#[derive(Parser)]
#[command(name = "echo")]
#[command(about = "Synchronized-lyrics server for a personal music library")]
struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "echo.db")]
    database: String,

    /// Server port
    #[arg(short, long, default_value = "8000")]
    port: u16,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a track
    AddTrack {
        /// Track title
        #[arg(short, long)]
        title: String,

        /// Track artist
        #[arg(short, long)]
        artist: Option<String>,
    },

    /// List all tracks
    ListTracks,

    /// Remove a track and its stored lyrics
    RemoveTrack {
        /// ID of the track to remove
        #[arg(short, long)]
        id: i32,
    },

    /// Start the server (default)
    Serve,
}

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    library: Arc<dyn LibraryState>,
}

impl AppState {
    pub fn new(pool: DbPool) -> Self {
        Self {
            library: Arc::new(DatabaseLibraryState::new(pool)),
        }
    }
}

// Allow extracting Arc<dyn LibraryState> from AppState
impl FromRef<AppState> for Arc<dyn LibraryState> {
    fn from_ref(state: &AppState) -> Self {
        state.library.clone()
    }
}

/// Create the main router.
///
/// One write endpoint feeds the lyrics engine (PUT, with POST accepted for
/// plain form-style clients) and one read endpoint serves its output.
fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/tracks/{id}/lyrics",
            put(handlers::upload_lyrics)
                .post(handlers::upload_lyrics)
                .get(handlers::get_lyrics),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn setup_database(database_url: &str) -> DbPool {
    let config = DbConfig::new(database_url);
    let pool = config.build_pool().expect("Failed to create database pool");

    // Run migrations
    let mut conn = pool.get().expect("Failed to get database connection");
    run_migrations(&mut conn).expect("Failed to run migrations");

    pool
}

#[tokio::main]
async fn main() {
    // .env may set DATABASE_URL, diesel-convention
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "echo=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = std::env::var("DATABASE_URL").unwrap_or(cli.database);
    let pool = setup_database(&database_url);

    match cli.command {
        Some(Commands::AddTrack { title, artist }) => {
            let repo = TrackRepository::new(pool.clone());
            let new_track = NewTrack::new(&title, artist.as_deref());
            match repo.create(&new_track) {
                Ok(track) => {
                    println!("Added track '{}' (id: {})", track.title, track.id);
                    if let Some(artist) = track.artist {
                        println!("  Artist: {}", artist);
                    }
                }
                Err(e) => {
                    eprintln!("Failed to add track: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::ListTracks) => {
            let repo = TrackRepository::new(pool.clone());
            match repo.find_all() {
                Ok(tracks) => {
                    if tracks.is_empty() {
                        println!("No tracks yet. Add one with:");
                        println!("  echo add-track --title \"Song\" --artist \"Artist\"");
                    } else {
                        println!("Tracks:");
                        for track in tracks {
                            let artist = track.artist.as_deref().unwrap_or("Unknown");
                            println!("  [{}] {} - {}", track.id, track.title, artist);
                        }
                    }
                }
                Err(e) => {
                    eprintln!("Failed to list tracks: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::RemoveTrack { id }) => {
            let repo = TrackRepository::new(pool.clone());
            match repo.delete(id) {
                Ok(true) => {
                    println!("Removed track with id {}", id);
                }
                Ok(false) => {
                    eprintln!("Track with id {} not found", id);
                    std::process::exit(1);
                }
                Err(e) => {
                    eprintln!("Failed to remove track: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Serve) | None => {
            run_server(pool, cli.port).await;
        }
    }
}

async fn run_server(pool: DbPool, port: u16) {
    // Check if there are any tracks
    let repo = TrackRepository::new(pool.clone());
    if repo.find_all().map(|t| t.is_empty()).unwrap_or(true) {
        tracing::warn!("No tracks in database. Add one with:");
        tracing::warn!("  echo add-track --title \"Song\" --artist \"Artist\"");
    }

    let state = AppState::new(pool);
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind to {}: {}", addr, e);
            tracing::error!("Is another process already using port {}?", port);
            std::process::exit(1);
        }
    };
    tracing::info!(
        "Lyrics server listening on {}",
        listener
            .local_addr()
            .expect("listener should have local addr")
    );

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
