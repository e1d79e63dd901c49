//! Lyrics upload and retrieval handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};

use crate::api::error::ApiError;
use crate::api::state::LibraryState;
use crate::lyrics;
use crate::models::{LyricLineResponse, LyricsDocumentResponse, UploadLyricsResponse};

/// PUT/POST /tracks/{id}/lyrics
///
/// Parses the uploaded timed-lyrics document and replaces the track's stored
/// sequence with the result. Malformed lines are skipped and counted, never
/// fatal. The body must be UTF-8 text; the `String` extractor rejects
/// anything else before this handler runs.
pub async fn upload_lyrics(
    State(state): State<Arc<dyn LibraryState>>,
    Path(track_id): Path<i32>,
    document: String,
) -> Result<Json<UploadLyricsResponse>, ApiError> {
    let track = state
        .find_track(track_id)
        .ok_or_else(|| ApiError::NotFound("Track".into()))?;

    if document.trim().is_empty() {
        return Err(ApiError::EmptyDocument);
    }

    let outcome = lyrics::parse_document(&document);
    outcome.log_rejections();

    if outcome.lines.is_empty() {
        return Err(ApiError::NothingParsed {
            rejected: outcome.rejected.len(),
        });
    }

    state.replace_lyrics(track.id, &outcome.lines)?;

    tracing::debug!(
        track_id = track.id,
        accepted = outcome.lines.len(),
        rejected = outcome.rejected.len(),
        "replaced stored lyrics"
    );

    Ok(Json(UploadLyricsResponse {
        track_id: track.id,
        accepted: outcome.lines.len(),
        rejected: outcome.rejected.len(),
        lines: outcome.lines.iter().map(LyricLineResponse::from).collect(),
    }))
}

/// GET /tracks/{id}/lyrics
///
/// Returns the stored sequence for playback-synchronized display. A track
/// with no uploaded lyrics yields an empty list, not an error.
pub async fn get_lyrics(
    State(state): State<Arc<dyn LibraryState>>,
    Path(track_id): Path<i32>,
) -> Result<Json<LyricsDocumentResponse>, ApiError> {
    let track = state
        .find_track(track_id)
        .ok_or_else(|| ApiError::NotFound("Track".into()))?;

    let lines = state.lyrics_for_track(track.id);

    Ok(Json(LyricsDocumentResponse {
        track_id: track.id,
        lines: lines.iter().map(LyricLineResponse::from).collect(),
    }))
}
