//! Response formats for the lyrics API.

use serde::Serialize;

use crate::lyrics::LyricLine;

/// A single synchronized lyric line in interchange form.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LyricLineResponse {
    pub offset_seconds: f64,
    pub text: String,
}

impl From<&LyricLine> for LyricLineResponse {
    fn from(line: &LyricLine) -> Self {
        Self {
            offset_seconds: line.offset_seconds,
            text: line.text.clone(),
        }
    }
}

/// The stored lyrics sequence for a track.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LyricsDocumentResponse {
    pub track_id: i32,
    pub lines: Vec<LyricLineResponse>,
}

/// Result of a lyrics upload: what was stored and how much was skipped.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UploadLyricsResponse {
    pub track_id: i32,
    /// Number of lines stored.
    pub accepted: usize,
    /// Number of lines skipped as malformed or out of range.
    pub rejected: usize,
    pub lines: Vec<LyricLineResponse>,
}
