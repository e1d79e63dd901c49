//! Models for the lyrics service.

pub mod lyrics;
pub mod track;

pub use lyrics::{LyricLineResponse, LyricsDocumentResponse, UploadLyricsResponse};
pub use track::Track;
