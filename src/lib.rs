//! Personal music-library lyrics service library.

pub mod api;
pub mod db;
pub mod lyrics;
pub mod models;
