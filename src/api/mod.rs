//! HTTP API module.

pub mod error;
pub mod handlers;
pub mod state;

pub use error::ApiError;
pub use state::{DatabaseLibraryState, LibraryState};
