//! Shared types for the duty engine
//!
//! Domain models, the unified error system and small utilities used by the
//! engine and by whatever boundary (HTTP, CLI) sits in front of it.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
