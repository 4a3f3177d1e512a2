//! Data models
//!
//! Shared between the engine and whatever renders it (via API).
//! All IDs are opaque strings (UUID v4), never positions.

pub mod admin_user;
pub mod dashboard;
pub mod dispatch;
pub mod issue;
pub mod ledger;
pub mod resident;
pub mod settings;

// Re-exports
pub use admin_user::*;
pub use dashboard::*;
pub use dispatch::*;
pub use issue::*;
pub use ledger::*;
pub use resident::*;
pub use settings::*;
