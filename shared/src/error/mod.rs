//! Error system shared by the engine and its boundary
//!
//! Engine components return their own `thiserror` enums; the boundary
//! converts them into [`AppError`], which carries a stable numeric
//! [`ErrorCode`] (range = [`ErrorCategory`]) and maps to an HTTP status.
//!
//! ```
//! use shared::error::{ApiResponse, AppError, ErrorCategory, ErrorCode};
//!
//! let err = AppError::not_found(ErrorCode::ResidentNotFound, "Resident", "r-1");
//! assert_eq!(err.category(), ErrorCategory::Resident);
//!
//! let response = ApiResponse::<()>::error(&err);
//! assert_eq!(response.code, Some(3001));
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
