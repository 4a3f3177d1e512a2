//! Boundary error and response types

use super::category::ErrorCategory;
use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Error handed to whatever sits in front of the engine (HTTP handler, CLI)
///
/// `code` is stable and numeric, `message` is for humans, `details` carries
/// the structured context (entity id, role, action, transition ends).
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<Map<String, Value>>,
}

impl AppError {
    /// Error with the code's default message
    pub fn new(code: ErrorCode) -> Self {
        Self::with_message(code, code.message())
    }

    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Attach one structured detail
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    pub fn category(&self) -> ErrorCategory {
        self.code.category()
    }

    /// Caller can fix it by changing the request (4xx)
    pub fn is_client_error(&self) -> bool {
        self.http_status().is_client_error()
    }

    // ==================== Domain constructors ====================

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// `code` picks the entity-specific not-found code
    pub fn not_found(code: ErrorCode, entity: &str, id: impl Into<String>) -> Self {
        let id = id.into();
        Self::with_message(code, format!("{} not found: {}", entity, id)).with_detail("id", id)
    }

    /// Denied by the authorization gate
    pub fn forbidden(code: ErrorCode, role: &str, action: &str) -> Self {
        Self::with_message(code, format!("Role {} is not allowed to {}", role, action))
            .with_detail("role", role)
            .with_detail("action", action)
    }

    pub fn conflict(code: ErrorCode, msg: impl Into<String>) -> Self {
        Self::with_message(code, msg)
    }

    /// Persistence failure; message keeps the backend error text for logs
    pub fn storage(code: ErrorCode, msg: impl Into<String>) -> Self {
        Self::with_message(code, msg)
    }
}

/// Response envelope
///
/// `code` is 0 on success, otherwise the [`ErrorCode`] value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Map<String, Value>>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: Some(ErrorCode::Success.code()),
            message: "OK".to_string(),
            data: Some(data),
            details: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.code.is_none_or(|c| c == ErrorCode::Success.code())
    }
}

impl ApiResponse<()> {
    /// Success without payload
    pub fn ok() -> Self {
        Self {
            code: Some(ErrorCode::Success.code()),
            message: "OK".to_string(),
            data: None,
            details: None,
        }
    }

    pub fn error(err: &AppError) -> Self {
        err.clone().into()
    }
}

impl<T> From<AppError> for ApiResponse<T> {
    fn from(err: AppError) -> Self {
        Self {
            code: Some(err.code.code()),
            message: err.message,
            data: None,
            details: err.details,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
