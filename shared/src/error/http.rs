//! HTTP status for each error code
//!
//! The engine has no transport; an HTTP boundary in front of it uses this
//! mapping. Categories give the default, a few codes override it.

use super::category::ErrorCategory;
use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    pub fn http_status(&self) -> StatusCode {
        match self {
            ErrorCode::Success => StatusCode::OK,
            ErrorCode::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::NotAuthenticated => StatusCode::UNAUTHORIZED,
            ErrorCode::AlreadyExists | ErrorCode::AdminEmailExists => StatusCode::CONFLICT,
            // 请求合法但当前状态不允许
            ErrorCode::RegistryEmpty | ErrorCode::InvalidTransition => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ErrorCode::DeliveryFailed => StatusCode::BAD_GATEWAY,
            // 已发送，仅账本写入失败
            ErrorCode::DispatchNotRecorded => StatusCode::INTERNAL_SERVER_ERROR,
            code if code.is_not_found() => StatusCode::NOT_FOUND,
            code => match code.category() {
                ErrorCategory::Permission => StatusCode::FORBIDDEN,
                ErrorCategory::System => StatusCode::INTERNAL_SERVER_ERROR,
                _ => StatusCode::BAD_REQUEST,
            },
        }
    }
}
