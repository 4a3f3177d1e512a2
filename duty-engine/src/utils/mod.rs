//! 工具模块 - 通用工具函数和类型
//!
//! # 内容
//!
//! - [`AppError`] - 边界错误类型 (from shared::error)
//! - [`ApiResponse`] - 边界响应结构 (from shared::error)
//! - 日志初始化、输入校验

pub mod logger;
pub mod validation;

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
