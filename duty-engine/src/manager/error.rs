use shared::error::{AppError, ErrorCode};
use shared::models::{DispatchReport, IssueStatus, Role};
use thiserror::Error;

use crate::auth::ActionClass;
use crate::storage::StorageError;

/// 实体类型（用于 NotFound / Conflict）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Resident,
    Issue,
    Admin,
    LedgerEntry,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            EntityKind::Resident => "Resident",
            EntityKind::Issue => "Issue",
            EntityKind::Admin => "Admin",
            EntityKind::LedgerEntry => "Ledger entry",
        })
    }
}

/// Engine errors
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    #[error("No residents in the rotation")]
    EmptyRegistry,

    #[error("Role {role} is not allowed to {action}")]
    Forbidden { role: Role, action: ActionClass },

    #[error("Cannot edit or delete your own admin record")]
    SelfModification,

    #[error("{kind} already exists: {value}")]
    Conflict { kind: EntityKind, value: String },

    #[error("Invalid issue transition: {from} -> {to}")]
    InvalidTransition { from: IssueStatus, to: IssueStatus },

    #[error("Persistence error: {0}")]
    Persistence(#[from] StorageError),

    /// 消息已发出，但账本条目未能保存；报告随错误返回
    #[error("Dispatch delivered but ledger write failed: {source}")]
    DispatchNotRecorded {
        report: Box<DispatchReport>,
        source: StorageError,
    },
}

impl EngineError {
    pub fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        EngineError::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Attach the delivery report to a ledger write failure
    pub(crate) fn after_delivery(self, report: &DispatchReport) -> Self {
        match self {
            EngineError::Persistence(source) => EngineError::DispatchNotRecorded {
                report: Box::new(report.clone()),
                source,
            },
            other => other,
        }
    }

    /// Delivery report of a dispatch that went out but was not recorded
    pub fn unrecorded_report(&self) -> Option<&DispatchReport> {
        match self {
            EngineError::DispatchNotRecorded { report, .. } => Some(&**report),
            _ => None,
        }
    }
}

/// 将存储错误转换为错误码
fn classify_storage_error(e: &StorageError) -> ErrorCode {
    if matches!(e, StorageError::Serialization(_)) {
        return ErrorCode::StorageCorrupted;
    }

    // redb 错误通过字符串匹配分类
    let err_str = e.to_string().to_lowercase();
    if err_str.contains("corrupt") || err_str.contains("invalid database") {
        return ErrorCode::StorageCorrupted;
    }

    ErrorCode::DatabaseError
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Validation(msg) => AppError::validation(msg),
            EngineError::NotFound { kind, id } => {
                let code = match kind {
                    EntityKind::Resident => ErrorCode::ResidentNotFound,
                    EntityKind::Issue => ErrorCode::IssueNotFound,
                    EntityKind::Admin => ErrorCode::AdminNotFound,
                    EntityKind::LedgerEntry => ErrorCode::LedgerEntryNotFound,
                };
                AppError::not_found(code, &kind.to_string(), id)
            }
            EngineError::EmptyRegistry => AppError::new(ErrorCode::RegistryEmpty),
            EngineError::Forbidden { role, action } => {
                let code = if action.is_superuser_only() {
                    ErrorCode::SuperuserRequired
                } else {
                    ErrorCode::PermissionDenied
                };
                AppError::forbidden(code, role.as_str(), action.as_str())
            }
            EngineError::SelfModification => AppError::new(ErrorCode::CannotModifySelf),
            EngineError::Conflict { kind, value } => {
                let code = match kind {
                    EntityKind::Admin => ErrorCode::AdminEmailExists,
                    _ => ErrorCode::AlreadyExists,
                };
                AppError::conflict(code, format!("{} already exists: {}", kind, value))
            }
            EngineError::InvalidTransition { from, to } => AppError::new(ErrorCode::InvalidTransition)
                .with_detail("from", from.as_str())
                .with_detail("to", to.as_str()),
            EngineError::Persistence(e) => {
                let code = classify_storage_error(&e);
                tracing::error!(error = %e, error_code = %code, "Storage error occurred");
                AppError::storage(code, e.to_string())
            }
            EngineError::DispatchNotRecorded { report, source } => {
                tracing::error!(error = %source, status = %report.status, "Dispatch not recorded");
                AppError::with_message(
                    ErrorCode::DispatchNotRecorded,
                    format!("Messages were sent ({}) but the ledger entry was not saved", report.status),
                )
                .with_detail("status", report.status.as_str())
                .with_detail("failed", report.failed_count())
                .with_detail(
                    "report",
                    serde_json::to_value(&*report).unwrap_or_default(),
                )
                .with_detail("storage_error", source.to_string())
            }
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
