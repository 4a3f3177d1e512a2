//! Numeric error codes
//!
//! The thousands digit selects the [`ErrorCategory`](super::ErrorCategory);
//! values are part of the wire format and never renumbered.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // 0xxx general
    Success = 0,
    Unknown = 1,
    ValidationFailed = 2,
    NotFound = 3,
    AlreadyExists = 4,
    InvalidRequest = 5,
    RequiredField = 7,
    ValueOutOfRange = 8,

    // 1xxx caller identity
    NotAuthenticated = 1001,

    // 2xxx authorization gate
    PermissionDenied = 2001,
    SuperuserRequired = 2003,
    CannotModifySelf = 2004,

    // 3xxx residents / rotation
    ResidentNotFound = 3001,
    RegistryEmpty = 3002,

    // 4xxx issues
    IssueNotFound = 4001,
    InvalidTransition = 4002,

    // 5xxx ledger / dispatch
    LedgerEntryNotFound = 5001,
    DeliveryFailed = 5101,
    DispatchNotRecorded = 5102,

    // 6xxx admins
    AdminNotFound = 6001,
    AdminEmailExists = 6002,

    // 9xxx system
    InternalError = 9001,
    DatabaseError = 9002,
    ConfigError = 9005,
    StorageCorrupted = 9403,
}

impl ErrorCode {
    /// Every defined code, in numeric order
    pub const ALL: [ErrorCode; 25] = [
        ErrorCode::Success,
        ErrorCode::Unknown,
        ErrorCode::ValidationFailed,
        ErrorCode::NotFound,
        ErrorCode::AlreadyExists,
        ErrorCode::InvalidRequest,
        ErrorCode::RequiredField,
        ErrorCode::ValueOutOfRange,
        ErrorCode::NotAuthenticated,
        ErrorCode::PermissionDenied,
        ErrorCode::SuperuserRequired,
        ErrorCode::CannotModifySelf,
        ErrorCode::ResidentNotFound,
        ErrorCode::RegistryEmpty,
        ErrorCode::IssueNotFound,
        ErrorCode::InvalidTransition,
        ErrorCode::LedgerEntryNotFound,
        ErrorCode::DeliveryFailed,
        ErrorCode::DispatchNotRecorded,
        ErrorCode::AdminNotFound,
        ErrorCode::AdminEmailExists,
        ErrorCode::InternalError,
        ErrorCode::DatabaseError,
        ErrorCode::ConfigError,
        ErrorCode::StorageCorrupted,
    ];

    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Generic or entity-specific "does not exist"
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            ErrorCode::NotFound
                | ErrorCode::ResidentNotFound
                | ErrorCode::IssueNotFound
                | ErrorCode::LedgerEntryNotFound
                | ErrorCode::AdminNotFound
        )
    }

    /// Default developer-facing message
    pub const fn message(&self) -> &'static str {
        match self {
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",
            ErrorCode::NotAuthenticated => "Caller is not authenticated",
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::SuperuserRequired => "Superuser role is required",
            ErrorCode::CannotModifySelf => "Cannot modify your own admin record",
            ErrorCode::ResidentNotFound => "Resident not found",
            ErrorCode::RegistryEmpty => "No residents in the rotation",
            ErrorCode::IssueNotFound => "Issue not found",
            ErrorCode::InvalidTransition => "Invalid issue status transition",
            ErrorCode::LedgerEntryNotFound => "Ledger entry not found",
            ErrorCode::DeliveryFailed => "Message delivery failed",
            ErrorCode::DispatchNotRecorded => "Messages were sent but the ledger entry was not saved",
            ErrorCode::AdminNotFound => "Admin user not found",
            ErrorCode::AdminEmailExists => "Admin email already exists",
            ErrorCode::InternalError => "Internal error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::StorageCorrupted => "Stored document is corrupted",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// A u16 that is not a defined [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        ErrorCode::ALL
            .into_iter()
            .find(|c| c.code() == value)
            .ok_or(InvalidErrorCode(value))
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_is_sorted_and_unique() {
        assert!(ErrorCode::ALL.windows(2).all(|w| w[0].code() < w[1].code()));
    }

    #[test]
    fn test_every_code_round_trips() {
        for code in ErrorCode::ALL {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
            assert!(!code.message().is_empty());
        }
        assert_eq!(ErrorCode::try_from(6), Err(InvalidErrorCode(6)));
        assert_eq!(ErrorCode::try_from(7777), Err(InvalidErrorCode(7777)));
    }

    #[test]
    fn test_not_found_family() {
        assert!(ErrorCode::ResidentNotFound.is_not_found());
        assert!(ErrorCode::LedgerEntryNotFound.is_not_found());
        assert!(!ErrorCode::RegistryEmpty.is_not_found());
    }

    #[test]
    fn test_serde_as_number() {
        assert_eq!(serde_json::to_string(&ErrorCode::RegistryEmpty).unwrap(), "3002");
        let code: ErrorCode = serde_json::from_str("4002").unwrap();
        assert_eq!(code, ErrorCode::InvalidTransition);
        assert!(serde_json::from_str::<ErrorCode>("12345").is_err());
    }
}
