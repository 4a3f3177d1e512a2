//! Error categories (one per code range)

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    General,
    Auth,
    Permission,
    Resident,
    Issue,
    Ledger,
    Admin,
    /// 9xxx and any range without its own category
    System,
}

impl ErrorCategory {
    /// Category from the thousands digit
    pub const fn of(code: u16) -> Self {
        match code / 1000 {
            0 => Self::General,
            1 => Self::Auth,
            2 => Self::Permission,
            3 => Self::Resident,
            4 => Self::Issue,
            5 => Self::Ledger,
            6 => Self::Admin,
            _ => Self::System,
        }
    }

    /// Errors raised by the duty domain itself rather than by the plumbing
    pub const fn is_domain(&self) -> bool {
        matches!(self, Self::Resident | Self::Issue | Self::Ledger | Self::Admin)
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Auth => "auth",
            Self::Permission => "permission",
            Self::Resident => "resident",
            Self::Issue => "issue",
            Self::Ledger => "ledger",
            Self::Admin => "admin",
            Self::System => "system",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorCode {
    pub const fn category(&self) -> ErrorCategory {
        ErrorCategory::of(self.code())
    }
}
