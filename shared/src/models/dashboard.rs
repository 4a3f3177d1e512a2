//! Dashboard snapshot returned by the read side

use serde::{Deserialize, Serialize};

use super::ledger::LedgerEntry;

/// Placeholder shown when a rotation slot cannot be resolved
pub const NOT_AVAILABLE: &str = "N/A";

/// One rotation slot (current duty / next in rotation)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutySlot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resident_id: Option<String>,
    pub name: String,
}

impl DutySlot {
    pub fn not_available() -> Self {
        Self {
            resident_id: None,
            name: NOT_AVAILABLE.to_string(),
        }
    }
}

/// Dashboard data: current duty, next in rotation and last activity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub current_duty: DutySlot,
    pub next_in_rotation: DutySlot,
    /// Most recent ledger entry
    pub last_activity: Option<LedgerEntry>,
    /// `last_activity` as one display line, or "N/A"
    pub last_activity_line: String,
    /// Formatted time of the last reminder, or "N/A"
    pub last_reminder_run: String,
}
