//! Dispatch report types
//!
//! A dispatch (reminder or announcement) fans out to residents × contact
//! channels. Each attempt is one [`DeliveryRecord`]; the aggregate
//! [`DispatchStatus`] is derived from them.

use serde::{Deserialize, Serialize};

/// Notification channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactMethod {
    WhatsApp,
    Sms,
    Email,
}

impl ContactMethod {
    pub const ALL: [ContactMethod; 3] = [ContactMethod::WhatsApp, ContactMethod::Sms, ContactMethod::Email];

    pub fn label(&self) -> &'static str {
        match self {
            ContactMethod::WhatsApp => "WhatsApp",
            ContactMethod::Sms => "SMS",
            ContactMethod::Email => "Email",
        }
    }
}

impl std::fmt::Display for ContactMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of one recipient/channel attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryStatus {
    Sent,
    Failed,
}

/// Aggregate outcome of a dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchStatus {
    /// Every attempt succeeded
    Completed,
    /// Some attempts succeeded
    Partial,
    /// No attempt succeeded (including zero attempts)
    Failed,
}

impl DispatchStatus {
    pub fn from_deliveries(deliveries: &[DeliveryRecord]) -> Self {
        let sent = deliveries
            .iter()
            .filter(|d| d.status == DeliveryStatus::Sent)
            .count();
        match sent {
            0 => DispatchStatus::Failed,
            n if n == deliveries.len() => DispatchStatus::Completed,
            _ => DispatchStatus::Partial,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DispatchStatus::Completed => "completed",
            DispatchStatus::Partial => "partial",
            DispatchStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for DispatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recipient/channel attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryRecord {
    /// Resident name
    pub recipient: String,
    pub method: ContactMethod,
    pub status: DeliveryStatus,
    /// Rendered text that was sent (or attempted)
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Structured result of a reminder or announcement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub status: DispatchStatus,
    pub deliveries: Vec<DeliveryRecord>,
}

impl DispatchReport {
    pub fn new(subject: Option<String>, deliveries: Vec<DeliveryRecord>) -> Self {
        Self {
            subject,
            status: DispatchStatus::from_deliveries(&deliveries),
            deliveries,
        }
    }

    pub fn failed_count(&self) -> usize {
        self.deliveries
            .iter()
            .filter(|d| d.status == DeliveryStatus::Failed)
            .count()
    }
}
