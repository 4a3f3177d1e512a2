//! Dispatcher
//!
//! Renders reminders / announcements, fans out to every recipient × contact
//! channel concurrently and folds the attempts into a [`DispatchReport`].
//!
//! # Flow
//!
//! ```text
//! plan_*(doc)            (under the manager lock)
//!     └─ DeliveryTarget per resident
//! Dispatcher::deliver_all (lock released)
//!     ├─ one future per (resident, channel)
//!     ├─ each: timeout + bounded retry
//!     └─ join_all -> Vec<DeliveryRecord>
//! record_*(doc)          (under the manager lock, one ledger entry)
//! ```
//!
//! A failing or hanging channel only affects its own record.

pub mod channel;

pub use channel::{DeliveryChannel, DeliveryError, LogOnlyChannel, OutboundMessage};

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use shared::models::{
    ContactMethod, DeliveryRecord, DeliveryStatus, DispatchReport, LedgerAction, Resident,
};

use crate::ledger;
use crate::manager::EngineResult;
use crate::rotation;
use crate::state::DutyDocument;
use crate::template::{self, RenderedTemplate};

/// Per-attempt bound and attempts per recipient/channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryPolicy {
    pub timeout: Duration,
    pub max_attempts: u32,
}

impl Default for DeliveryPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(5000),
            max_attempts: 2,
        }
    }
}

/// Rendered message for one resident plus their contact addresses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryTarget {
    pub recipient: String,
    pub addresses: Vec<(ContactMethod, String)>,
    pub body: String,
}

impl DeliveryTarget {
    pub fn for_resident(resident: &Resident, body: String) -> Self {
        Self {
            recipient: resident.name.clone(),
            addresses: resident
                .contact
                .methods()
                .into_iter()
                .map(|(m, a)| (m, a.trim().to_string()))
                .collect(),
            body,
        }
    }
}

/// Reminder for the current-duty resident
///
/// A non-blank custom message is sent verbatim; otherwise the reminder
/// template is rendered.
pub fn plan_reminder(doc: &DutyDocument, custom: Option<&str>) -> EngineResult<DeliveryTarget> {
    let resident = rotation::current(doc)?;
    let body = match custom.map(str::trim).filter(|m| !m.is_empty()) {
        Some(text) => text.to_string(),
        None => {
            let rendered = template::render(
                &doc.settings.reminder_template,
                &template::reminder_bindings(resident),
            );
            warn_incomplete("reminder", &rendered);
            rendered.text
        }
    };
    Ok(DeliveryTarget::for_resident(resident, body))
}

/// Announcement rendered for every resident
pub fn plan_announcement(doc: &DutyDocument, message: &str) -> Vec<DeliveryTarget> {
    doc.residents
        .iter()
        .enumerate()
        .map(|(i, resident)| {
            let rendered = template::render(
                &doc.settings.announcement_template,
                &template::announcement_bindings(resident, message),
            );
            // 同一模板，检查一次即可
            if i == 0 {
                warn_incomplete("announcement", &rendered);
            }
            DeliveryTarget::for_resident(resident, rendered.text)
        })
        .collect()
}

/// 未知占位符原样发出，记录告警
fn warn_incomplete(kind: &str, rendered: &RenderedTemplate) {
    if !rendered.is_complete() {
        tracing::warn!(
            template = kind,
            passthrough = ?rendered.passthrough,
            "Template has unknown placeholders, sent verbatim"
        );
    }
}

pub fn record_reminder(
    doc: &mut DutyDocument,
    actor: &str,
    target: &DeliveryTarget,
    report: &DispatchReport,
) {
    ledger::append(
        doc,
        Some(actor),
        LedgerAction::ReminderSent,
        format!(
            "Reminder sent to {} [{}]: {}",
            target.recipient, report.status, target.body
        ),
        Some(report.clone()),
    );
}

pub fn record_announcement(
    doc: &mut DutyDocument,
    actor: &str,
    recipients: usize,
    report: &DispatchReport,
) {
    ledger::append(
        doc,
        Some(actor),
        LedgerAction::AnnouncementSent,
        format!(
            "Announcement '{}' sent to {} residents [{}]",
            report.subject.as_deref().unwrap_or("(no subject)"),
            recipients,
            report.status
        ),
        Some(report.clone()),
    );
}

/// Fan-out over registered channels
#[derive(Clone)]
pub struct Dispatcher {
    channels: HashMap<ContactMethod, Arc<dyn DeliveryChannel>>,
    policy: DeliveryPolicy,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("channels", &self.channels.keys().collect::<Vec<_>>())
            .field("policy", &self.policy)
            .finish()
    }
}

impl Dispatcher {
    /// No channels; every attempt fails with "no channel configured"
    pub fn new(policy: DeliveryPolicy) -> Self {
        Self {
            channels: HashMap::new(),
            policy,
        }
    }

    /// [`LogOnlyChannel`] for every contact method
    pub fn log_only(policy: DeliveryPolicy) -> Self {
        ContactMethod::ALL
            .into_iter()
            .fold(Self::new(policy), |d, m| {
                d.with_channel(Arc::new(LogOnlyChannel::new(m)))
            })
    }

    /// Register (or replace) the channel for its contact method
    pub fn with_channel(mut self, channel: Arc<dyn DeliveryChannel>) -> Self {
        self.channels.insert(channel.method(), channel);
        self
    }

    /// Attempt every (target, address) pair concurrently
    ///
    /// Records come back in target order, then channel order.
    pub async fn deliver_all(
        &self,
        subject: Option<&str>,
        targets: &[DeliveryTarget],
    ) -> Vec<DeliveryRecord> {
        let attempts = targets.iter().flat_map(|target| {
            target.addresses.iter().map(move |(method, address)| {
                self.deliver_one(subject, target, *method, address)
            })
        });
        join_all(attempts).await
    }

    async fn deliver_one(
        &self,
        subject: Option<&str>,
        target: &DeliveryTarget,
        method: ContactMethod,
        address: &str,
    ) -> DeliveryRecord {
        let mut record = DeliveryRecord {
            recipient: target.recipient.clone(),
            method,
            status: DeliveryStatus::Failed,
            content: target.body.clone(),
            error: None,
        };

        let Some(channel) = self.channels.get(&method) else {
            tracing::warn!(recipient = %target.recipient, method = %method, "No delivery channel configured");
            record.error = Some("no channel configured".to_string());
            return record;
        };

        let message = OutboundMessage {
            recipient: target.recipient.clone(),
            address: address.to_string(),
            subject: subject.map(str::to_string),
            body: target.body.clone(),
        };

        match self.attempt(channel.as_ref(), &message).await {
            Ok(()) => record.status = DeliveryStatus::Sent,
            Err(e) => record.error = Some(e.to_string()),
        }
        record
    }

    /// Bounded retry; each try is cut off after `policy.timeout`
    async fn attempt(
        &self,
        channel: &dyn DeliveryChannel,
        message: &OutboundMessage,
    ) -> Result<(), DeliveryError> {
        let max_attempts = self.policy.max_attempts.max(1);
        let timeout_ms = self.policy.timeout.as_millis() as u64;
        let mut last_error = DeliveryError::Timeout(timeout_ms);

        for attempt in 1..=max_attempts {
            last_error = match tokio::time::timeout(self.policy.timeout, channel.deliver(message)).await {
                Ok(Ok(())) => return Ok(()),
                Ok(Err(e)) => e,
                Err(_) => DeliveryError::Timeout(timeout_ms),
            };
            tracing::warn!(
                recipient = %message.recipient,
                method = %channel.method(),
                attempt,
                max_attempts,
                error = %last_error,
                "Delivery attempt failed"
            );
            if !last_error.is_retryable() {
                break;
            }
        }
        Err(last_error)
    }
}
