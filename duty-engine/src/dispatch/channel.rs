//! Delivery channels
//!
//! Real transports (WhatsApp gateway, SMS provider, mail relay) live outside
//! the engine and plug in through [`DeliveryChannel`].

use async_trait::async_trait;
use shared::models::ContactMethod;
use thiserror::Error;

/// One message to one address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    /// Resident name
    pub recipient: String,
    /// Phone number / WhatsApp id / email address
    pub address: String,
    pub subject: Option<String>,
    pub body: String,
}

#[derive(Debug, Clone, Error)]
pub enum DeliveryError {
    /// Permanent refusal (bad address, blocked recipient); not retried
    #[error("Rejected: {0}")]
    Rejected(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Timed out after {0} ms")]
    Timeout(u64),
}

impl DeliveryError {
    pub fn is_retryable(&self) -> bool {
        !matches!(self, DeliveryError::Rejected(_))
    }
}

/// A notification transport for one contact method
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    fn method(&self) -> ContactMethod;

    async fn deliver(&self, message: &OutboundMessage) -> Result<(), DeliveryError>;
}

/// Channel that only writes the message to the log
///
/// Used by the binary when no transport is wired in, so scheduled runs still
/// advance the ledger and show what would have been sent.
#[derive(Debug, Clone, Copy)]
pub struct LogOnlyChannel {
    method: ContactMethod,
}

impl LogOnlyChannel {
    pub fn new(method: ContactMethod) -> Self {
        Self { method }
    }
}

#[async_trait]
impl DeliveryChannel for LogOnlyChannel {
    fn method(&self) -> ContactMethod {
        self.method
    }

    async fn deliver(&self, message: &OutboundMessage) -> Result<(), DeliveryError> {
        tracing::info!(
            method = %self.method,
            recipient = %message.recipient,
            address = %message.address,
            subject = message.subject.as_deref().unwrap_or("-"),
            body = %message.body,
            "Message delivered (log only)"
        );
        Ok(())
    }
}
