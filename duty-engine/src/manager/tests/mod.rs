use super::*;
use crate::dispatch::{DeliveryChannel, DeliveryError, DeliveryPolicy, OutboundMessage};
use crate::storage::{StorageError, StorageResult};
use async_trait::async_trait;
use shared::models::{ContactInfo, ContactMethod, DeliveryStatus, DispatchStatus, Role};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

fn test_policy() -> DeliveryPolicy {
    DeliveryPolicy {
        timeout: Duration::from_millis(100),
        max_attempts: 2,
    }
}

fn create_test_manager() -> DutyManager {
    DutyManager::in_memory(Dispatcher::log_only(test_policy())).unwrap()
}

fn superuser() -> Actor {
    Actor::new("su-1", "root@example.com", Role::Superuser)
}

fn editor() -> Actor {
    Actor::new("ed-1", "editor@example.com", Role::Editor)
}

fn viewer() -> Actor {
    Actor::new("vw-1", "viewer@example.com", Role::Viewer)
}

fn resident_input(name: &str, flat: &str) -> ResidentCreate {
    ResidentCreate {
        name: name.to_string(),
        flat_number: flat.to_string(),
        notes: None,
        contact: ContactInfo {
            email: Some(format!(
                "{}@example.com",
                name.split_whitespace().next().unwrap_or("x").to_lowercase()
            )),
            ..Default::default()
        },
    }
}

/// Add residents in order, return their ids
fn seed_residents(manager: &DutyManager, names: &[&str]) -> Vec<String> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            manager
                .add_resident(&editor(), resident_input(name, &format!("{}A", i + 1)))
                .unwrap()
                .id
        })
        .collect()
}

fn leak_report() -> IssueCreate {
    IssueCreate {
        reported_by: "Ann Lee".to_string(),
        flat_number: "1A".to_string(),
        description: "Bathroom ceiling is dripping".to_string(),
        image_url: None,
    }
}

// ========================================================================
// Mock delivery channels
// ========================================================================

/// Fails for one recipient address, succeeds for everyone else
struct FailForAddress {
    method: ContactMethod,
    address: String,
    calls: AtomicUsize,
}

impl FailForAddress {
    fn new(method: ContactMethod, address: &str) -> Self {
        Self {
            method,
            address: address.to_string(),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl DeliveryChannel for FailForAddress {
    fn method(&self) -> ContactMethod {
        self.method
    }

    async fn deliver(&self, message: &OutboundMessage) -> Result<(), DeliveryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if message.address == self.address {
            Err(DeliveryError::Transport("gateway returned 503".into()))
        } else {
            Ok(())
        }
    }
}

/// Records every message it accepts
#[derive(Default)]
struct RecordingChannel {
    sent: parking_lot::Mutex<Vec<OutboundMessage>>,
}

#[async_trait]
impl DeliveryChannel for RecordingChannel {
    fn method(&self) -> ContactMethod {
        ContactMethod::Email
    }

    async fn deliver(&self, message: &OutboundMessage) -> Result<(), DeliveryError> {
        self.sent.lock().push(message.clone());
        Ok(())
    }
}

// ========================================================================
// Store that can be switched into failure mode
// ========================================================================

struct FlakyStore {
    inner: RedbStore,
    failing: AtomicBool,
}

impl FlakyStore {
    fn new() -> Self {
        Self {
            inner: RedbStore::open_in_memory().unwrap(),
            failing: AtomicBool::new(false),
        }
    }

    fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl DocumentStore for FlakyStore {
    fn load(&self) -> StorageResult<Option<DutyDocument>> {
        self.inner.load()
    }

    fn save(&self, document: &DutyDocument) -> StorageResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("disk offline".into()));
        }
        self.inner.save(document)
    }
}

mod test_admins;
mod test_authorization;
mod test_dispatch;
