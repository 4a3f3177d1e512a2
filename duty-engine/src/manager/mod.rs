//! DutyManager - the single owner of the duty document
//!
//! This module handles:
//! - Authorization of every mutating operation
//! - Serialized read-modify-write over residents + rotation + ledger
//! - Persistence to redb (whole document per transaction)
//! - Dispatch orchestration (fan-out outside the lock)
//!
//! # Mutation Flow
//!
//! ```text
//! transact(actor, action, f)
//!     ├─ 1. Authorization gate (denied -> Forbidden, nothing touched)
//!     ├─ 2. Take the global lock
//!     ├─ 3. Clone the live document into a draft
//!     ├─ 4. Run the component function on the draft (mutation + ledger entry)
//!     ├─ 5. Persist the draft
//!     ├─ 6. Swap the draft into live state
//!     └─ 7. Release the lock, return the result
//! ```
//!
//! Any error in steps 4-5 drops the draft, so memory and disk stay at the
//! previous snapshot.

mod error;
pub use error::*;

use std::sync::Arc;

use parking_lot::Mutex;
use shared::models::{
    AdminCreate, AdminUpdate, AdminUserResponse, DashboardSnapshot, DispatchReport, DutySlot,
    Issue, IssueCreate, IssueStatus, LedgerAction, LedgerEntry, LedgerListResponse, LedgerOrder,
    LedgerQuery, NOT_AVAILABLE, Resident, ResidentCreate, ResidentUpdate, SettingsUpdate,
    SystemSettings,
};
use shared::util::format_millis;

use crate::auth::{ActionClass, Actor};
use crate::core::Config;
use crate::dispatch::{self, Dispatcher};
use crate::state::DutyDocument;
use crate::storage::{DocumentStore, RedbStore};
use crate::utils::validation::{
    MAX_MESSAGE_LEN, MAX_NAME_LEN, validate_optional_text, validate_required_text, validate_text_len,
};
use crate::{admins, issues, ledger, residents, rotation, settings};

fn slot(resident: EngineResult<&Resident>) -> DutySlot {
    match resident {
        Ok(r) => DutySlot {
            resident_id: Some(r.id.clone()),
            name: r.name.clone(),
        },
        Err(_) => DutySlot::not_available(),
    }
}

/// Lock-guarded owner of the duty document
pub struct DutyManager {
    store: Arc<dyn DocumentStore>,
    state: Mutex<DutyDocument>,
    dispatcher: Dispatcher,
}

impl std::fmt::Debug for DutyManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DutyManager")
            .field("store", &"<DocumentStore>")
            .field("dispatcher", &self.dispatcher)
            .finish()
    }
}

impl DutyManager {
    /// Open the redb store from config, wire log-only channels and bootstrap
    pub fn open(config: &Config) -> EngineResult<Self> {
        let store = RedbStore::open(config.db_path())?;
        let manager = Self::new(
            Arc::new(store),
            Dispatcher::log_only(config.delivery_policy()),
        )?;
        if let Some(email) = &config.bootstrap_admin_email {
            manager.bootstrap_admin(email)?;
        }
        Ok(manager)
    }

    /// Load (or start) the document from an existing store
    pub fn new(store: Arc<dyn DocumentStore>, dispatcher: Dispatcher) -> EngineResult<Self> {
        let mut document = store.load()?.unwrap_or_default();
        document.normalize();
        tracing::info!(
            residents = document.residents.len(),
            current_index = document.rotation.current_index,
            logs = document.logs.len(),
            issues = document.issues.len(),
            admins = document.admins.len(),
            "DutyManager loaded document"
        );
        Ok(Self {
            store,
            state: Mutex::new(document),
            dispatcher,
        })
    }

    /// In-memory redb store (tests and dry runs)
    pub fn in_memory(dispatcher: Dispatcher) -> EngineResult<Self> {
        Self::new(Arc::new(RedbStore::open_in_memory()?), dispatcher)
    }

    /// Clone of the live document
    pub fn snapshot(&self) -> DutyDocument {
        self.state.lock().clone()
    }

    // ========== Core ==========

    fn authorize(&self, actor: &Actor, action: ActionClass) -> EngineResult<()> {
        if actor.can(action) {
            return Ok(());
        }
        tracing::warn!(
            target: "security",
            actor = %actor.name,
            role = %actor.role,
            action = %action,
            "Action denied"
        );
        Err(EngineError::Forbidden {
            role: actor.role,
            action,
        })
    }

    fn commit<T>(&self, f: impl FnOnce(&mut DutyDocument) -> EngineResult<T>) -> EngineResult<T> {
        let mut state = self.state.lock();
        let mut draft = state.clone();
        let out = f(&mut draft)?;
        if let Err(e) = self.store.save(&draft) {
            tracing::error!(error = %e, "Failed to persist document, changes discarded");
            return Err(e.into());
        }
        *state = draft;
        Ok(out)
    }

    fn transact<T>(
        &self,
        actor: &Actor,
        action: ActionClass,
        f: impl FnOnce(&mut DutyDocument) -> EngineResult<T>,
    ) -> EngineResult<T> {
        self.authorize(actor, action)?;
        self.commit(f)
    }

    fn read<T>(&self, f: impl FnOnce(&DutyDocument) -> T) -> T {
        f(&self.state.lock())
    }

    // ========== Dashboard ==========

    /// Current duty, next in rotation, last activity
    ///
    /// An empty registry yields "N/A" slots instead of an error.
    pub fn dashboard(&self) -> DashboardSnapshot {
        self.read(|doc| DashboardSnapshot {
            current_duty: slot(rotation::current(doc)),
            next_in_rotation: slot(rotation::next_in_rotation(doc)),
            last_activity: ledger::last(doc).cloned(),
            last_activity_line: ledger::last(doc)
                .map(LedgerEntry::display_line)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            last_reminder_run: ledger::last_of(doc, LedgerAction::ReminderSent)
                .map(|e| format_millis(e.timestamp))
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        })
    }

    // ========== Residents ==========

    pub fn list_residents(&self) -> Vec<Resident> {
        self.read(|doc| residents::list(doc).to_vec())
    }

    pub fn get_resident(&self, id: &str) -> EngineResult<Resident> {
        self.read(|doc| residents::get(doc, id).cloned())
    }

    pub fn add_resident(&self, actor: &Actor, input: ResidentCreate) -> EngineResult<Resident> {
        self.transact(actor, ActionClass::MutateResidents, |doc| {
            residents::add(doc, &actor.name, input)
        })
    }

    pub fn update_resident(
        &self,
        actor: &Actor,
        id: &str,
        input: ResidentUpdate,
    ) -> EngineResult<Resident> {
        self.transact(actor, ActionClass::MutateResidents, |doc| {
            residents::update(doc, &actor.name, id, input)
        })
    }

    pub fn delete_resident(&self, actor: &Actor, id: &str) -> EngineResult<Resident> {
        self.transact(actor, ActionClass::MutateResidents, |doc| {
            residents::delete(doc, &actor.name, id)
        })
    }

    // ========== Rotation ==========

    pub fn current_duty(&self) -> EngineResult<Resident> {
        self.read(|doc| rotation::current(doc).cloned())
    }

    pub fn next_in_rotation(&self) -> EngineResult<Resident> {
        self.read(|doc| rotation::next_in_rotation(doc).cloned())
    }

    /// Advance the pointer; `None` (and no ledger entry) on an empty registry
    pub fn skip_turn(&self, actor: &Actor) -> EngineResult<Option<Resident>> {
        self.authorize(actor, ActionClass::MutateResidents)?;
        if self.read(|doc| doc.residents.is_empty()) {
            return Ok(None);
        }
        self.commit(|doc| rotation::skip(doc, &actor.name))
    }

    pub fn set_current_turn(&self, actor: &Actor, resident_id: &str) -> EngineResult<Resident> {
        self.transact(actor, ActionClass::MutateResidents, |doc| {
            rotation::set_current(doc, &actor.name, resident_id)
        })
    }

    // ========== Dispatch ==========

    /// Remind the current-duty resident
    ///
    /// `message` overrides the reminder template when non-blank. Delivery
    /// failures are reported in the returned report, not as errors. If the
    /// ledger write fails after delivery the report comes back inside
    /// [`EngineError::DispatchNotRecorded`].
    pub async fn send_reminder(
        &self,
        actor: &Actor,
        message: Option<String>,
    ) -> EngineResult<DispatchReport> {
        self.authorize(actor, ActionClass::Dispatch)?;
        validate_optional_text(&message, "message", MAX_MESSAGE_LEN)?;

        let target = self.read(|doc| dispatch::plan_reminder(doc, message.as_deref()))?;
        let deliveries = self
            .dispatcher
            .deliver_all(None, std::slice::from_ref(&target))
            .await;
        let report = DispatchReport::new(None, deliveries);

        self.commit(|doc| {
            dispatch::record_reminder(doc, &actor.name, &target, &report);
            Ok(())
        })
        .inspect_err(|e| {
            tracing::error!(
                status = %report.status,
                recipient = %target.recipient,
                error = %e,
                "Reminder attempted but ledger write failed"
            )
        })
        .map_err(|e| e.after_delivery(&report))?;

        tracing::info!(recipient = %target.recipient, status = %report.status, "Reminder dispatched");
        Ok(report)
    }

    /// Broadcast to every resident; one ledger entry for the whole fan-out
    pub async fn send_announcement(
        &self,
        actor: &Actor,
        subject: &str,
        message: &str,
    ) -> EngineResult<DispatchReport> {
        self.authorize(actor, ActionClass::Dispatch)?;
        validate_required_text(message, "message", MAX_MESSAGE_LEN)?;
        validate_text_len(subject, "subject", MAX_NAME_LEN)?;

        let subject = Some(subject.trim()).filter(|s| !s.is_empty());
        let targets = self.read(|doc| dispatch::plan_announcement(doc, message.trim()));
        let deliveries = self.dispatcher.deliver_all(subject, &targets).await;
        let report = DispatchReport::new(subject.map(str::to_string), deliveries);

        self.commit(|doc| {
            dispatch::record_announcement(doc, &actor.name, targets.len(), &report);
            Ok(())
        })
        .inspect_err(|e| {
            tracing::error!(
                status = %report.status,
                recipients = targets.len(),
                error = %e,
                "Announcement attempted but ledger write failed"
            )
        })
        .map_err(|e| e.after_delivery(&report))?;

        tracing::info!(
            recipients = targets.len(),
            failed = report.failed_count(),
            status = %report.status,
            "Announcement dispatched"
        );
        Ok(report)
    }

    // ========== Issues ==========

    pub fn list_issues(&self) -> Vec<Issue> {
        self.read(|doc| issues::list(doc).to_vec())
    }

    /// Unauthenticated entry point
    pub fn report_issue(&self, input: IssueCreate) -> EngineResult<Issue> {
        self.commit(|doc| Ok(issues::report(doc, input)))
    }

    pub fn update_issue_status(
        &self,
        actor: &Actor,
        id: &str,
        status: IssueStatus,
    ) -> EngineResult<Issue> {
        self.transact(actor, ActionClass::MutateIssues, |doc| {
            issues::update_status(doc, &actor.name, id, status)
        })
    }

    // ========== Ledger ==========

    pub fn list_ledger(&self, order: LedgerOrder) -> Vec<LedgerEntry> {
        self.read(|doc| ledger::list(doc, order))
    }

    pub fn query_ledger(&self, query: &LedgerQuery) -> LedgerListResponse {
        self.read(|doc| ledger::query(doc, query))
    }

    pub fn delete_ledger_entries(&self, actor: &Actor, ids: &[u64]) -> EngineResult<usize> {
        self.transact(actor, ActionClass::ManageLedger, |doc| {
            ledger::delete_entries(doc, &actor.name, ids)
        })
    }

    // ========== Settings ==========

    pub fn get_settings(&self) -> SystemSettings {
        self.read(|doc| settings::get(doc).clone())
    }

    pub fn update_settings(
        &self,
        actor: &Actor,
        input: SettingsUpdate,
    ) -> EngineResult<SystemSettings> {
        self.transact(actor, ActionClass::ManageSettings, |doc| {
            settings::update(doc, &actor.name, input)
        })
    }

    // ========== Admins ==========

    pub fn list_admins(&self, actor: &Actor) -> EngineResult<Vec<AdminUserResponse>> {
        self.authorize(actor, ActionClass::ManageAdmins)?;
        Ok(self.read(admins::list))
    }

    pub fn add_admin(&self, actor: &Actor, input: AdminCreate) -> EngineResult<AdminUserResponse> {
        self.transact(actor, ActionClass::ManageAdmins, |doc| {
            admins::add(doc, actor, input)
        })
    }

    pub fn update_admin(
        &self,
        actor: &Actor,
        id: &str,
        input: AdminUpdate,
    ) -> EngineResult<AdminUserResponse> {
        self.transact(actor, ActionClass::ManageAdmins, |doc| {
            admins::update(doc, actor, id, input)
        })
    }

    pub fn delete_admin(&self, actor: &Actor, id: &str) -> EngineResult<AdminUserResponse> {
        self.transact(actor, ActionClass::ManageAdmins, |doc| {
            admins::delete(doc, actor, id)
        })
    }

    /// Seed a superuser when no admin exists yet
    pub fn bootstrap_admin(&self, email: &str) -> EngineResult<Option<AdminUserResponse>> {
        if self.read(|doc| !doc.admins.is_empty()) {
            return Ok(None);
        }
        let seeded = self.commit(|doc| admins::bootstrap(doc, email))?;
        if let Some(user) = &seeded {
            tracing::info!(email = %user.email, "Bootstrap superuser created");
        }
        Ok(seeded)
    }
}

#[cfg(test)]
mod tests;
