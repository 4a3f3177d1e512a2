//! Event Ledger
//!
//! Append-only. Storage order is chronological and never changes; readers
//! may reverse it. The only removal path is [`delete_entries`], gated by
//! `manage_ledger`, and it records itself.

use std::collections::HashSet;

use shared::models::{
    DispatchReport, LedgerAction, LedgerEntry, LedgerListResponse, LedgerOrder, LedgerQuery,
};
use shared::util::now_millis;

use crate::manager::{EngineError, EngineResult, EntityKind};
use crate::state::DutyDocument;

/// Append one entry
///
/// The timestamp never goes below the previous entry's, so storage order
/// stays non-decreasing even if the wall clock steps back.
pub fn append<'a>(
    doc: &'a mut DutyDocument,
    actor: Option<&str>,
    action: LedgerAction,
    message: impl Into<String>,
    details: Option<DispatchReport>,
) -> &'a LedgerEntry {
    let last_ts = doc.logs.last().map(|e| e.timestamp).unwrap_or(i64::MIN);
    let entry = LedgerEntry {
        id: doc.next_ledger_id(),
        timestamp: now_millis().max(last_ts),
        message: message.into(),
        actor: actor.map(str::to_string),
        action,
        details,
    };

    tracing::info!(
        target: "ledger",
        id = entry.id,
        action = %entry.action,
        actor = entry.actor.as_deref().unwrap_or("-"),
        "{}",
        entry.message
    );

    doc.logs.push(entry);
    let idx = doc.logs.len() - 1;
    &doc.logs[idx]
}

/// All entries in the requested order
pub fn list(doc: &DutyDocument, order: LedgerOrder) -> Vec<LedgerEntry> {
    match order {
        LedgerOrder::Chronological => doc.logs.clone(),
        LedgerOrder::ReverseChronological => doc.logs.iter().rev().cloned().collect(),
    }
}

/// Filtered, paginated read
pub fn query(doc: &DutyDocument, q: &LedgerQuery) -> LedgerListResponse {
    let matches = |e: &&LedgerEntry| {
        q.action.is_none_or(|a| e.action == a)
            && q.actor.as_deref().is_none_or(|a| e.actor.as_deref() == Some(a))
    };

    let filtered: Vec<&LedgerEntry> = match q.order {
        LedgerOrder::Chronological => doc.logs.iter().filter(matches).collect(),
        LedgerOrder::ReverseChronological => doc.logs.iter().rev().filter(matches).collect(),
    };

    LedgerListResponse {
        total: filtered.len(),
        items: filtered
            .into_iter()
            .skip(q.offset)
            .take(q.limit)
            .cloned()
            .collect(),
    }
}

/// Most recent entry
pub fn last(doc: &DutyDocument) -> Option<&LedgerEntry> {
    doc.logs.last()
}

/// Most recent entry of one action category
pub fn last_of(doc: &DutyDocument, action: LedgerAction) -> Option<&LedgerEntry> {
    doc.logs.iter().rev().find(|e| e.action == action)
}

/// Bulk delete by id
///
/// All ids must exist; otherwise nothing is removed. Returns the number of
/// removed entries. The deletion itself is recorded as a new entry.
pub fn delete_entries(doc: &mut DutyDocument, actor: &str, ids: &[u64]) -> EngineResult<usize> {
    if ids.is_empty() {
        return Err(EngineError::Validation(
            "no ledger entries selected".to_string(),
        ));
    }

    let wanted: HashSet<u64> = ids.iter().copied().collect();
    let existing: HashSet<u64> = doc.logs.iter().map(|e| e.id).collect();
    if let Some(missing) = ids.iter().find(|id| !existing.contains(id)) {
        return Err(EngineError::not_found(
            EntityKind::LedgerEntry,
            missing.to_string(),
        ));
    }

    doc.logs.retain(|e| !wanted.contains(&e.id));
    let removed = wanted.len();

    append(
        doc,
        Some(actor),
        LedgerAction::LedgerEntriesDeleted,
        format!("Deleted {} ledger entries", removed),
        None,
    );
    Ok(removed)
}
