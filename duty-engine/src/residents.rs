//! Resident Registry
//!
//! Ordered collection; position in `doc.residents` is the rotation order.
//! Every successful mutation appends exactly one ledger entry.

use shared::models::{ContactInfo, LedgerAction, Resident, ResidentCreate, ResidentUpdate};
use shared::util::new_id;

use crate::ledger;
use crate::manager::{EngineError, EngineResult, EntityKind};
use crate::rotation;
use crate::state::DutyDocument;
use crate::utils::validation::{
    MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_required_text, validate_text_len,
};

fn validate_contact(contact: &ContactInfo) -> EngineResult<()> {
    validate_optional_text(&contact.whatsapp, "whatsapp", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&contact.sms, "sms", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&contact.email, "email", MAX_EMAIL_LEN)?;
    Ok(())
}

pub fn list(doc: &DutyDocument) -> &[Resident] {
    &doc.residents
}

pub fn get<'a>(doc: &'a DutyDocument, id: &str) -> EngineResult<&'a Resident> {
    doc.residents
        .iter()
        .find(|r| r.id == id)
        .ok_or_else(|| EngineError::not_found(EntityKind::Resident, id))
}

/// Append a resident at the end of the rotation
pub fn add(doc: &mut DutyDocument, actor: &str, input: ResidentCreate) -> EngineResult<Resident> {
    validate_required_text(&input.name, "name", MAX_NAME_LEN)?;
    validate_text_len(&input.flat_number, "flat_number", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&input.notes, "notes", MAX_NOTE_LEN)?;
    validate_contact(&input.contact)?;

    let resident = Resident {
        id: new_id(),
        name: input.name.trim().to_string(),
        flat_number: input.flat_number.trim().to_string(),
        notes: input.notes,
        contact: input.contact,
    };
    doc.residents.push(resident.clone());

    ledger::append(
        doc,
        Some(actor),
        LedgerAction::ResidentAdded,
        format!("Resident added: {}", resident.name),
        None,
    );
    Ok(resident)
}

/// Partial update; position in the rotation is unchanged
pub fn update(
    doc: &mut DutyDocument,
    actor: &str,
    id: &str,
    input: ResidentUpdate,
) -> EngineResult<Resident> {
    if let Some(name) = &input.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&input.flat_number, "flat_number", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&input.notes, "notes", MAX_NOTE_LEN)?;
    if let Some(contact) = &input.contact {
        validate_contact(contact)?;
    }

    let position = doc
        .resident_position(id)
        .ok_or_else(|| EngineError::not_found(EntityKind::Resident, id))?;

    let resident = &mut doc.residents[position];
    if let Some(name) = input.name {
        resident.name = name.trim().to_string();
    }
    if let Some(flat_number) = input.flat_number {
        resident.flat_number = flat_number.trim().to_string();
    }
    if let Some(notes) = input.notes {
        resident.notes = Some(notes).filter(|n| !n.trim().is_empty());
    }
    if let Some(contact) = input.contact {
        resident.contact = contact;
    }
    let updated = resident.clone();

    ledger::append(
        doc,
        Some(actor),
        LedgerAction::ResidentUpdated,
        format!("Resident updated: {}", updated.name),
        None,
    );
    Ok(updated)
}

/// Remove a resident and re-validate the rotation pointer
pub fn delete(doc: &mut DutyDocument, actor: &str, id: &str) -> EngineResult<Resident> {
    let position = doc
        .resident_position(id)
        .ok_or_else(|| EngineError::not_found(EntityKind::Resident, id))?;

    let removed = doc.residents.remove(position);
    rotation::revalidate_after_deletion(doc, position);

    ledger::append(
        doc,
        Some(actor),
        LedgerAction::ResidentDeleted,
        format!("Resident deleted: {}", removed.name),
        None,
    );
    Ok(removed)
}
