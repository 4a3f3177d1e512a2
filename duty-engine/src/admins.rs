//! Admin management
//!
//! Emails are unique (case-insensitive). An actor can never edit or delete
//! their own record.

use shared::models::{AdminCreate, AdminUpdate, AdminUser, AdminUserResponse, LedgerAction, Role};
use shared::util::new_id;

use crate::auth::Actor;
use crate::ledger;
use crate::manager::{EngineError, EngineResult, EntityKind};
use crate::state::DutyDocument;
use crate::utils::validation::validate_email;

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn ensure_email_free(doc: &DutyDocument, email: &str, except_id: Option<&str>) -> EngineResult<()> {
    let taken = doc
        .admins
        .iter()
        .any(|a| Some(a.id.as_str()) != except_id && normalize_email(&a.email) == email);
    if taken {
        return Err(EngineError::Conflict {
            kind: EntityKind::Admin,
            value: email.to_string(),
        });
    }
    Ok(())
}

fn position_of_other(doc: &DutyDocument, actor: &Actor, id: &str) -> EngineResult<usize> {
    let position = doc
        .admins
        .iter()
        .position(|a| a.id == id)
        .ok_or_else(|| EngineError::not_found(EntityKind::Admin, id))?;
    if actor.id == id {
        return Err(EngineError::SelfModification);
    }
    Ok(position)
}

/// Credential is never exposed
pub fn list(doc: &DutyDocument) -> Vec<AdminUserResponse> {
    doc.admins.iter().map(AdminUserResponse::from).collect()
}

pub fn add(doc: &mut DutyDocument, actor: &Actor, input: AdminCreate) -> EngineResult<AdminUserResponse> {
    validate_email(&input.email)?;
    let email = normalize_email(&input.email);
    ensure_email_free(doc, &email, None)?;

    let user = AdminUser {
        id: new_id(),
        email,
        role: input.role,
        credential: input.credential,
    };
    doc.admins.push(user.clone());

    ledger::append(
        doc,
        Some(actor.name.as_str()),
        LedgerAction::AdminAdded,
        format!("Admin added: {} ({})", user.email, user.role),
        None,
    );
    Ok(AdminUserResponse::from(&user))
}

pub fn update(
    doc: &mut DutyDocument,
    actor: &Actor,
    id: &str,
    input: AdminUpdate,
) -> EngineResult<AdminUserResponse> {
    let position = position_of_other(doc, actor, id)?;

    let email = match &input.email {
        Some(e) => {
            validate_email(e)?;
            let e = normalize_email(e);
            ensure_email_free(doc, &e, Some(id))?;
            Some(e)
        }
        None => None,
    };

    let user = &mut doc.admins[position];
    let old_role = user.role;
    if let Some(email) = email {
        user.email = email;
    }
    if let Some(role) = input.role {
        user.role = role;
    }
    if let Some(credential) = input.credential {
        user.credential = Some(credential);
    }
    let updated = AdminUserResponse::from(&*user);

    let message = if old_role != updated.role {
        format!("Admin updated: {} ({} -> {})", updated.email, old_role, updated.role)
    } else {
        format!("Admin updated: {}", updated.email)
    };
    ledger::append(doc, Some(actor.name.as_str()), LedgerAction::AdminUpdated, message, None);
    Ok(updated)
}

pub fn delete(doc: &mut DutyDocument, actor: &Actor, id: &str) -> EngineResult<AdminUserResponse> {
    let position = position_of_other(doc, actor, id)?;
    let removed = doc.admins.remove(position);

    ledger::append(
        doc,
        Some(actor.name.as_str()),
        LedgerAction::AdminDeleted,
        format!("Admin deleted: {}", removed.email),
        None,
    );
    Ok(AdminUserResponse::from(&removed))
}

/// Seed a superuser into an empty admin list
///
/// Returns `None` when admins already exist.
pub fn bootstrap(doc: &mut DutyDocument, email: &str) -> EngineResult<Option<AdminUserResponse>> {
    if !doc.admins.is_empty() {
        return Ok(None);
    }
    validate_email(email)?;

    let user = AdminUser {
        id: new_id(),
        email: normalize_email(email),
        role: Role::Superuser,
        credential: None,
    };
    doc.admins.push(user.clone());

    ledger::append(
        doc,
        Some(Actor::system().name.as_str()),
        LedgerAction::SystemBootstrap,
        format!("Bootstrap superuser created: {}", user.email),
        None,
    );
    Ok(Some(AdminUserResponse::from(&user)))
}
