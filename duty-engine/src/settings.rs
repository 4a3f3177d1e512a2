//! System settings (singleton)

use shared::models::{LedgerAction, SettingsUpdate, SystemSettings};

use crate::ledger;
use crate::manager::{EngineError, EngineResult};
use crate::state::DutyDocument;
use crate::utils::validation::{
    MAX_MESSAGE_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, MAX_URL_LEN, validate_optional_text,
    validate_required_text,
};

pub fn get(doc: &DutyDocument) -> &SystemSettings {
    &doc.settings
}

/// Partial update; one ledger entry naming the changed fields
pub fn update(doc: &mut DutyDocument, actor: &str, input: SettingsUpdate) -> EngineResult<SystemSettings> {
    let fields = input.changed_fields();
    if fields.is_empty() {
        return Err(EngineError::Validation(
            "no settings fields to update".to_string(),
        ));
    }

    validate_optional_text(&input.owner_name, "owner_name", MAX_NAME_LEN)?;
    validate_optional_text(&input.owner_contact, "owner_contact", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&input.report_issue_link, "report_issue_link", MAX_URL_LEN)?;
    // 模板不能为空，否则提醒内容为空
    if let Some(t) = &input.reminder_template {
        validate_required_text(t, "reminder_template", MAX_MESSAGE_LEN)?;
    }
    if let Some(t) = &input.announcement_template {
        validate_required_text(t, "announcement_template", MAX_MESSAGE_LEN)?;
    }

    let settings = &mut doc.settings;
    if let Some(v) = input.owner_name {
        settings.owner_name = v;
    }
    if let Some(v) = input.owner_contact {
        settings.owner_contact = v;
    }
    if let Some(v) = input.report_issue_link {
        settings.report_issue_link = v;
    }
    if let Some(v) = input.reminder_template {
        settings.reminder_template = v;
    }
    if let Some(v) = input.announcement_template {
        settings.announcement_template = v;
    }
    let updated = settings.clone();

    ledger::append(
        doc,
        Some(actor),
        LedgerAction::SettingsUpdated,
        format!("Settings updated: {}", fields.join(", ")),
        None,
    );
    Ok(updated)
}
