//! System Settings Model

use serde::{Deserialize, Serialize};

pub const DEFAULT_REMINDER_TEMPLATE: &str =
    "Hi {first_name}, it's your turn to take out the bins this week (flat {flat_number}). Thank you!";

pub const DEFAULT_ANNOUNCEMENT_TEMPLATE: &str = "Hi {first_name}, {message}";

/// System settings (singleton)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemSettings {
    #[serde(default)]
    pub owner_name: String,
    #[serde(default)]
    pub owner_contact: String,
    #[serde(default)]
    pub report_issue_link: String,
    /// Placeholders: `{first_name}`, `{flat_number}`
    #[serde(default = "default_reminder_template")]
    pub reminder_template: String,
    /// Placeholders: `{first_name}`, `{message}`
    #[serde(default = "default_announcement_template")]
    pub announcement_template: String,
}

fn default_reminder_template() -> String {
    DEFAULT_REMINDER_TEMPLATE.to_string()
}

fn default_announcement_template() -> String {
    DEFAULT_ANNOUNCEMENT_TEMPLATE.to_string()
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self {
            owner_name: String::new(),
            owner_contact: String::new(),
            report_issue_link: String::new(),
            reminder_template: default_reminder_template(),
            announcement_template: default_announcement_template(),
        }
    }
}

/// Update settings payload (partial)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub owner_name: Option<String>,
    pub owner_contact: Option<String>,
    pub report_issue_link: Option<String>,
    pub reminder_template: Option<String>,
    pub announcement_template: Option<String>,
}

impl SettingsUpdate {
    /// Names of the fields this update touches
    pub fn changed_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.owner_name.is_some() {
            fields.push("owner_name");
        }
        if self.owner_contact.is_some() {
            fields.push("owner_contact");
        }
        if self.report_issue_link.is_some() {
            fields.push("report_issue_link");
        }
        if self.reminder_template.is_some() {
            fields.push("reminder_template");
        }
        if self.announcement_template.is_some() {
            fields.push("announcement_template");
        }
        fields
    }
}
