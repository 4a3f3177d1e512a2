//! Resident Model

use serde::{Deserialize, Serialize};

use super::dispatch::ContactMethod;

/// Contact channels of a resident (all optional)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whatsapp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sms: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl ContactInfo {
    /// Non-blank contact addresses in fixed channel order (WhatsApp, SMS, Email)
    pub fn methods(&self) -> Vec<(ContactMethod, &str)> {
        [
            (ContactMethod::WhatsApp, self.whatsapp.as_deref()),
            (ContactMethod::Sms, self.sms.as_deref()),
            (ContactMethod::Email, self.email.as_deref()),
        ]
        .into_iter()
        .filter_map(|(method, address)| match address {
            Some(a) if !a.trim().is_empty() => Some((method, a)),
            _ => None,
        })
        .collect()
    }
}

/// Resident entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resident {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub flat_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub contact: ContactInfo,
}

impl Resident {
    /// First whitespace-separated token of the name (template `{first_name}`)
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or("")
    }
}

/// Create resident payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResidentCreate {
    pub name: String,
    #[serde(default)]
    pub flat_number: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub contact: ContactInfo,
}

/// Update resident payload (partial)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResidentUpdate {
    pub name: Option<String>,
    pub flat_number: Option<String>,
    pub notes: Option<String>,
    pub contact: Option<ContactInfo>,
}
