//! Admin User Model

use serde::{Deserialize, Serialize};

/// Admin role (capability level)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Superuser,
    Editor,
    Viewer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Superuser => "superuser",
            Role::Editor => "editor",
            Role::Viewer => "viewer",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Admin user entity (persisted, includes credential reference)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: String,
    pub email: String,
    pub role: Role,
    /// Opaque credential reference, validated by the external auth service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
}

/// Admin user response (without credential)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUserResponse {
    pub id: String,
    pub email: String,
    pub role: Role,
}

impl From<&AdminUser> for AdminUserResponse {
    fn from(user: &AdminUser) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// Create admin payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminCreate {
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub credential: Option<String>,
}

/// Update admin payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminUpdate {
    pub email: Option<String>,
    pub role: Option<Role>,
    pub credential: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serde() {
        assert_eq!(serde_json::to_string(&Role::Superuser).unwrap(), "\"superuser\"");
        let role: Role = serde_json::from_str("\"viewer\"").unwrap();
        assert_eq!(role, Role::Viewer);
    }

    #[test]
    fn test_response_hides_credential() {
        let user = AdminUser {
            id: "a1".to_string(),
            email: "owner@example.com".to_string(),
            role: Role::Editor,
            credential: Some("secret-ref".to_string()),
        };
        let json = serde_json::to_string(&AdminUserResponse::from(&user)).unwrap();
        assert!(!json.contains("secret-ref"));
    }
}
