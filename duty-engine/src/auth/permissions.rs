//! Permission Definitions
//!
//! 固定的三级角色模型，不可配置。
//!
//! ## 设计原则
//! - 读取操作对所有角色开放
//! - 住户、报修、通知、日志维护：editor 及以上
//! - 管理员和系统设置：仅 superuser

use serde::{Deserialize, Serialize};
use shared::models::Role;

/// 受控动作类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionClass {
    Read,
    MutateResidents,
    MutateIssues,
    /// 提醒 / 公告
    Dispatch,
    /// 批量删除日志条目
    ManageLedger,
    ManageAdmins,
    ManageSettings,
}

impl ActionClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionClass::Read => "read",
            ActionClass::MutateResidents => "mutate_residents",
            ActionClass::MutateIssues => "mutate_issues",
            ActionClass::Dispatch => "dispatch",
            ActionClass::ManageLedger => "manage_ledger",
            ActionClass::ManageAdmins => "manage_admins",
            ActionClass::ManageSettings => "manage_settings",
        }
    }

    /// 仅 superuser 可执行
    pub fn is_superuser_only(&self) -> bool {
        matches!(self, ActionClass::ManageAdmins | ActionClass::ManageSettings)
    }
}

impl std::fmt::Display for ActionClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// editor 可执行的动作
pub const EDITOR_ACTIONS: &[ActionClass] = &[
    ActionClass::Read,
    ActionClass::MutateResidents,
    ActionClass::MutateIssues,
    ActionClass::Dispatch,
    ActionClass::ManageLedger,
];

/// viewer 只读
pub const VIEWER_ACTIONS: &[ActionClass] = &[ActionClass::Read];

/// 授权判定（纯函数）
pub fn allowed(role: Role, action: ActionClass) -> bool {
    match role {
        Role::Superuser => true,
        Role::Editor => EDITOR_ACTIONS.contains(&action),
        Role::Viewer => VIEWER_ACTIONS.contains(&action),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [ActionClass; 7] = [
        ActionClass::Read,
        ActionClass::MutateResidents,
        ActionClass::MutateIssues,
        ActionClass::Dispatch,
        ActionClass::ManageLedger,
        ActionClass::ManageAdmins,
        ActionClass::ManageSettings,
    ];

    #[test]
    fn test_read_is_always_allowed() {
        for role in [Role::Superuser, Role::Editor, Role::Viewer] {
            assert!(allowed(role, ActionClass::Read));
        }
    }

    #[test]
    fn test_superuser_allowed_everything() {
        assert!(ALL.iter().all(|a| allowed(Role::Superuser, *a)));
    }

    #[test]
    fn test_editor_cannot_manage_admins_or_settings() {
        for action in ALL {
            assert_eq!(allowed(Role::Editor, action), !action.is_superuser_only());
        }
    }

    #[test]
    fn test_viewer_is_read_only() {
        for action in ALL {
            assert_eq!(allowed(Role::Viewer, action), action == ActionClass::Read);
        }
    }
}
