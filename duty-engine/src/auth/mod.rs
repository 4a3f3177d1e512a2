//! Authorization 模块
//!
//! 身份认证（令牌签发、校验）由上游完成，引擎只接收已解析的角色。
//!
//! - [`permissions`] - 角色 → 动作类别授权表
//! - [`Actor`] - 当前请求的操作人

pub mod permissions;

pub use permissions::{ActionClass, allowed};
pub use shared::models::Role;

/// 当前请求的操作人
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// 管理员 ID（用于禁止修改自身记录）
    pub id: String,
    /// 写入日志的显示名
    pub name: String,
    pub role: Role,
}

impl Actor {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
        }
    }

    /// 定时任务等内部调用方
    pub fn system() -> Self {
        Self::new("system", "system", Role::Superuser)
    }

    pub fn can(&self, action: ActionClass) -> bool {
        allowed(self.role, action)
    }
}
