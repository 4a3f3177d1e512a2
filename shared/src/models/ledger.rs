//! Event Ledger Model
//!
//! 追加式（append-only）操作日志：每个状态变更动作一条记录。
//! 旧版本持久化的日志是纯字符串，读取时自动升级为 [`LedgerEntry`]。

use serde::{Deserialize, Deserializer, Serialize};

use super::dispatch::DispatchReport;

/// 日志动作类别（枚举，非自由文本）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerAction {
    // ═══ 住户 ═══
    ResidentAdded,
    ResidentUpdated,
    ResidentDeleted,

    // ═══ 轮值 ═══
    TurnSkipped,
    TurnSet,

    // ═══ 通知 ═══
    ReminderSent,
    AnnouncementSent,

    // ═══ 报修 ═══
    IssueReported,
    IssueStatusChanged,

    // ═══ 管理 ═══
    SettingsUpdated,
    AdminAdded,
    AdminUpdated,
    AdminDeleted,
    LedgerEntriesDeleted,

    // ═══ 系统 ═══
    SystemBootstrap,
    /// 旧版纯文本日志
    Legacy,
}

impl std::fmt::Display for LedgerAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// 日志条目（写入后不可修改）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// 递增序列号（唯一标识，删除后不复用）
    pub id: u64,
    /// Unix 毫秒，按存储顺序单调不减
    pub timestamp: i64,
    pub message: String,
    /// 操作人（系统事件为 None）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
    #[serde(default = "legacy_action")]
    pub action: LedgerAction,
    /// 通知类动作的逐收件人投递明细
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<DispatchReport>,
}

fn legacy_action() -> LedgerAction {
    LedgerAction::Legacy
}

impl LedgerEntry {
    /// 0 = 尚未分配 ID 的旧版条目
    pub const UNASSIGNED_ID: u64 = 0;

    fn legacy(id: u64, message: String) -> Self {
        Self {
            id,
            timestamp: 0,
            message,
            actor: None,
            action: LedgerAction::Legacy,
            details: None,
        }
    }

    /// 展示用单行文本：`YYYY-MM-DD HH:MM - message`
    pub fn display_line(&self) -> String {
        if self.action == LedgerAction::Legacy && self.timestamp == 0 {
            return self.message.clone();
        }
        format!("{} - {}", crate::util::format_millis(self.timestamp), self.message)
    }
}

/// 持久化格式：新条目或旧版字符串
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredLogRecord {
    Entry(LedgerEntry),
    Legacy(String),
}

/// 反序列化 `logs` 数组，兼容旧版纯字符串条目
///
/// 旧条目保持原有存储位置，ID 先置为 0（未分配），
/// 由文档加载时按日志序号补发。
pub fn deserialize_logs<'de, D>(deserializer: D) -> Result<Vec<LedgerEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    let records = Vec::<StoredLogRecord>::deserialize(deserializer)?;
    Ok(records
        .into_iter()
        .map(|r| match r {
            StoredLogRecord::Entry(e) => e,
            StoredLogRecord::Legacy(message) => {
                LedgerEntry::legacy(LedgerEntry::UNASSIGNED_ID, message)
            }
        })
        .collect())
}

/// 读取顺序（仅影响返回结果，不改变存储顺序）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerOrder {
    Chronological,
    #[default]
    ReverseChronological,
}

/// 日志查询参数
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerQuery {
    #[serde(default)]
    pub order: LedgerOrder,
    /// 动作类别过滤
    pub action: Option<LedgerAction>,
    /// 操作人过滤
    pub actor: Option<String>,
    /// 分页偏移
    #[serde(default)]
    pub offset: usize,
    /// 分页大小（默认 50）
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    50
}

impl Default for LedgerQuery {
    fn default() -> Self {
        Self {
            order: LedgerOrder::default(),
            action: None,
            actor: None,
            offset: 0,
            limit: default_limit(),
        }
    }
}

/// 日志列表响应
#[derive(Debug, Clone, Serialize)]
pub struct LedgerListResponse {
    pub items: Vec<LedgerEntry>,
    /// 过滤后的总数（分页前）
    pub total: usize,
}
