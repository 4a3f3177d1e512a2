//! The persisted aggregate
//!
//! 住户、轮值指针、日志、报修、设置和管理员存放在同一个文档中，
//! 所有组件都在同一份快照上操作，由 [`DutyManager`](crate::DutyManager) 的全局锁保护。

use serde::{Deserialize, Serialize};
use shared::models::{
    AdminUser, Issue, LedgerEntry, Resident, SystemSettings, deserialize_logs,
};

/// 轮值指针
///
/// 不变量：住户非空时 `current_index < residents.len()`；住户为空时为 0。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationState {
    #[serde(default)]
    pub current_index: usize,
}

/// 单文档持久化状态
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyDocument {
    #[serde(default)]
    pub residents: Vec<Resident>,
    #[serde(default)]
    pub rotation: RotationState,
    /// 存储顺序即时间顺序
    #[serde(default, deserialize_with = "deserialize_logs")]
    pub logs: Vec<LedgerEntry>,
    #[serde(default)]
    pub issues: Vec<Issue>,
    #[serde(default)]
    pub settings: SystemSettings,
    #[serde(default)]
    pub admins: Vec<AdminUser>,
    /// 最后分配的日志 ID（删除后不复用）
    #[serde(default)]
    pub ledger_seq: u64,
}

impl DutyDocument {
    /// 修复从存储加载的文档（越界指针、落后的日志序号）
    pub fn normalize(&mut self) {
        let len = self.residents.len();
        if len == 0 {
            self.rotation.current_index = 0;
        } else if self.rotation.current_index >= len {
            tracing::warn!(
                current_index = self.rotation.current_index,
                residents = len,
                "Stored rotation pointer out of bounds, resetting to 0"
            );
            self.rotation.current_index = 0;
        }

        let max_id = self.logs.iter().map(|e| e.id).max().unwrap_or(0);
        if self.ledger_seq < max_id {
            self.ledger_seq = max_id;
        }

        // 旧版字符串条目从序号之后分配，不与已发出的 ID 冲突
        let mut upgraded = 0usize;
        for entry in self
            .logs
            .iter_mut()
            .filter(|e| e.id == LedgerEntry::UNASSIGNED_ID)
        {
            self.ledger_seq += 1;
            entry.id = self.ledger_seq;
            upgraded += 1;
        }
        if upgraded > 0 {
            tracing::info!(upgraded, ledger_seq = self.ledger_seq, "Upgraded legacy ledger entries");
        }
    }

    /// 住户在当前顺序中的位置
    pub fn resident_position(&self, resident_id: &str) -> Option<usize> {
        self.residents.iter().position(|r| r.id == resident_id)
    }

    /// 分配下一个日志 ID
    pub fn next_ledger_id(&mut self) -> u64 {
        self.ledger_seq += 1;
        self.ledger_seq
    }
}
