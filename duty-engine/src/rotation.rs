//! Rotation Scheduler
//!
//! 单一指针 `current_index` 指向当前住户列表中的位置（不是住户 ID），
//! 住户列表每次变更长度或顺序后都要重新校验。
//!
//! 删除策略：下移（shift-down）。删除当前位置之前的住户时指针减一；
//! 删除当前住户时指针不变（后继者顺延到该位置），越界则回到 0。

use shared::models::{LedgerAction, Resident};

use crate::ledger;
use crate::manager::{EngineError, EngineResult, EntityKind};
use crate::state::DutyDocument;

/// 当前值班住户
pub fn current(doc: &DutyDocument) -> EngineResult<&Resident> {
    doc.residents
        .get(doc.rotation.current_index)
        .ok_or(EngineError::EmptyRegistry)
}

/// 下一位值班住户
pub fn next_in_rotation(doc: &DutyDocument) -> EngineResult<&Resident> {
    let len = doc.residents.len();
    if len == 0 {
        return Err(EngineError::EmptyRegistry);
    }
    Ok(&doc.residents[(doc.rotation.current_index + 1) % len])
}

/// 轮到下一位
///
/// 住户为空时不做任何事（也不记日志），返回 `None`。
pub fn skip(doc: &mut DutyDocument, actor: &str) -> EngineResult<Option<Resident>> {
    let len = doc.residents.len();
    if len == 0 {
        return Ok(None);
    }

    let skipped = doc.residents[doc.rotation.current_index].name.clone();
    doc.rotation.current_index = (doc.rotation.current_index + 1) % len;
    let now_current = doc.residents[doc.rotation.current_index].clone();

    ledger::append(
        doc,
        Some(actor),
        LedgerAction::TurnSkipped,
        format!("Turn skipped: {} -> {}", skipped, now_current.name),
        None,
    );
    Ok(Some(now_current))
}

/// 手动指定当前值班住户
pub fn set_current(doc: &mut DutyDocument, actor: &str, resident_id: &str) -> EngineResult<Resident> {
    let position = doc
        .resident_position(resident_id)
        .ok_or_else(|| EngineError::not_found(EntityKind::Resident, resident_id))?;

    doc.rotation.current_index = position;
    let resident = doc.residents[position].clone();

    ledger::append(
        doc,
        Some(actor),
        LedgerAction::TurnSet,
        format!("Current turn set to {}", resident.name),
        None,
    );
    Ok(resident)
}

/// 删除住户后的指针校验（删除已完成，`deleted_position` 为删除前的位置）
pub fn revalidate_after_deletion(doc: &mut DutyDocument, deleted_position: usize) {
    let len = doc.residents.len();
    let index = &mut doc.rotation.current_index;

    if len == 0 {
        *index = 0;
    } else if deleted_position < *index {
        *index -= 1;
    } else if *index >= len {
        *index = 0;
    }
}
