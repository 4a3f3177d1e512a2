//! Issue Workflow
//!
//! 状态只能前进：Reported → In Progress → Resolved，允许 Reported → Resolved。
//! 回退和原地写入都视为非法迁移。

use shared::models::{Issue, IssueCreate, IssueStatus, LedgerAction};
use shared::util::{new_id, now_millis};

use crate::ledger;
use crate::manager::{EngineError, EngineResult, EntityKind};
use crate::state::DutyDocument;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, MAX_URL_LEN, clamp_text,
};

/// 日志中描述的截断长度
const SUMMARY_CHARS: usize = 60;

fn summary(description: &str) -> String {
    let trimmed = description.trim();
    if trimmed.chars().count() <= SUMMARY_CHARS {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(SUMMARY_CHARS).collect();
    format!("{}…", cut.trim_end())
}

pub fn list(doc: &DutyDocument) -> &[Issue] {
    &doc.issues
}

/// 住户报修（无需登录）
///
/// 总是创建一条 `Reported` 状态的报修，操作人记为报修人。
/// 超长文本截断而不是拒绝；超长的图片地址直接丢弃。
pub fn report(doc: &mut DutyDocument, input: IssueCreate) -> Issue {
    let image_url = input
        .image_url
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .filter(|u| {
            let fits = u.chars().count() <= MAX_URL_LEN;
            if !fits {
                tracing::warn!(len = u.chars().count(), "Issue image URL too long, dropped");
            }
            fits
        });
    let issue = Issue {
        id: new_id(),
        reported_by: clamp_text(&input.reported_by, MAX_NAME_LEN),
        flat_number: clamp_text(&input.flat_number, MAX_SHORT_TEXT_LEN),
        description: clamp_text(&input.description, MAX_NOTE_LEN),
        image_url,
        status: IssueStatus::Reported,
        timestamp: now_millis(),
    };
    doc.issues.push(issue.clone());

    let reporter = Some(issue.reported_by.as_str()).filter(|r| !r.is_empty());
    ledger::append(
        doc,
        reporter,
        LedgerAction::IssueReported,
        format!(
            "Issue reported by {} (flat {}): {}",
            reporter.unwrap_or("anonymous"),
            issue.flat_number,
            summary(&issue.description)
        ),
        None,
    );
    issue
}

/// 状态迁移
pub fn update_status(
    doc: &mut DutyDocument,
    actor: &str,
    id: &str,
    new_status: IssueStatus,
) -> EngineResult<Issue> {
    let issue = doc
        .issues
        .iter_mut()
        .find(|i| i.id == id)
        .ok_or_else(|| EngineError::not_found(EntityKind::Issue, id))?;

    let from = issue.status;
    if !from.can_transition_to(new_status) {
        return Err(EngineError::InvalidTransition {
            from,
            to: new_status,
        });
    }
    issue.status = new_status;
    let updated = issue.clone();

    ledger::append(
        doc,
        Some(actor),
        LedgerAction::IssueStatusChanged,
        format!(
            "Issue '{}' (flat {}): {} -> {}",
            summary(&updated.description),
            updated.flat_number,
            from,
            new_status
        ),
        None,
    );
    Ok(updated)
}
