use super::*;
use shared::error::{AppError, ErrorCode};

/// Run a denied operation and check nothing moved
fn assert_denied<T: std::fmt::Debug>(
    manager: &DutyManager,
    expected: ErrorCode,
    op: impl FnOnce(&DutyManager) -> EngineResult<T>,
) {
    let before = manager.snapshot();
    let err = op(manager).unwrap_err();
    assert!(matches!(err, EngineError::Forbidden { .. }), "got {:?}", err);
    let app: AppError = err.into();
    assert_eq!(app.code, expected);
    assert_eq!(manager.snapshot(), before);
}

#[test]
fn test_viewer_cannot_mutate() {
    let manager = create_test_manager();
    let ids = seed_residents(&manager, &["Ann", "Bob"]);
    let issue = manager.report_issue(leak_report()).unwrap();
    let v = viewer();

    assert_denied(&manager, ErrorCode::PermissionDenied, |m| {
        m.add_resident(&v, resident_input("Cid", "3A"))
    });
    assert_denied(&manager, ErrorCode::PermissionDenied, |m| {
        m.update_resident(&v, &ids[0], ResidentUpdate::default())
    });
    assert_denied(&manager, ErrorCode::PermissionDenied, |m| {
        m.delete_resident(&v, &ids[0])
    });
    assert_denied(&manager, ErrorCode::PermissionDenied, |m| m.skip_turn(&v));
    assert_denied(&manager, ErrorCode::PermissionDenied, |m| {
        m.set_current_turn(&v, &ids[1])
    });
    assert_denied(&manager, ErrorCode::PermissionDenied, |m| {
        m.update_issue_status(&v, &issue.id, IssueStatus::Resolved)
    });
    assert_denied(&manager, ErrorCode::PermissionDenied, |m| {
        m.delete_ledger_entries(&v, &[1])
    });
}

#[tokio::test]
async fn test_viewer_cannot_dispatch() {
    let manager = create_test_manager();
    seed_residents(&manager, &["Ann"]);
    let before = manager.snapshot();

    let err = manager.send_reminder(&viewer(), None).await.unwrap_err();
    assert!(matches!(err, EngineError::Forbidden { .. }));
    let err = manager
        .send_announcement(&viewer(), "Notice", "hello")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden { .. }));
    assert_eq!(manager.snapshot(), before);
}

#[test]
fn test_editor_cannot_touch_superuser_areas() {
    let manager = create_test_manager();
    let ed = editor();

    assert_denied(&manager, ErrorCode::SuperuserRequired, |m| m.list_admins(&ed));
    assert_denied(&manager, ErrorCode::SuperuserRequired, |m| {
        m.add_admin(
            &ed,
            AdminCreate {
                email: "new@example.com".into(),
                role: Role::Viewer,
                credential: None,
            },
        )
    });
    assert_denied(&manager, ErrorCode::SuperuserRequired, |m| {
        m.delete_admin(&ed, "some-admin")
    });
    assert_denied(&manager, ErrorCode::SuperuserRequired, |m| {
        m.update_settings(
            &ed,
            SettingsUpdate {
                owner_name: Some("Editor".into()),
                ..Default::default()
            },
        )
    });
}

#[test]
fn test_reads_are_open_to_viewers() {
    let manager = create_test_manager();
    seed_residents(&manager, &["Ann"]);
    assert_eq!(manager.list_residents().len(), 1);
    assert_eq!(manager.dashboard().current_duty.name, "Ann");
    assert_eq!(
        manager.query_ledger(&LedgerQuery::default()).total,
        1
    );
}

#[test]
fn test_editor_may_manage_ledger() {
    let manager = create_test_manager();
    seed_residents(&manager, &["Ann", "Bob"]);
    let removed = manager.delete_ledger_entries(&editor(), &[1]).unwrap();
    assert_eq!(removed, 1);
}
