use super::*;

fn admin_input(email: &str, role: Role) -> AdminCreate {
    AdminCreate {
        email: email.to_string(),
        role,
        credential: None,
    }
}

#[test]
fn test_superuser_manages_admins() {
    let manager = create_test_manager();
    let ed = manager
        .add_admin(&superuser(), admin_input("ed@example.com", Role::Editor))
        .unwrap();
    assert_eq!(manager.list_admins(&superuser()).unwrap().len(), 1);

    manager
        .update_admin(
            &superuser(),
            &ed.id,
            AdminUpdate {
                role: Some(Role::Viewer),
                ..Default::default()
            },
        )
        .unwrap();
    manager.delete_admin(&superuser(), &ed.id).unwrap();
    assert!(manager.list_admins(&superuser()).unwrap().is_empty());

    let actions: Vec<LedgerAction> = manager
        .list_ledger(LedgerOrder::Chronological)
        .iter()
        .map(|e| e.action)
        .collect();
    assert_eq!(
        actions,
        vec![
            LedgerAction::AdminAdded,
            LedgerAction::AdminUpdated,
            LedgerAction::AdminDeleted
        ]
    );
}

#[test]
fn test_self_modification_is_refused() {
    let manager = create_test_manager();
    let me = manager
        .add_admin(&superuser(), admin_input("me@example.com", Role::Superuser))
        .unwrap();
    let actor = Actor::new(me.id.clone(), me.email.clone(), Role::Superuser);

    let err = manager.delete_admin(&actor, &me.id).unwrap_err();
    assert!(matches!(err, EngineError::SelfModification));
    let app: shared::error::AppError = err.into();
    assert_eq!(app.code, shared::error::ErrorCode::CannotModifySelf);

    assert!(matches!(
        manager.update_admin(
            &actor,
            &me.id,
            AdminUpdate {
                role: Some(Role::Editor),
                ..Default::default()
            }
        ),
        Err(EngineError::SelfModification)
    ));
    assert_eq!(manager.list_admins(&actor).unwrap()[0].role, Role::Superuser);
}

#[test]
fn test_duplicate_email() {
    let manager = create_test_manager();
    manager
        .add_admin(&superuser(), admin_input("ed@example.com", Role::Editor))
        .unwrap();
    assert!(matches!(
        manager.add_admin(&superuser(), admin_input("Ed@Example.com", Role::Viewer)),
        Err(EngineError::Conflict { .. })
    ));
}

#[test]
fn test_bootstrap_admin_once() {
    let manager = create_test_manager();
    let seeded = manager.bootstrap_admin("owner@example.com").unwrap();
    assert_eq!(seeded.unwrap().role, Role::Superuser);
    assert!(manager.bootstrap_admin("owner@example.com").unwrap().is_none());
    assert_eq!(manager.list_admins(&superuser()).unwrap().len(), 1);
}

#[test]
fn test_bootstrap_rejects_invalid_email() {
    let manager = create_test_manager();
    assert!(matches!(
        manager.bootstrap_admin("not-an-email"),
        Err(EngineError::Validation(_))
    ));
    assert!(manager.list_admins(&superuser()).unwrap().is_empty());
}

#[test]
fn test_settings_round_trip_through_manager() {
    let manager = create_test_manager();
    manager
        .update_settings(
            &superuser(),
            SettingsUpdate {
                owner_name: Some("Mrs Hughes".into()),
                report_issue_link: Some("https://example.com/report".into()),
                ..Default::default()
            },
        )
        .unwrap();
    let settings = manager.get_settings();
    assert_eq!(settings.owner_name, "Mrs Hughes");
    assert_eq!(settings.report_issue_link, "https://example.com/report");
}
