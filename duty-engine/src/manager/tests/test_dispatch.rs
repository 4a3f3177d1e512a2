use super::*;

fn manager_with(channel: Arc<dyn DeliveryChannel>) -> DutyManager {
    let dispatcher = Dispatcher::log_only(test_policy()).with_channel(channel);
    DutyManager::in_memory(dispatcher).unwrap()
}

#[tokio::test]
async fn test_reminder_renders_template_for_current_resident() {
    let recorder = Arc::new(RecordingChannel::default());
    let manager = manager_with(recorder.clone());
    let ids = seed_residents(&manager, &["Jane Doe", "Bob Stone"]);
    manager
        .update_settings(
            &superuser(),
            SettingsUpdate {
                reminder_template: Some("Bins tonight, {first_name} ({flat_number})".into()),
                ..Default::default()
            },
        )
        .unwrap();
    manager.set_current_turn(&editor(), &ids[0]).unwrap();

    let report = manager.send_reminder(&editor(), None).await.unwrap();
    assert_eq!(report.status, DispatchStatus::Completed);
    assert_eq!(report.deliveries.len(), 1);
    assert_eq!(report.deliveries[0].content, "Bins tonight, Jane (1A)");

    let sent = recorder.sent.lock();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].address, "jane@example.com");
    drop(sent);

    let entry = manager.dashboard().last_activity.unwrap();
    assert_eq!(entry.action, LedgerAction::ReminderSent);
    assert!(entry.message.contains("Jane Doe"));
    assert!(entry.message.contains("Bins tonight, Jane (1A)"));
    assert_eq!(entry.details.unwrap(), report);
    assert_ne!(manager.dashboard().last_reminder_run, "N/A");
}

#[tokio::test]
async fn test_reminder_custom_message_is_literal() {
    let recorder = Arc::new(RecordingChannel::default());
    let manager = manager_with(recorder.clone());
    seed_residents(&manager, &["Jane Doe"]);

    let report = manager
        .send_reminder(&editor(), Some("Bins are late this week, {first_name}".into()))
        .await
        .unwrap();
    assert_eq!(
        report.deliveries[0].content,
        "Bins are late this week, {first_name}"
    );
    assert_eq!(recorder.sent.lock()[0].body, "Bins are late this week, {first_name}");
}

#[tokio::test]
async fn test_reminder_does_not_advance_rotation() {
    let manager = create_test_manager();
    let ids = seed_residents(&manager, &["Ann", "Bob"]);
    manager.send_reminder(&editor(), None).await.unwrap();
    assert_eq!(manager.current_duty().unwrap().id, ids[0]);
}

#[tokio::test]
async fn test_reminder_on_empty_registry() {
    let manager = create_test_manager();
    let err = manager.send_reminder(&editor(), None).await.unwrap_err();
    assert!(matches!(err, EngineError::EmptyRegistry));
    assert!(manager.list_ledger(LedgerOrder::Chronological).is_empty());
}

#[tokio::test]
async fn test_announcement_with_one_failing_channel_is_partial() {
    let failing = Arc::new(FailForAddress::new(ContactMethod::Email, "bob@example.com"));
    let manager = manager_with(failing.clone());
    seed_residents(&manager, &["Ann Lee", "Bob Stone", "Cid Park"]);
    let logs_before = manager.list_ledger(LedgerOrder::Chronological).len();

    let report = manager
        .send_announcement(&editor(), "Water outage", "water is off on Friday")
        .await
        .unwrap();

    assert_eq!(report.status, DispatchStatus::Partial);
    assert_eq!(report.subject.as_deref(), Some("Water outage"));
    assert_eq!(report.deliveries.len(), 3);
    let failed: Vec<&str> = report
        .deliveries
        .iter()
        .filter(|d| d.status == DeliveryStatus::Failed)
        .map(|d| d.recipient.as_str())
        .collect();
    assert_eq!(failed, vec!["Bob Stone"]);
    // 两次尝试后放弃
    assert_eq!(failing.calls.load(Ordering::SeqCst), 2 + 1 + 1);

    // 整个广播只记一条日志，明细保留逐收件人结果
    let log = manager.list_ledger(LedgerOrder::Chronological);
    assert_eq!(log.len(), logs_before + 1);
    let entry = log.last().unwrap();
    assert_eq!(entry.action, LedgerAction::AnnouncementSent);
    let details = entry.details.as_ref().unwrap();
    assert_eq!(details.status, DispatchStatus::Partial);
    assert_eq!(details.failed_count(), 1);
    assert_eq!(details.deliveries[0].content, "Hi Ann, water is off on Friday");
}

#[tokio::test]
async fn test_announcement_all_channels_succeed() {
    let manager = create_test_manager();
    seed_residents(&manager, &["Ann", "Bob"]);
    let report = manager
        .send_announcement(&editor(), "", "hello all")
        .await
        .unwrap();
    assert_eq!(report.status, DispatchStatus::Completed);
    assert!(report.subject.is_none());
}

#[tokio::test]
async fn test_announcement_without_residents_is_failed_but_logged() {
    let manager = create_test_manager();
    let report = manager
        .send_announcement(&editor(), "Notice", "hello")
        .await
        .unwrap();
    assert_eq!(report.status, DispatchStatus::Failed);
    assert!(report.deliveries.is_empty());
    assert_eq!(manager.list_ledger(LedgerOrder::Chronological).len(), 1);
}

#[tokio::test]
async fn test_announcement_requires_message() {
    let manager = create_test_manager();
    seed_residents(&manager, &["Ann"]);
    let err = manager
        .send_announcement(&editor(), "Notice", "   ")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn test_resident_without_contacts_gets_no_attempts() {
    let manager = create_test_manager();
    manager
        .add_resident(
            &editor(),
            ResidentCreate {
                name: "Quiet Resident".into(),
                ..Default::default()
            },
        )
        .unwrap();
    let report = manager.send_reminder(&editor(), None).await.unwrap();
    assert!(report.deliveries.is_empty());
    assert_eq!(report.status, DispatchStatus::Failed);
}
