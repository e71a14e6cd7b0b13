use taskward_application::{AuditEvent, AuditLogQuery, AuditLogRepository, AuditRepository};
use taskward_domain::AuditAction;

use super::PostgresAuditLogRepository;
use crate::PostgresAuditRepository;
use crate::postgres_test_support::{insert_organization, insert_user, test_pool};

#[tokio::test]
async fn entries_are_scoped_and_newest_first() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let writer = PostgresAuditRepository::new(pool.clone());
    let reader = PostgresAuditLogRepository::new(pool.clone());
    let user_id = insert_user(&pool, "Auditor").await;
    let visible = insert_organization(&pool, "Audited", None).await;
    let hidden = insert_organization(&pool, "Elsewhere", None).await;

    for (organization_id, resource_id) in [(visible, "first"), (hidden, "hidden"), (visible, "second")] {
        let appended = writer
            .append_event(AuditEvent {
                user_id,
                organization_id,
                action: AuditAction::TaskCreated,
                resource_type: "task".to_owned(),
                resource_id: resource_id.to_owned(),
                detail: None,
            })
            .await;
        assert!(appended.is_ok());
    }

    let listing = reader
        .list_entries(AuditLogQuery {
            organization_ids: vec![visible],
            limit: 10,
            offset: 0,
        })
        .await
        .unwrap_or_default();

    assert_eq!(listing.total, 2);
    assert_eq!(listing.entries.len(), 2);
    assert!(
        listing
            .entries
            .iter()
            .all(|entry| entry.organization_id == visible && entry.action == "task.created")
    );
    assert_eq!(listing.entries[0].resource_id, "second");
}

#[tokio::test]
async fn offset_past_end_still_reports_total() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let writer = PostgresAuditRepository::new(pool.clone());
    let reader = PostgresAuditLogRepository::new(pool.clone());
    let user_id = insert_user(&pool, "Auditor").await;
    let organization_id = insert_organization(&pool, "Paged", None).await;

    let appended = writer
        .append_event(AuditEvent {
            user_id,
            organization_id,
            action: AuditAction::OrganizationUpdated,
            resource_type: "organization".to_owned(),
            resource_id: organization_id.to_string(),
            detail: Some("renamed".to_owned()),
        })
        .await;
    assert!(appended.is_ok());

    let listing = reader
        .list_entries(AuditLogQuery {
            organization_ids: vec![organization_id],
            limit: 5,
            offset: 10,
        })
        .await
        .unwrap_or_default();

    assert!(listing.entries.is_empty());
    assert_eq!(listing.total, 1);
}
