use std::sync::Arc;

use taskward_core::{AppError, UserId, UserIdentity};
use taskward_domain::{AuditAction, GrantId, OrganizationId, Role};

use crate::AuthorizationService;
use crate::test_support::FakeStore;

use super::{CreateGrantInput, PermissionService};

struct Fixture {
    store: Arc<FakeStore>,
    service: PermissionService,
    root: OrganizationId,
    department: OrganizationId,
    owner: UserIdentity,
}

async fn fixture() -> Fixture {
    let store = Arc::new(FakeStore::default());
    let root = store.add_organization("Acme", None).await;
    let department = store.add_organization("Engineering", Some(root)).await;
    let owner = store.add_user("owner").await;
    store.grant(&owner, root, Role::Owner).await;
    let authorization = AuthorizationService::new(store.clone(), store.clone());
    let service = PermissionService::new(
        authorization,
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
    );
    Fixture {
        store,
        service,
        root,
        department,
        owner,
    }
}

#[tokio::test]
async fn owner_grants_role_in_department() {
    let fixture = fixture().await;
    let newcomer = fixture.store.add_user("newcomer").await;

    let grant = fixture
        .service
        .create_grant(
            &fixture.owner,
            CreateGrantInput {
                user_id: newcomer.user_id(),
                organization_id: fixture.department,
                role: Role::Viewer,
            },
        )
        .await;
    assert!(matches!(grant, Ok(grant) if grant.role == Role::Viewer));
    assert_eq!(
        fixture.store.events().await.first().map(|event| event.action),
        Some(AuditAction::PermissionGranted)
    );
}

#[tokio::test]
async fn duplicate_grant_conflicts() {
    let fixture = fixture().await;
    let newcomer = fixture.store.add_user("newcomer").await;
    fixture
        .store
        .grant(&newcomer, fixture.root, Role::Viewer)
        .await;

    let result = fixture
        .service
        .create_grant(
            &fixture.owner,
            CreateGrantInput {
                user_id: newcomer.user_id(),
                organization_id: fixture.root,
                role: Role::Admin,
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn admin_cannot_grant_but_can_list() {
    let fixture = fixture().await;
    let admin = fixture.store.add_user("admin").await;
    fixture.store.grant(&admin, fixture.root, Role::Admin).await;
    let newcomer = fixture.store.add_user("newcomer").await;

    let denied = fixture
        .service
        .create_grant(
            &admin,
            CreateGrantInput {
                user_id: newcomer.user_id(),
                organization_id: fixture.root,
                role: Role::Viewer,
            },
        )
        .await;
    assert!(matches!(denied, Err(AppError::Forbidden(_))));

    let listed = fixture
        .service
        .list_grants(&admin)
        .await
        .unwrap_or_default();
    assert_eq!(listed.len(), 2);
}

#[tokio::test]
async fn viewer_sees_no_grants() {
    let fixture = fixture().await;
    let viewer = fixture.store.add_user("viewer").await;
    fixture.store.grant(&viewer, fixture.root, Role::Viewer).await;

    let listed = fixture.service.list_grants(&viewer).await;
    assert!(matches!(listed, Ok(grants) if grants.is_empty()));

    let owner_grant = fixture
        .store
        .grants()
        .await
        .into_iter()
        .find(|grant| grant.user_id == fixture.owner.user_id())
        .map(|grant| grant.grant_id)
        .unwrap_or_default();
    let hidden = fixture.service.get_grant(&viewer, owner_grant).await;
    assert!(matches!(hidden, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn unknown_user_or_grant_is_not_found() {
    let fixture = fixture().await;
    let ghost = UserIdentity::new(UserId::new(), "ghost", None);

    let unknown_user = fixture
        .service
        .create_grant(
            &fixture.owner,
            CreateGrantInput {
                user_id: ghost.user_id(),
                organization_id: fixture.root,
                role: Role::Viewer,
            },
        )
        .await;
    assert!(matches!(unknown_user, Err(AppError::NotFound(_))));

    let unknown_grant = fixture
        .service
        .revoke_grant(&fixture.owner, GrantId::new())
        .await;
    assert!(matches!(unknown_grant, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn owner_updates_and_revokes() {
    let fixture = fixture().await;
    let member = fixture.store.add_user("member").await;
    fixture
        .store
        .grant(&member, fixture.department, Role::Viewer)
        .await;
    let grant_id = fixture
        .store
        .grants()
        .await
        .into_iter()
        .find(|grant| grant.user_id == member.user_id())
        .map(|grant| grant.grant_id)
        .unwrap_or_default();

    let updated = fixture
        .service
        .update_grant_role(&fixture.owner, grant_id, Role::Admin)
        .await;
    assert!(matches!(updated, Ok(grant) if grant.role == Role::Admin));

    let revoked = fixture.service.revoke_grant(&fixture.owner, grant_id).await;
    assert!(revoked.is_ok());
    assert!(
        !fixture
            .store
            .grants()
            .await
            .iter()
            .any(|grant| grant.grant_id == grant_id)
    );
}

#[tokio::test]
async fn outsiders_cannot_tell_grants_exist() {
    let fixture = fixture().await;
    let stranger = fixture.store.add_user("stranger").await;
    let owner_grant = fixture
        .store
        .grants()
        .await
        .into_iter()
        .find(|grant| grant.user_id == fixture.owner.user_id())
        .map(|grant| grant.grant_id)
        .unwrap_or_default();

    let revoked = fixture.service.revoke_grant(&stranger, owner_grant).await;
    assert!(matches!(revoked, Err(AppError::NotFound(_))));

    let updated = fixture
        .service
        .update_grant_role(&stranger, owner_grant, Role::Viewer)
        .await;
    assert!(matches!(updated, Err(AppError::NotFound(_))));

    let granted = fixture
        .service
        .create_grant(
            &stranger,
            CreateGrantInput {
                user_id: stranger.user_id(),
                organization_id: fixture.root,
                role: Role::Owner,
            },
        )
        .await;
    assert!(matches!(granted, Err(AppError::NotFound(_))));
    assert_eq!(fixture.store.grants().await.len(), 1);
}
