use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use taskward_core::UserId;
use taskward_domain::OrganizationId;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Connects to `DATABASE_URL` and applies migrations; `None` skips the calling test.
pub(crate) async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for postgres tests: {error}");
    }

    Some(pool)
}

pub(crate) async fn insert_user(pool: &PgPool, display_name: &str) -> UserId {
    let user_id = UserId::new();
    let insert = sqlx::query(
        r#"
        INSERT INTO users (id, display_name)
        VALUES ($1, $2)
        "#,
    )
    .bind(user_id.as_uuid())
    .bind(display_name)
    .execute(pool)
    .await;

    assert!(insert.is_ok());
    user_id
}

pub(crate) async fn insert_organization(
    pool: &PgPool,
    name: &str,
    parent_id: Option<OrganizationId>,
) -> OrganizationId {
    let organization_id = OrganizationId::new();
    let insert = sqlx::query(
        r#"
        INSERT INTO organizations (id, name, parent_id)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(organization_id.as_uuid())
    .bind(name)
    .bind(parent_id.map(|parent_id| parent_id.as_uuid()))
    .execute(pool)
    .await;

    assert!(insert.is_ok());
    organization_id
}
