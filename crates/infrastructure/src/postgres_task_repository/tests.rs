use chrono::{Duration, Utc};
use taskward_application::{
    SortDirection, TaskPosition, TaskQuery, TaskRepository, TaskSortField,
};
use taskward_core::UserId;
use taskward_domain::{OrganizationId, Task, TaskId, TaskStatus};

use super::{PostgresTaskRepository, escape_like};
use crate::postgres_test_support::{insert_organization, insert_user, test_pool};

fn task(
    organization_id: OrganizationId,
    owner_user_id: UserId,
    title: &str,
    category: &str,
    order_index: i32,
) -> Task {
    let created_at = Utc::now() - Duration::minutes(i64::from(order_index));
    Task {
        id: TaskId::new(),
        organization_id,
        owner_user_id,
        title: title.to_owned(),
        description: String::new(),
        category: category.to_owned(),
        status: TaskStatus::Todo,
        order_index,
        created_at,
        updated_at: created_at,
    }
}

fn query(organization_ids: Vec<OrganizationId>) -> TaskQuery {
    TaskQuery {
        organization_ids,
        status: None,
        categories: Vec::new(),
        search: None,
        sort_field: TaskSortField::Title,
        sort_direction: SortDirection::Ascending,
        limit: 10,
        offset: 0,
    }
}

#[test]
fn like_wildcards_are_escaped() {
    assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
}

#[tokio::test]
async fn filters_search_and_paging_apply_together() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresTaskRepository::new(pool.clone());
    let owner = insert_user(&pool, "Planner").await;
    let organization_id = insert_organization(&pool, "Planning", None).await;
    let other = insert_organization(&pool, "Other", None).await;
    for value in [
        task(organization_id, owner, "Quarterly budget", "Work", 0),
        task(organization_id, owner, "Budget review", "Work", 1),
        task(organization_id, owner, "Groceries", "Personal", 2),
        task(other, owner, "Budget elsewhere", "Work", 0),
    ] {
        assert!(repository.create_task(value).await.is_ok());
    }

    let listing = repository
        .list_tasks(TaskQuery {
            categories: vec!["Work".to_owned()],
            search: Some("budget".to_owned()),
            limit: 1,
            ..query(vec![organization_id])
        })
        .await
        .unwrap_or_default();

    assert_eq!(listing.total, 2);
    assert_eq!(listing.tasks.len(), 1);
    assert_eq!(listing.tasks[0].title, "Quarterly budget");

    let categories = repository
        .list_categories(&[organization_id])
        .await
        .unwrap_or_default();
    assert_eq!(categories, vec!["Personal".to_owned(), "Work".to_owned()]);

    let counts = repository
        .count_by_status(&[organization_id, other])
        .await
        .unwrap_or_default();
    assert_eq!(counts.todo, 4);
    assert_eq!(counts.total(), 4);
}

#[tokio::test]
async fn saved_positions_move_tasks_between_columns() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresTaskRepository::new(pool.clone());
    let owner = insert_user(&pool, "Mover").await;
    let organization_id = insert_organization(&pool, "Board", None).await;
    let first = task(organization_id, owner, "First", "Work", 0);
    let second = task(organization_id, owner, "Second", "Work", 1);
    let moved_id = first.id;
    let kept_id = second.id;
    for value in [first, second] {
        assert!(repository.create_task(value).await.is_ok());
    }

    let saved = repository
        .save_task_positions(vec![
            TaskPosition {
                task_id: moved_id,
                status: TaskStatus::Done,
                order_index: 0,
            },
            TaskPosition {
                task_id: kept_id,
                status: TaskStatus::Todo,
                order_index: 0,
            },
        ])
        .await;
    assert!(saved.is_ok());

    let done = repository
        .list_tasks_in_status(organization_id, TaskStatus::Done)
        .await
        .unwrap_or_default();
    assert_eq!(done.len(), 1);
    assert_eq!(done[0].id, moved_id);

    let todo = repository
        .list_tasks_in_status(organization_id, TaskStatus::Todo)
        .await
        .unwrap_or_default();
    assert_eq!(todo.len(), 1);
    assert_eq!(todo[0].order_index, 0);
}

#[tokio::test]
async fn deleted_task_is_gone() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresTaskRepository::new(pool.clone());
    let owner = insert_user(&pool, "Cleaner").await;
    let organization_id = insert_organization(&pool, "Tidy", None).await;
    let value = task(organization_id, owner, "Temporary", "Work", 0);
    let task_id = value.id;
    assert!(repository.create_task(value).await.is_ok());

    assert!(repository.delete_task(task_id).await.is_ok());
    assert!(repository.find_task(task_id).await.unwrap_or_default().is_none());
}
