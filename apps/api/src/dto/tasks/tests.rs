use taskward_application::{
    ReorderTaskInput, SortDirection, TaskFilter, TaskSortField, UpdateTaskInput,
};
use taskward_core::AppError;
use taskward_domain::{OrganizationId, TaskStatus};

use super::{ReorderTaskRequest, TaskListQuery, UpdateTaskRequest};

#[test]
fn empty_query_uses_listing_defaults() {
    let filter = TaskFilter::try_from(TaskListQuery::default());
    assert!(filter.is_ok_and(|filter| {
        filter.organization_ids.is_empty()
            && filter.categories.is_empty()
            && filter.limit.is_none()
            && filter.offset == 0
            && filter.sort_field == TaskSortField::CreatedAt
            && filter.sort_direction == SortDirection::Descending
    }));
}

#[test]
fn comma_lists_and_single_category_are_merged() {
    let first = OrganizationId::new();
    let second = OrganizationId::new();
    let filter = TaskFilter::try_from(TaskListQuery {
        organization_ids: Some(format!("{first}, {second},")),
        categories: Some("Work, Personal".to_owned()),
        category: Some("Errands".to_owned()),
        status: Some("IN_PROGRESS".to_owned()),
        sort_by: Some("title".to_owned()),
        sort_order: Some("asc".to_owned()),
        ..TaskListQuery::default()
    })
    .unwrap_or_default();

    assert_eq!(filter.organization_ids, vec![first, second]);
    assert_eq!(filter.categories, vec!["Work", "Personal", "Errands"]);
    assert_eq!(filter.status, Some(TaskStatus::InProgress));
    assert_eq!(filter.sort_field, TaskSortField::Title);
    assert_eq!(filter.sort_direction, SortDirection::Ascending);
}

#[test]
fn unknown_sort_field_falls_back_but_bad_order_is_rejected() {
    let lenient = TaskFilter::try_from(TaskListQuery {
        sort_by: Some("password_hash".to_owned()),
        ..TaskListQuery::default()
    });
    assert!(lenient.is_ok_and(|filter| filter.sort_field == TaskSortField::CreatedAt));

    let strict = TaskFilter::try_from(TaskListQuery {
        sort_order: Some("sideways".to_owned()),
        ..TaskListQuery::default()
    });
    assert!(matches!(strict, Err(AppError::Validation(_))));
}

#[test]
fn malformed_identifiers_are_validation_errors() {
    let filter = TaskFilter::try_from(TaskListQuery {
        organization_id: Some("not-a-uuid".to_owned()),
        ..TaskListQuery::default()
    });
    assert!(matches!(filter, Err(AppError::Validation(_))));

    let update = UpdateTaskInput::try_from(UpdateTaskRequest {
        status: Some("BLOCKED".to_owned()),
        ..UpdateTaskRequest::default()
    });
    assert!(matches!(update, Err(AppError::Validation(_))));
}

#[test]
fn reorder_request_parses_status() {
    let input = ReorderTaskInput::try_from(ReorderTaskRequest {
        status: "DONE".to_owned(),
        order_index: 2,
    });
    assert!(input.is_ok_and(|input| input.status == TaskStatus::Done && input.order_index == 2));
}
