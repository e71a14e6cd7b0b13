mod conversions;
mod types;

pub use types::{
    CreateTaskRequest, ReorderTaskRequest, TaskColumnResponse, TaskListQuery, TaskPageResponse,
    TaskResponse, TaskStatsResponse, UpdateTaskRequest,
};

#[cfg(test)]
mod tests;
