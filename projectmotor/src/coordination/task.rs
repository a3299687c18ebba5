use super::errors::CoordinationError;
use super::project::{get_project_core, non_empty};
use crate::context::AppContext;
use crate::project::{Task, TaskStore};

/// Tasks of `user_id`, optionally only those of one of their projects.
pub async fn list_tasks_core(
    ctx: &AppContext,
    user_id: i64,
    project_id: Option<i64>,
) -> Result<Vec<Task>, CoordinationError> {
    if let Some(project_id) = project_id {
        get_project_core(ctx, user_id, project_id).await?;
    }
    Ok(TaskStore::list_tasks(ctx.store(), user_id, project_id).await?)
}

pub async fn get_task_core(
    ctx: &AppContext,
    user_id: i64,
    task_id: i64,
) -> Result<Task, CoordinationError> {
    TaskStore::get_task(ctx.store(), task_id, user_id)
        .await?
        .ok_or_else(|| CoordinationError::not_found("task", task_id))
}

/// Create a task in a project owned by `user_id`.
pub async fn create_task_core(
    ctx: &AppContext,
    user_id: i64,
    project_id: i64,
    title: &str,
    description: Option<&str>,
) -> Result<Task, CoordinationError> {
    let project = get_project_core(ctx, user_id, project_id).await?;
    Ok(TaskStore::create_task(
        ctx.store(),
        user_id,
        project.id,
        title.trim(),
        non_empty(description),
    )
    .await?)
}

pub async fn update_task_core(
    ctx: &AppContext,
    user_id: i64,
    task_id: i64,
    title: &str,
    description: Option<&str>,
) -> Result<Task, CoordinationError> {
    TaskStore::update_task(
        ctx.store(),
        task_id,
        user_id,
        title.trim(),
        non_empty(description),
    )
    .await?
    .ok_or_else(|| CoordinationError::not_found("task", task_id))
}
