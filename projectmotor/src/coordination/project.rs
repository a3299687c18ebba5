//! Owner-scoped project operations and the sharing model.

use super::errors::CoordinationError;
use crate::context::AppContext;
use crate::project::{Project, ProjectStore, ShareOutcome};
use crate::userdb::{User, UserSearchField, UserStore, normalize_email};

/// Empty descriptions are stored as NULL
pub(super) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub async fn list_projects_core(
    ctx: &AppContext,
    user_id: i64,
) -> Result<Vec<Project>, CoordinationError> {
    Ok(ProjectStore::list_projects(ctx.store(), user_id).await?)
}

/// A project owned by `user_id`. Someone else's project is reported as not found.
pub async fn get_project_core(
    ctx: &AppContext,
    user_id: i64,
    project_id: i64,
) -> Result<Project, CoordinationError> {
    ProjectStore::get_project(ctx.store(), project_id, user_id)
        .await?
        .ok_or_else(|| CoordinationError::not_found("project", project_id))
}

pub async fn create_project_core(
    ctx: &AppContext,
    user_id: i64,
    title: &str,
    description: Option<&str>,
) -> Result<Project, CoordinationError> {
    Ok(ProjectStore::create_project(ctx.store(), user_id, title.trim(), non_empty(description)).await?)
}

pub async fn update_project_core(
    ctx: &AppContext,
    user_id: i64,
    project_id: i64,
    title: &str,
    description: Option<&str>,
) -> Result<Project, CoordinationError> {
    ProjectStore::update_project(
        ctx.store(),
        project_id,
        user_id,
        title.trim(),
        non_empty(description),
    )
    .await?
    .ok_or_else(|| CoordinationError::not_found("project", project_id))
}

pub async fn toggle_published_core(
    ctx: &AppContext,
    user_id: i64,
    project_id: i64,
) -> Result<Project, CoordinationError> {
    ProjectStore::toggle_published(ctx.store(), project_id, user_id)
        .await?
        .ok_or_else(|| CoordinationError::not_found("project", project_id))
}

/// Delete a project together with its tasks and share rows.
pub async fn delete_project_core(
    ctx: &AppContext,
    user_id: i64,
    project_id: i64,
) -> Result<(), CoordinationError> {
    match ProjectStore::delete_project(ctx.store(), project_id, user_id).await? {
        0 => Err(CoordinationError::not_found("project", project_id)),
        _ => Ok(()),
    }
}

/// Share a project of `owner_id` with the user registered under `email`.
///
/// A repeated share is not an error: it comes back as
/// [`ShareOutcome::AlreadyExists`]. The resolved target user is returned
/// alongside the outcome so callers can render it.
#[tracing::instrument(skip(ctx, email), fields(owner_id = %owner_id, project_id = %project_id))]
pub async fn share_project_core(
    ctx: &AppContext,
    owner_id: i64,
    project_id: i64,
    email: &str,
) -> Result<(ShareOutcome, User), CoordinationError> {
    let store = ctx.store();
    let project = get_project_core(ctx, owner_id, project_id).await?;

    let target = UserStore::get_user_by(store, UserSearchField::Email(normalize_email(email)))
        .await?
        .ok_or_else(|| CoordinationError::UserNotFound.log())?;

    if target.id == project.owner_id {
        return Err(CoordinationError::SelfShare.log());
    }

    let outcome = ProjectStore::share_project(store, project.id, target.id).await;
    Ok((outcome, target))
}

/// Remove `user_id`'s share of a project owned by `owner_id`.
///
/// Revoking a share that does not exist succeeds.
#[tracing::instrument(skip(ctx), fields(owner_id = %owner_id, project_id = %project_id))]
pub async fn revoke_share_core(
    ctx: &AppContext,
    owner_id: i64,
    project_id: i64,
    user_id: i64,
) -> Result<(), CoordinationError> {
    let project = get_project_core(ctx, owner_id, project_id).await?;
    let removed = ProjectStore::revoke_share(ctx.store(), project.id, owner_id, user_id).await?;
    tracing::info!(removed, target_user_id = user_id, "Share revoked");
    Ok(())
}

/// Users the project is shared with. Only the owner can see them.
pub async fn list_shared_users_core(
    ctx: &AppContext,
    owner_id: i64,
    project_id: i64,
) -> Result<Vec<User>, CoordinationError> {
    let project = get_project_core(ctx, owner_id, project_id).await?;
    Ok(UserStore::list_shared_users(ctx.store(), project.id).await?)
}
