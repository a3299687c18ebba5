use crate::project::{
    errors::ProjectError,
    types::{Project, ShareOutcome, Task},
};
use crate::storage::DataStore;

use super::postgres::*;
use super::sqlite::*;

/// Owner-scoped access to projects and their share rows.
///
/// Every query takes the acting user's id and filters on `owner_id`, so a
/// project owned by someone else behaves exactly like a missing one.
pub(crate) struct ProjectStore;

impl ProjectStore {
    pub(crate) async fn init(store: &dyn DataStore) -> Result<(), ProjectError> {
        match (store.as_sqlite(), store.as_postgres()) {
            (Some(pool), _) => create_project_tables_sqlite(pool).await,
            (_, Some(pool)) => create_project_tables_postgres(pool).await,
            _ => Err(ProjectError::Storage(
                "Unsupported database type".to_string(),
            )),
        }
    }

    #[tracing::instrument(skip(store, description), fields(owner_id = %owner_id))]
    pub(crate) async fn create_project(
        store: &dyn DataStore,
        owner_id: i64,
        title: &str,
        description: Option<&str>,
    ) -> Result<Project, ProjectError> {
        let result = if let Some(pool) = store.as_sqlite() {
            create_project_sqlite(pool, owner_id, title, description).await
        } else if let Some(pool) = store.as_postgres() {
            create_project_postgres(pool, owner_id, title, description).await
        } else {
            Err(ProjectError::Storage(
                "Unsupported database type".to_string(),
            ))
        };

        match &result {
            Ok(project) => tracing::info!(project_id = project.id, "Project created"),
            Err(e) => tracing::error!(error = %e, "Project creation failed"),
        }
        result
    }

    #[tracing::instrument(skip(store), fields(project_id = %id, owner_id = %owner_id))]
    pub(crate) async fn get_project(
        store: &dyn DataStore,
        id: i64,
        owner_id: i64,
    ) -> Result<Option<Project>, ProjectError> {
        let result = if let Some(pool) = store.as_sqlite() {
            get_project_sqlite(pool, id, owner_id).await
        } else if let Some(pool) = store.as_postgres() {
            get_project_postgres(pool, id, owner_id).await
        } else {
            Err(ProjectError::Storage(
                "Unsupported database type".to_string(),
            ))
        };

        if let Ok(found) = &result {
            tracing::debug!(found = found.is_some(), "Project lookup completed");
        }
        result
    }

    /// Projects of `owner_id`, newest first
    #[tracing::instrument(skip(store), fields(owner_id = %owner_id))]
    pub(crate) async fn list_projects(
        store: &dyn DataStore,
        owner_id: i64,
    ) -> Result<Vec<Project>, ProjectError> {
        if let Some(pool) = store.as_sqlite() {
            list_projects_sqlite(pool, owner_id).await
        } else if let Some(pool) = store.as_postgres() {
            list_projects_postgres(pool, owner_id).await
        } else {
            Err(ProjectError::Storage(
                "Unsupported database type".to_string(),
            ))
        }
    }

    #[tracing::instrument(skip(store, description), fields(project_id = %id, owner_id = %owner_id))]
    pub(crate) async fn update_project(
        store: &dyn DataStore,
        id: i64,
        owner_id: i64,
        title: &str,
        description: Option<&str>,
    ) -> Result<Option<Project>, ProjectError> {
        if let Some(pool) = store.as_sqlite() {
            update_project_sqlite(pool, id, owner_id, title, description).await
        } else if let Some(pool) = store.as_postgres() {
            update_project_postgres(pool, id, owner_id, title, description).await
        } else {
            Err(ProjectError::Storage(
                "Unsupported database type".to_string(),
            ))
        }
    }

    #[tracing::instrument(skip(store), fields(project_id = %id, owner_id = %owner_id))]
    pub(crate) async fn toggle_published(
        store: &dyn DataStore,
        id: i64,
        owner_id: i64,
    ) -> Result<Option<Project>, ProjectError> {
        if let Some(pool) = store.as_sqlite() {
            toggle_published_sqlite(pool, id, owner_id).await
        } else if let Some(pool) = store.as_postgres() {
            toggle_published_postgres(pool, id, owner_id).await
        } else {
            Err(ProjectError::Storage(
                "Unsupported database type".to_string(),
            ))
        }
    }

    #[tracing::instrument(skip(store), fields(project_id = %id, owner_id = %owner_id))]
    pub(crate) async fn delete_project(
        store: &dyn DataStore,
        id: i64,
        owner_id: i64,
    ) -> Result<u64, ProjectError> {
        if let Some(pool) = store.as_sqlite() {
            delete_project_sqlite(pool, id, owner_id).await
        } else if let Some(pool) = store.as_postgres() {
            delete_project_postgres(pool, id, owner_id).await
        } else {
            Err(ProjectError::Storage(
                "Unsupported database type".to_string(),
            ))
        }
    }

    /// Insert a share row. Ownership must already have been checked.
    #[tracing::instrument(skip(store), fields(project_id = %project_id, user_id = %user_id))]
    pub(crate) async fn share_project(
        store: &dyn DataStore,
        project_id: i64,
        user_id: i64,
    ) -> ShareOutcome {
        let outcome = if let Some(pool) = store.as_sqlite() {
            share_project_sqlite(pool, project_id, user_id).await
        } else if let Some(pool) = store.as_postgres() {
            share_project_postgres(pool, project_id, user_id).await
        } else {
            ShareOutcome::Failed(ProjectError::Storage(
                "Unsupported database type".to_string(),
            ))
        };

        match &outcome {
            ShareOutcome::Created => tracing::info!("Project shared"),
            ShareOutcome::AlreadyExists => tracing::info!("Project already shared"),
            ShareOutcome::Failed(e) => tracing::error!(error = %e, "Project share failed"),
        }
        outcome
    }

    /// Delete a share row of a project owned by `owner_id`; absent rows are not an error
    #[tracing::instrument(skip(store), fields(project_id = %project_id, user_id = %user_id))]
    pub(crate) async fn revoke_share(
        store: &dyn DataStore,
        project_id: i64,
        owner_id: i64,
        user_id: i64,
    ) -> Result<u64, ProjectError> {
        if let Some(pool) = store.as_sqlite() {
            revoke_share_sqlite(pool, project_id, owner_id, user_id).await
        } else if let Some(pool) = store.as_postgres() {
            revoke_share_postgres(pool, project_id, owner_id, user_id).await
        } else {
            Err(ProjectError::Storage(
                "Unsupported database type".to_string(),
            ))
        }
    }
}

/// Owner-scoped access to tasks
pub(crate) struct TaskStore;

impl TaskStore {
    pub(crate) async fn init(store: &dyn DataStore) -> Result<(), ProjectError> {
        match (store.as_sqlite(), store.as_postgres()) {
            (Some(pool), _) => create_task_tables_sqlite(pool).await,
            (_, Some(pool)) => create_task_tables_postgres(pool).await,
            _ => Err(ProjectError::Storage(
                "Unsupported database type".to_string(),
            )),
        }
    }

    #[tracing::instrument(skip(store, description), fields(owner_id = %owner_id, project_id = %project_id))]
    pub(crate) async fn create_task(
        store: &dyn DataStore,
        owner_id: i64,
        project_id: i64,
        title: &str,
        description: Option<&str>,
    ) -> Result<Task, ProjectError> {
        let result = if let Some(pool) = store.as_sqlite() {
            create_task_sqlite(pool, owner_id, project_id, title, description).await
        } else if let Some(pool) = store.as_postgres() {
            create_task_postgres(pool, owner_id, project_id, title, description).await
        } else {
            Err(ProjectError::Storage(
                "Unsupported database type".to_string(),
            ))
        };

        match &result {
            Ok(task) => tracing::info!(task_id = task.id, "Task created"),
            Err(e) => tracing::error!(error = %e, "Task creation failed"),
        }
        result
    }

    #[tracing::instrument(skip(store), fields(task_id = %id, owner_id = %owner_id))]
    pub(crate) async fn get_task(
        store: &dyn DataStore,
        id: i64,
        owner_id: i64,
    ) -> Result<Option<Task>, ProjectError> {
        if let Some(pool) = store.as_sqlite() {
            get_task_sqlite(pool, id, owner_id).await
        } else if let Some(pool) = store.as_postgres() {
            get_task_postgres(pool, id, owner_id).await
        } else {
            Err(ProjectError::Storage(
                "Unsupported database type".to_string(),
            ))
        }
    }

    /// Tasks of `owner_id`, optionally narrowed to one project
    #[tracing::instrument(skip(store), fields(owner_id = %owner_id))]
    pub(crate) async fn list_tasks(
        store: &dyn DataStore,
        owner_id: i64,
        project_id: Option<i64>,
    ) -> Result<Vec<Task>, ProjectError> {
        if let Some(pool) = store.as_sqlite() {
            list_tasks_sqlite(pool, owner_id, project_id).await
        } else if let Some(pool) = store.as_postgres() {
            list_tasks_postgres(pool, owner_id, project_id).await
        } else {
            Err(ProjectError::Storage(
                "Unsupported database type".to_string(),
            ))
        }
    }

    #[tracing::instrument(skip(store, description), fields(task_id = %id, owner_id = %owner_id))]
    pub(crate) async fn update_task(
        store: &dyn DataStore,
        id: i64,
        owner_id: i64,
        title: &str,
        description: Option<&str>,
    ) -> Result<Option<Task>, ProjectError> {
        if let Some(pool) = store.as_sqlite() {
            update_task_sqlite(pool, id, owner_id, title, description).await
        } else if let Some(pool) = store.as_postgres() {
            update_task_postgres(pool, id, owner_id, title, description).await
        } else {
            Err(ProjectError::Storage(
                "Unsupported database type".to_string(),
            ))
        }
    }
}
