use chrono::Utc;
use sqlx::{Pool, Sqlite};

use crate::project::{
    errors::ProjectError,
    types::{Project, ShareOutcome, Task},
};
use crate::storage::is_unique_violation;

pub(super) async fn create_project_tables_sqlite(pool: &Pool<Sqlite>) -> Result<(), ProjectError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS projects (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            description TEXT,
            published BOOLEAN NOT NULL DEFAULT false,
            owner_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            created_at TIMESTAMP NOT NULL,
            updated_at TIMESTAMP NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS projects_users (
            project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            UNIQUE (project_id, user_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_projects_owner_id ON projects(owner_id)")
        .execute(pool)
        .await?;

    Ok(())
}

pub(super) async fn create_task_tables_sqlite(pool: &Pool<Sqlite>) -> Result<(), ProjectError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tasks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            description TEXT,
            owner_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
            created_at TIMESTAMP NOT NULL,
            updated_at TIMESTAMP NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_tasks_owner_id ON tasks(owner_id)")
        .execute(pool)
        .await?;

    Ok(())
}

pub(super) async fn create_project_sqlite(
    pool: &Pool<Sqlite>,
    owner_id: i64,
    title: &str,
    description: Option<&str>,
) -> Result<Project, ProjectError> {
    let now = Utc::now();
    let project = sqlx::query_as::<_, Project>(
        r#"
        INSERT INTO projects (title, description, published, owner_id, created_at, updated_at)
        VALUES (?, ?, false, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(title)
    .bind(description)
    .bind(owner_id)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;
    Ok(project)
}

pub(super) async fn get_project_sqlite(
    pool: &Pool<Sqlite>,
    id: i64,
    owner_id: i64,
) -> Result<Option<Project>, ProjectError> {
    let project =
        sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = ? AND owner_id = ?")
            .bind(id)
            .bind(owner_id)
            .fetch_optional(pool)
            .await?;
    Ok(project)
}

pub(super) async fn list_projects_sqlite(
    pool: &Pool<Sqlite>,
    owner_id: i64,
) -> Result<Vec<Project>, ProjectError> {
    let projects = sqlx::query_as::<_, Project>(
        "SELECT * FROM projects WHERE owner_id = ? ORDER BY created_at DESC, id DESC",
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await?;
    Ok(projects)
}

pub(super) async fn update_project_sqlite(
    pool: &Pool<Sqlite>,
    id: i64,
    owner_id: i64,
    title: &str,
    description: Option<&str>,
) -> Result<Option<Project>, ProjectError> {
    let project = sqlx::query_as::<_, Project>(
        r#"
        UPDATE projects SET title = ?, description = ?, updated_at = ?
        WHERE id = ? AND owner_id = ?
        RETURNING *
        "#,
    )
    .bind(title)
    .bind(description)
    .bind(Utc::now())
    .bind(id)
    .bind(owner_id)
    .fetch_optional(pool)
    .await?;
    Ok(project)
}

pub(super) async fn toggle_published_sqlite(
    pool: &Pool<Sqlite>,
    id: i64,
    owner_id: i64,
) -> Result<Option<Project>, ProjectError> {
    let project = sqlx::query_as::<_, Project>(
        r#"
        UPDATE projects SET published = NOT published, updated_at = ?
        WHERE id = ? AND owner_id = ?
        RETURNING *
        "#,
    )
    .bind(Utc::now())
    .bind(id)
    .bind(owner_id)
    .fetch_optional(pool)
    .await?;
    Ok(project)
}

pub(super) async fn delete_project_sqlite(
    pool: &Pool<Sqlite>,
    id: i64,
    owner_id: i64,
) -> Result<u64, ProjectError> {
    let result = sqlx::query("DELETE FROM projects WHERE id = ? AND owner_id = ?")
        .bind(id)
        .bind(owner_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub(super) async fn share_project_sqlite(
    pool: &Pool<Sqlite>,
    project_id: i64,
    user_id: i64,
) -> ShareOutcome {
    let result = sqlx::query("INSERT INTO projects_users (project_id, user_id) VALUES (?, ?)")
        .bind(project_id)
        .bind(user_id)
        .execute(pool)
        .await;

    match result {
        Ok(_) => ShareOutcome::Created,
        Err(e) if is_unique_violation(&e) => ShareOutcome::AlreadyExists,
        Err(e) => ShareOutcome::Failed(e.into()),
    }
}

pub(super) async fn revoke_share_sqlite(
    pool: &Pool<Sqlite>,
    project_id: i64,
    owner_id: i64,
    user_id: i64,
) -> Result<u64, ProjectError> {
    let result = sqlx::query(
        r#"
        DELETE FROM projects_users
        WHERE project_id = ? AND user_id = ?
        AND EXISTS (
            SELECT 1 FROM projects
            WHERE projects.id = projects_users.project_id AND projects.owner_id = ?
        )
        "#,
    )
    .bind(project_id)
    .bind(user_id)
    .bind(owner_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

pub(super) async fn create_task_sqlite(
    pool: &Pool<Sqlite>,
    owner_id: i64,
    project_id: i64,
    title: &str,
    description: Option<&str>,
) -> Result<Task, ProjectError> {
    let now = Utc::now();
    let task = sqlx::query_as::<_, Task>(
        r#"
        INSERT INTO tasks (title, description, owner_id, project_id, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(title)
    .bind(description)
    .bind(owner_id)
    .bind(project_id)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;
    Ok(task)
}

pub(super) async fn get_task_sqlite(
    pool: &Pool<Sqlite>,
    id: i64,
    owner_id: i64,
) -> Result<Option<Task>, ProjectError> {
    let task = sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = ? AND owner_id = ?")
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;
    Ok(task)
}

pub(super) async fn list_tasks_sqlite(
    pool: &Pool<Sqlite>,
    owner_id: i64,
    project_id: Option<i64>,
) -> Result<Vec<Task>, ProjectError> {
    let tasks = match project_id {
        Some(project_id) => {
            sqlx::query_as::<_, Task>(
                r#"
                SELECT * FROM tasks WHERE owner_id = ? AND project_id = ?
                ORDER BY created_at DESC, id DESC
                "#,
            )
            .bind(owner_id)
            .bind(project_id)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, Task>(
                "SELECT * FROM tasks WHERE owner_id = ? ORDER BY created_at DESC, id DESC",
            )
            .bind(owner_id)
            .fetch_all(pool)
            .await?
        }
    };
    Ok(tasks)
}

pub(super) async fn update_task_sqlite(
    pool: &Pool<Sqlite>,
    id: i64,
    owner_id: i64,
    title: &str,
    description: Option<&str>,
) -> Result<Option<Task>, ProjectError> {
    let task = sqlx::query_as::<_, Task>(
        r#"
        UPDATE tasks SET title = ?, description = ?, updated_at = ?
        WHERE id = ? AND owner_id = ?
        RETURNING *
        "#,
    )
    .bind(title)
    .bind(description)
    .bind(Utc::now())
    .bind(id)
    .bind(owner_id)
    .fetch_optional(pool)
    .await?;
    Ok(task)
}
