use chrono::Utc;
use sqlx::{Pool, Sqlite, SqliteConnection};

use crate::userdb::{
    errors::UserError,
    types::{User, UserSearchField},
};

// SQLite implementations
pub(super) async fn create_tables_sqlite(pool: &Pool<Sqlite>) -> Result<(), UserError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT,
            email TEXT NOT NULL UNIQUE,
            avatar TEXT,
            created_at TIMESTAMP NOT NULL,
            updated_at TIMESTAMP NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub(super) async fn get_user_by_field_sqlite(
    pool: &Pool<Sqlite>,
    field: &UserSearchField,
) -> Result<Option<User>, UserError> {
    let user = match field {
        UserSearchField::Id(id) => {
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
                .bind(id)
                .fetch_optional(pool)
                .await?
        }
        UserSearchField::Email(email) => {
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
                .bind(email)
                .fetch_optional(pool)
                .await?
        }
        UserSearchField::SessionToken(token) => {
            sqlx::query_as::<_, User>(
                r#"
                SELECT users.* FROM users
                INNER JOIN sessions ON sessions.user_id = users.id
                WHERE sessions.token = ?
                "#,
            )
            .bind(token)
            .fetch_optional(pool)
            .await?
        }
    };
    Ok(user)
}

pub(super) async fn insert_user_sqlite(
    conn: &mut SqliteConnection,
    email: &str,
) -> Result<User, UserError> {
    let now = Utc::now();
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (email, created_at, updated_at)
        VALUES (?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(email)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;
    Ok(user)
}

pub(super) async fn refresh_user_sqlite(
    conn: &mut SqliteConnection,
    id: i64,
    email: Option<&str>,
) -> Result<Option<User>, UserError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users SET email = COALESCE(?, email), updated_at = ?
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(email)
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(user)
}

pub(super) async fn list_shared_users_sqlite(
    pool: &Pool<Sqlite>,
    project_id: i64,
) -> Result<Vec<User>, UserError> {
    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT users.* FROM users
        INNER JOIN projects_users ON projects_users.user_id = users.id
        WHERE projects_users.project_id = ?
        ORDER BY users.email ASC
        "#,
    )
    .bind(project_id)
    .fetch_all(pool)
    .await?;
    Ok(users)
}
