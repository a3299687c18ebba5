use chrono::Utc;
use sqlx::{Pool, Sqlite, SqliteConnection};

use crate::session::{errors::SessionError, types::Session};

pub(super) async fn create_tables_sqlite(pool: &Pool<Sqlite>) -> Result<(), SessionError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            token TEXT NOT NULL UNIQUE,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            user_agent TEXT NOT NULL DEFAULT '',
            created_at TIMESTAMP NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_sessions_user_id ON sessions(user_id)")
        .execute(pool)
        .await?;

    Ok(())
}

pub(super) async fn insert_session_sqlite(
    conn: &mut SqliteConnection,
    token: &str,
    user_id: i64,
    user_agent: &str,
) -> Result<Session, SessionError> {
    let session = sqlx::query_as::<_, Session>(
        r#"
        INSERT INTO sessions (token, user_id, user_agent, created_at)
        VALUES (?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(token)
    .bind(user_id)
    .bind(user_agent)
    .bind(Utc::now())
    .fetch_one(&mut *conn)
    .await?;
    Ok(session)
}

pub(super) async fn delete_session_sqlite(
    conn: &mut SqliteConnection,
    token: &str,
) -> Result<u64, SessionError> {
    let result = sqlx::query("DELETE FROM sessions WHERE token = ?")
        .bind(token)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected())
}

pub(super) async fn delete_other_sessions_sqlite(
    pool: &Pool<Sqlite>,
    user_id: i64,
    keep_token: &str,
) -> Result<u64, SessionError> {
    let result = sqlx::query("DELETE FROM sessions WHERE user_id = ? AND token <> ?")
        .bind(user_id)
        .bind(keep_token)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub(super) async fn list_sessions_sqlite(
    pool: &Pool<Sqlite>,
    user_id: i64,
) -> Result<Vec<Session>, SessionError> {
    let sessions = sqlx::query_as::<_, Session>(
        "SELECT * FROM sessions WHERE user_id = ? ORDER BY created_at DESC, id DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(sessions)
}
