use chrono::Utc;
use sqlx::{Pool, PgConnection, Postgres};

use crate::oauth2::{errors::OAuth2Error, types::Account};

pub(super) async fn create_tables_postgres(pool: &Pool<Postgres>) -> Result<(), OAuth2Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS accounts (
            id TEXT PRIMARY KEY NOT NULL,
            user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            access_token TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_accounts_user_id ON accounts(user_id)")
        .execute(pool)
        .await?;

    Ok(())
}

pub(super) async fn get_account_postgres(
    pool: &Pool<Postgres>,
    external_id: &str,
) -> Result<Option<Account>, OAuth2Error> {
    let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1")
        .bind(external_id)
        .fetch_optional(pool)
        .await?;
    Ok(account)
}

pub(super) async fn insert_account_postgres(
    conn: &mut PgConnection,
    external_id: &str,
    user_id: i64,
    access_token: &str,
) -> Result<Account, OAuth2Error> {
    let now = Utc::now();
    let account = sqlx::query_as::<_, Account>(
        r#"
        INSERT INTO accounts (id, user_id, access_token, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(external_id)
    .bind(user_id)
    .bind(access_token)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;
    Ok(account)
}

pub(super) async fn update_access_token_postgres(
    conn: &mut PgConnection,
    external_id: &str,
    access_token: &str,
) -> Result<(), OAuth2Error> {
    sqlx::query("UPDATE accounts SET access_token = $1, updated_at = $2 WHERE id = $3")
        .bind(access_token)
        .bind(Utc::now())
        .bind(external_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}
