use crate::session::{errors::SessionError, types::Session};
use crate::storage::{DataStore, DbTransaction};

use super::postgres::*;
use super::sqlite::*;

pub(crate) struct SessionStore;

impl SessionStore {
    pub(crate) async fn init(store: &dyn DataStore) -> Result<(), SessionError> {
        match (store.as_sqlite(), store.as_postgres()) {
            (Some(pool), _) => create_tables_sqlite(pool).await,
            (_, Some(pool)) => create_tables_postgres(pool).await,
            _ => Err(SessionError::Storage(
                "Unsupported database type".to_string(),
            )),
        }
    }

    /// Persist a session inside the login transaction
    #[tracing::instrument(skip(tx, token), fields(user_id = %user_id))]
    pub(crate) async fn insert_session_tx(
        tx: &mut DbTransaction,
        token: &str,
        user_id: i64,
        user_agent: &str,
    ) -> Result<Session, SessionError> {
        let result = match tx {
            DbTransaction::Sqlite(tx) => {
                insert_session_sqlite(&mut **tx, token, user_id, user_agent).await
            }
            DbTransaction::Postgres(tx) => {
                insert_session_postgres(&mut **tx, token, user_id, user_agent).await
            }
        };

        if let Err(e) = &result {
            tracing::error!(error = %e, "Session insert failed");
        }
        result
    }

    /// Drop a session inside the login transaction
    #[tracing::instrument(skip_all)]
    pub(crate) async fn delete_session_tx(
        tx: &mut DbTransaction,
        token: &str,
    ) -> Result<u64, SessionError> {
        match tx {
            DbTransaction::Sqlite(tx) => delete_session_sqlite(&mut **tx, token).await,
            DbTransaction::Postgres(tx) => delete_session_postgres(&mut **tx, token).await,
        }
    }

    /// Delete the session with `token`, returning the number of rows removed
    #[tracing::instrument(skip_all)]
    pub(crate) async fn delete_session(
        store: &dyn DataStore,
        token: &str,
    ) -> Result<u64, SessionError> {
        if let Some(pool) = store.as_sqlite() {
            let mut conn = pool.acquire().await?;
            delete_session_sqlite(&mut conn, token).await
        } else if let Some(pool) = store.as_postgres() {
            let mut conn = pool.acquire().await?;
            delete_session_postgres(&mut conn, token).await
        } else {
            Err(SessionError::Storage(
                "Unsupported database type".to_string(),
            ))
        }
    }

    /// Delete every session of `user_id` except the one with `keep_token`
    #[tracing::instrument(skip(store, keep_token), fields(user_id = %user_id))]
    pub(crate) async fn delete_other_sessions(
        store: &dyn DataStore,
        user_id: i64,
        keep_token: &str,
    ) -> Result<u64, SessionError> {
        let result = if let Some(pool) = store.as_sqlite() {
            delete_other_sessions_sqlite(pool, user_id, keep_token).await
        } else if let Some(pool) = store.as_postgres() {
            delete_other_sessions_postgres(pool, user_id, keep_token).await
        } else {
            Err(SessionError::Storage(
                "Unsupported database type".to_string(),
            ))
        };

        if let Ok(count) = &result {
            tracing::info!(deleted = count, "Other sessions deleted");
        }
        result
    }

    #[tracing::instrument(skip(store), fields(user_id = %user_id))]
    pub(crate) async fn list_sessions(
        store: &dyn DataStore,
        user_id: i64,
    ) -> Result<Vec<Session>, SessionError> {
        if let Some(pool) = store.as_sqlite() {
            list_sessions_sqlite(pool, user_id).await
        } else if let Some(pool) = store.as_postgres() {
            list_sessions_postgres(pool, user_id).await
        } else {
            Err(SessionError::Storage(
                "Unsupported database type".to_string(),
            ))
        }
    }
}
