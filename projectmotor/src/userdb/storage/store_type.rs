use crate::storage::{DataStore, DbTransaction};
use crate::userdb::{
    errors::UserError,
    types::{User, UserSearchField},
};

use super::postgres::*;
use super::sqlite::*;

pub(crate) struct UserStore;

impl UserStore {
    /// Initialize the user database tables
    pub(crate) async fn init(store: &dyn DataStore) -> Result<(), UserError> {
        match (store.as_sqlite(), store.as_postgres()) {
            (Some(pool), _) => create_tables_sqlite(pool).await,
            (_, Some(pool)) => create_tables_postgres(pool).await,
            _ => Err(UserError::Storage("Unsupported database type".to_string())),
        }
    }

    /// Get a user by their ID
    #[tracing::instrument(skip(store), fields(user_id = %id))]
    pub(crate) async fn get_user(store: &dyn DataStore, id: i64) -> Result<Option<User>, UserError> {
        Self::get_user_by(store, UserSearchField::Id(id)).await
    }

    #[tracing::instrument(skip(store), fields(user_field = %field))]
    pub(crate) async fn get_user_by(
        store: &dyn DataStore,
        field: UserSearchField,
    ) -> Result<Option<User>, UserError> {
        let result = if let Some(pool) = store.as_sqlite() {
            get_user_by_field_sqlite(pool, &field).await
        } else if let Some(pool) = store.as_postgres() {
            get_user_by_field_postgres(pool, &field).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        };

        match &result {
            Ok(Some(_)) => {
                tracing::debug!(found = true, "User lookup completed");
            }
            Ok(None) => {
                tracing::debug!(found = false, "User lookup completed - not found");
            }
            Err(e) => {
                tracing::error!(error = %e, "User lookup failed");
            }
        }

        result
    }

    /// Insert a new user inside an open transaction
    #[tracing::instrument(skip(tx))]
    pub(crate) async fn insert_user_tx(
        tx: &mut DbTransaction,
        email: &str,
    ) -> Result<User, UserError> {
        let result = match tx {
            DbTransaction::Sqlite(tx) => insert_user_sqlite(&mut **tx, email).await,
            DbTransaction::Postgres(tx) => insert_user_postgres(&mut **tx, email).await,
        };

        match &result {
            Ok(user) => tracing::info!(user_id = user.id, "User created"),
            Err(e) => tracing::error!(error = %e, "User creation failed"),
        }
        result
    }

    /// Touch a user on re-login, replacing the email when one is given
    #[tracing::instrument(skip(tx), fields(user_id = %id))]
    pub(crate) async fn refresh_user_tx(
        tx: &mut DbTransaction,
        id: i64,
        email: Option<&str>,
    ) -> Result<Option<User>, UserError> {
        match tx {
            DbTransaction::Sqlite(tx) => refresh_user_sqlite(&mut **tx, id, email).await,
            DbTransaction::Postgres(tx) => refresh_user_postgres(&mut **tx, id, email).await,
        }
    }

    /// Users a project has been shared with
    #[tracing::instrument(skip(store), fields(project_id = %project_id))]
    pub(crate) async fn list_shared_users(
        store: &dyn DataStore,
        project_id: i64,
    ) -> Result<Vec<User>, UserError> {
        if let Some(pool) = store.as_sqlite() {
            list_shared_users_sqlite(pool, project_id).await
        } else if let Some(pool) = store.as_postgres() {
            list_shared_users_postgres(pool, project_id).await
        } else {
            Err(UserError::Storage("Unsupported database type".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{insert_test_user, test_store};

    #[tokio::test]
    async fn test_get_user_by_id_and_email() {
        let store = test_store().await;
        let user = insert_test_user(store.as_ref(), "alice@example.com").await;

        let by_id = UserStore::get_user(store.as_ref(), user.id)
            .await
            .expect("lookup")
            .expect("user exists");
        assert_eq!(by_id, user);

        let by_email = UserStore::get_user_by(
            store.as_ref(),
            UserSearchField::Email("alice@example.com".to_string()),
        )
        .await
        .expect("lookup");
        assert_eq!(by_email.map(|u| u.id), Some(user.id));

        let missing = UserStore::get_user(store.as_ref(), user.id + 100)
            .await
            .expect("lookup");
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_insert_duplicate_email_fails() {
        let store = test_store().await;
        insert_test_user(store.as_ref(), "dup@example.com").await;

        let mut tx = DbTransaction::begin(store.as_ref()).await.expect("begin");
        let result = UserStore::insert_user_tx(&mut tx, "dup@example.com").await;
        assert!(matches!(result, Err(UserError::Storage(_))));
        tx.rollback().await.expect("rollback");
    }

    #[tokio::test]
    async fn test_refresh_user_keeps_email_when_none() {
        let store = test_store().await;
        let user = insert_test_user(store.as_ref(), "keep@example.com").await;

        let mut tx = DbTransaction::begin(store.as_ref()).await.expect("begin");
        let refreshed = UserStore::refresh_user_tx(&mut tx, user.id, None)
            .await
            .expect("refresh")
            .expect("user exists");
        assert_eq!(refreshed.email, "keep@example.com");

        let refreshed = UserStore::refresh_user_tx(&mut tx, user.id, Some("new@example.com"))
            .await
            .expect("refresh")
            .expect("user exists");
        assert_eq!(refreshed.email, "new@example.com");
        tx.commit().await.expect("commit");

        let stored = UserStore::get_user(store.as_ref(), user.id)
            .await
            .expect("lookup")
            .expect("user exists");
        assert_eq!(stored.email, "new@example.com");
    }

    #[tokio::test]
    async fn test_refresh_missing_user_returns_none() {
        let store = test_store().await;
        let mut tx = DbTransaction::begin(store.as_ref()).await.expect("begin");
        let result = UserStore::refresh_user_tx(&mut tx, 999, None)
            .await
            .expect("refresh");
        assert!(result.is_none());
        tx.rollback().await.expect("rollback");
    }
}
