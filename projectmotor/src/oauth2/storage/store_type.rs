use crate::oauth2::{errors::OAuth2Error, types::Account};
use crate::storage::{DataStore, DbTransaction};

use super::postgres::*;
use super::sqlite::*;

/// Persistence of provider accounts linked to local users
pub(crate) struct AccountStore;

impl AccountStore {
    pub(crate) async fn init(store: &dyn DataStore) -> Result<(), OAuth2Error> {
        match (store.as_sqlite(), store.as_postgres()) {
            (Some(pool), _) => create_tables_sqlite(pool).await,
            (_, Some(pool)) => create_tables_postgres(pool).await,
            _ => Err(OAuth2Error::Storage(
                "Unsupported database type".to_string(),
            )),
        }
    }

    #[tracing::instrument(skip(store))]
    pub(crate) async fn get_account(
        store: &dyn DataStore,
        external_id: &str,
    ) -> Result<Option<Account>, OAuth2Error> {
        let result = if let Some(pool) = store.as_sqlite() {
            get_account_sqlite(pool, external_id).await
        } else if let Some(pool) = store.as_postgres() {
            get_account_postgres(pool, external_id).await
        } else {
            Err(OAuth2Error::Storage(
                "Unsupported database type".to_string(),
            ))
        };

        match &result {
            Ok(found) => tracing::debug!(found = found.is_some(), "Account lookup completed"),
            Err(e) => tracing::error!(error = %e, "Account lookup failed"),
        }
        result
    }

    #[tracing::instrument(skip(tx, access_token))]
    pub(crate) async fn insert_account_tx(
        tx: &mut DbTransaction,
        external_id: &str,
        user_id: i64,
        access_token: &str,
    ) -> Result<Account, OAuth2Error> {
        let result = match tx {
            DbTransaction::Sqlite(tx) => {
                insert_account_sqlite(&mut **tx, external_id, user_id, access_token).await
            }
            DbTransaction::Postgres(tx) => {
                insert_account_postgres(&mut **tx, external_id, user_id, access_token).await
            }
        };

        match &result {
            Ok(_) => tracing::info!("Account linked"),
            Err(e) => tracing::error!(error = %e, "Account insert failed"),
        }
        result
    }

    /// Overwrite the stored access token of an existing account
    #[tracing::instrument(skip(tx, access_token))]
    pub(crate) async fn update_access_token_tx(
        tx: &mut DbTransaction,
        external_id: &str,
        access_token: &str,
    ) -> Result<(), OAuth2Error> {
        match tx {
            DbTransaction::Sqlite(tx) => {
                update_access_token_sqlite(&mut **tx, external_id, access_token).await
            }
            DbTransaction::Postgres(tx) => {
                update_access_token_postgres(&mut **tx, external_id, access_token).await
            }
        }
    }
}
