use sqlx::{Pool, Postgres, Sqlite, Transaction};

use crate::storage::errors::StorageError;

// Types
#[derive(Clone, Debug)]
pub(crate) struct SqliteDataStore {
    pub(super) pool: sqlx::SqlitePool,
}

#[derive(Clone, Debug)]
pub(crate) struct PostgresDataStore {
    pub(super) pool: sqlx::PgPool,
}

// Trait
pub trait DataStore: Send + Sync {
    fn as_sqlite(&self) -> Option<&Pool<Sqlite>>;
    fn as_postgres(&self) -> Option<&Pool<Postgres>>;
}

// Store implementations
impl DataStore for SqliteDataStore {
    fn as_sqlite(&self) -> Option<&Pool<Sqlite>> {
        Some(&self.pool)
    }

    fn as_postgres(&self) -> Option<&Pool<Postgres>> {
        None
    }
}

impl DataStore for PostgresDataStore {
    fn as_sqlite(&self) -> Option<&Pool<Sqlite>> {
        None
    }

    fn as_postgres(&self) -> Option<&Pool<Postgres>> {
        Some(&self.pool)
    }
}

/// An open transaction on whichever backend the store uses.
///
/// Dropping it without calling [`DbTransaction::commit`] rolls back, but the
/// login flow always rolls back explicitly so the failure is logged.
pub(crate) enum DbTransaction {
    Sqlite(Transaction<'static, Sqlite>),
    Postgres(Transaction<'static, Postgres>),
}

impl DbTransaction {
    pub(crate) async fn begin(store: &dyn DataStore) -> Result<Self, StorageError> {
        if let Some(pool) = store.as_sqlite() {
            Ok(Self::Sqlite(pool.begin().await?))
        } else if let Some(pool) = store.as_postgres() {
            Ok(Self::Postgres(pool.begin().await?))
        } else {
            Err(StorageError::UnsupportedType(
                "Unsupported database type".to_string(),
            ))
        }
    }

    pub(crate) async fn commit(self) -> Result<(), StorageError> {
        match self {
            Self::Sqlite(tx) => tx.commit().await?,
            Self::Postgres(tx) => tx.commit().await?,
        }
        Ok(())
    }

    pub(crate) async fn rollback(self) -> Result<(), StorageError> {
        match self {
            Self::Sqlite(tx) => tx.rollback().await?,
            Self::Postgres(tx) => tx.rollback().await?,
        }
        Ok(())
    }
}
