use std::sync::Arc;

use crate::config::AppConfig;
use crate::coordination::CoordinationError;
use crate::oauth2::{AccountStore, GitHubProvider, IdentityProvider};
use crate::project::{ProjectStore, TaskStore};
use crate::session::SessionStore;
use crate::storage::{DataStore, connect_data_store};
use crate::userdb::UserStore;

/// Everything a request needs: the database, the configuration and the identity provider.
///
/// Built once at startup and cloned into each request. All fields are shared
/// and read-only.
#[derive(Clone)]
pub struct AppContext {
    store: Arc<dyn DataStore>,
    config: Arc<AppConfig>,
    provider: Arc<dyn IdentityProvider>,
}

impl AppContext {
    /// Connect to the configured database, create missing tables and set up the GitHub client.
    pub async fn init(config: AppConfig) -> Result<Self, CoordinationError> {
        let store = connect_data_store(&config.store).await?;
        let provider = Arc::new(GitHubProvider::new(config.oauth2.clone())?);
        Self::with_parts(config, store, provider).await
    }

    /// Assemble a context from an existing store and provider.
    pub async fn with_parts(
        config: AppConfig,
        store: Arc<dyn DataStore>,
        provider: Arc<dyn IdentityProvider>,
    ) -> Result<Self, CoordinationError> {
        init_tables(store.as_ref()).await?;
        Ok(Self {
            store,
            config: Arc::new(config),
            provider,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub(crate) fn store(&self) -> &dyn DataStore {
        self.store.as_ref()
    }

    /// The provider registered under `name`, as used in `/oauth/{provider}/...`
    pub(crate) fn provider(&self, name: &str) -> Result<&dyn IdentityProvider, CoordinationError> {
        if self.provider.name() == name {
            Ok(self.provider.as_ref())
        } else {
            Err(CoordinationError::not_found("provider", name))
        }
    }
}

/// Create all tables, parents before children
pub(crate) async fn init_tables(store: &dyn DataStore) -> Result<(), CoordinationError> {
    UserStore::init(store).await?;
    AccountStore::init(store).await?;
    SessionStore::init(store).await?;
    ProjectStore::init(store).await?;
    TaskStore::init(store).await?;
    tracing::info!("Database tables ready");
    Ok(())
}
