//! Shared fixtures for unit tests: a fresh in-memory database per test and a fake provider.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;

use crate::config::{AppConfig, test_vars};
use crate::context::{AppContext, init_tables};
use crate::oauth2::{IdentityProvider, OAuth2Error, ProviderIdentity};
use crate::session::SessionStore;
use crate::storage::{DataStore, DbTransaction, StoreConfig, StoreType, connect_data_store};
use crate::userdb::{User, UserStore};

pub(crate) fn test_config() -> AppConfig {
    AppConfig::from_lookup(test_vars).expect("test config is valid")
}

/// A brand new in-memory SQLite database with all tables created
pub(crate) async fn test_store() -> Arc<dyn DataStore> {
    let store = connect_data_store(&StoreConfig {
        store_type: StoreType::Sqlite,
        url: "sqlite::memory:".to_string(),
    })
    .await
    .expect("in-memory sqlite");
    init_tables(store.as_ref()).await.expect("tables");
    store
}

pub(crate) async fn insert_test_user(store: &dyn DataStore, email: &str) -> User {
    let mut tx = DbTransaction::begin(store).await.expect("begin");
    let user = UserStore::insert_user_tx(&mut tx, email)
        .await
        .expect("insert user");
    tx.commit().await.expect("commit");
    user
}

pub(crate) async fn insert_test_session(store: &dyn DataStore, user_id: i64, token: &str) {
    let mut tx = DbTransaction::begin(store).await.expect("begin");
    SessionStore::insert_session_tx(&mut tx, token, user_id, "test-agent")
        .await
        .expect("insert session");
    tx.commit().await.expect("commit");
}

/// Identity provider double with scripted answers
pub(crate) struct MockProvider {
    pub(crate) identity: Mutex<Result<ProviderIdentity, OAuth2Error>>,
    pub(crate) exchange: Mutex<Result<String, OAuth2Error>>,
    pub(crate) exchange_calls: AtomicUsize,
}

impl MockProvider {
    pub(crate) fn new(external_id: &str, email: &str) -> Self {
        Self {
            identity: Mutex::new(Ok(ProviderIdentity {
                external_id: external_id.to_string(),
                primary_email: email.to_string(),
            })),
            exchange: Mutex::new(Ok("access-token-1".to_string())),
            exchange_calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn set_identity(&self, identity: Result<ProviderIdentity, OAuth2Error>) {
        *self.identity.lock().expect("lock") = identity;
    }

    pub(crate) fn set_exchange(&self, exchange: Result<String, OAuth2Error>) {
        *self.exchange.lock().expect("lock") = exchange;
    }

    pub(crate) fn exchange_calls(&self) -> usize {
        self.exchange_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for MockProvider {
    fn name(&self) -> &str {
        "github"
    }

    fn authorization_url(&self, state: &str) -> Result<String, OAuth2Error> {
        Ok(format!("https://provider.test/authorize?state={state}"))
    }

    async fn exchange_code(&self, _code: &str) -> Result<String, OAuth2Error> {
        self.exchange_calls.fetch_add(1, Ordering::SeqCst);
        self.exchange.lock().expect("lock").clone()
    }

    async fn fetch_identity(&self, _access_token: &str) -> Result<ProviderIdentity, OAuth2Error> {
        self.identity.lock().expect("lock").clone()
    }
}

pub(crate) async fn test_context(provider: Arc<MockProvider>) -> AppContext {
    AppContext::with_parts(test_config(), test_store().await, provider)
        .await
        .expect("context")
}
