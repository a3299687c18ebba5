use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;

use projectmotor::{
    AppConfig, AppContext, DataStore, IdentityProvider, OAuth2Error, ProviderIdentity,
    connect_data_store,
};
use projectmotor_axum::app_router_no_trace;

pub const FAKE_AUTHORIZE_URL: &str = "https://github.test/login/oauth/authorize";

fn test_vars(key: &str) -> Option<String> {
    match key {
        "GENERIC_DATA_STORE_TYPE" => Some("sqlite".to_string()),
        "GENERIC_DATA_STORE_URL" => Some("sqlite::memory:".to_string()),
        "OAUTH2_GITHUB_CLIENT_ID" => Some("test-client-id".to_string()),
        "OAUTH2_GITHUB_CLIENT_SECRET" => Some("test-client-secret".to_string()),
        "SESSION_SECRET" => Some("0123456789abcdef0123456789abcdef".to_string()),
        "SESSION_COOKIE_SECURE" => Some("false".to_string()),
        _ => None,
    }
}

/// GitHub stand-in that answers every code with the scripted identity
pub struct FakeProvider {
    identity: Mutex<Result<ProviderIdentity, OAuth2Error>>,
}

impl FakeProvider {
    pub fn new(external_id: &str, email: &str) -> Self {
        Self {
            identity: Mutex::new(Ok(identity(external_id, email))),
        }
    }

    /// The identity returned by the next logins
    pub fn sign_in_as(&self, external_id: &str, email: &str) {
        *self.identity.lock().unwrap() = Ok(identity(external_id, email));
    }

    pub fn fail_with(&self, error: OAuth2Error) {
        *self.identity.lock().unwrap() = Err(error);
    }
}

fn identity(external_id: &str, email: &str) -> ProviderIdentity {
    ProviderIdentity {
        external_id: external_id.to_string(),
        primary_email: email.to_string(),
    }
}

#[async_trait]
impl IdentityProvider for FakeProvider {
    fn name(&self) -> &str {
        "github"
    }

    fn authorization_url(&self, state: &str) -> Result<String, OAuth2Error> {
        Ok(format!("{FAKE_AUTHORIZE_URL}?client_id=test-client-id&state={state}"))
    }

    async fn exchange_code(&self, code: &str) -> Result<String, OAuth2Error> {
        if code == "bad-code" {
            return Err(OAuth2Error::TokenExchange("bad_verification_code".to_string()));
        }
        Ok(format!("gho_{code}"))
    }

    async fn fetch_identity(&self, _access_token: &str) -> Result<ProviderIdentity, OAuth2Error> {
        self.identity.lock().unwrap().clone()
    }
}

/// A router over a fresh in-memory database
pub struct TestApp {
    pub router: Router,
    pub store: Arc<dyn DataStore>,
    pub provider: Arc<FakeProvider>,
}

impl TestApp {
    pub async fn new() -> Self {
        let config = AppConfig::from_lookup(test_vars).expect("test config");
        let store = connect_data_store(&config.store)
            .await
            .expect("in-memory sqlite");
        let provider = Arc::new(FakeProvider::new("42", "a@example.com"));

        let ctx = AppContext::with_parts(config, store.clone(), provider.clone())
            .await
            .expect("context");

        Self {
            router: app_router_no_trace(ctx),
            store,
            provider,
        }
    }

    pub async fn count(&self, table: &str) -> i64 {
        let pool = self.store.as_sqlite().expect("sqlite store");
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(pool)
            .await
            .expect("count")
    }

    pub async fn scalar(&self, sql: &str) -> i64 {
        let pool = self.store.as_sqlite().expect("sqlite store");
        sqlx::query_scalar(sql)
            .fetch_one(pool)
            .await
            .expect("scalar")
    }
}
