//! OAuth login: state issuance, callback handling, account linking and session issuance.

use http::HeaderMap;

use super::errors::CoordinationError;
use crate::context::AppContext;
use crate::oauth2::{Account, AccountStore, AuthResponse, ProviderIdentity};
use crate::session::{
    CookieSession, SessionStore, cookie_session_headers, prepare_logout_headers,
    read_cookie_session,
};
use crate::storage::{DataStore, DbTransaction};
use crate::userdb::{User, UserError, UserSearchField, UserStore, normalize_email};
use crate::utils::{gen_random_string, secure_compare};

const STATE_BYTES: usize = 32;
const SESSION_TOKEN_BYTES: usize = 128;

/// Start a login with `provider_name`.
///
/// Returns the provider authorization URL and the headers that store the new
/// CSRF state in the session cookie. A session token already in the cookie is kept.
#[tracing::instrument(skip(ctx, headers))]
pub async fn begin_login_core(
    ctx: &AppContext,
    provider_name: &str,
    headers: &HeaderMap,
) -> Result<(String, HeaderMap), CoordinationError> {
    let provider = ctx.provider(provider_name)?;
    let session_config = &ctx.config().session;

    let mut session = read_cookie_session(session_config, headers).unwrap_or_default();
    let state = gen_random_string(STATE_BYTES)?;
    let auth_url = provider.authorization_url(&state)?;
    session.state = Some(state);

    let headers = cookie_session_headers(session_config, &session)?;
    tracing::debug!("Login state issued");
    Ok((auth_url, headers))
}

/// Finish a login from the provider callback.
///
/// On success the returned headers carry the session cookie and the pending
/// state has been removed from it.
#[tracing::instrument(skip_all, fields(provider = %provider_name))]
pub async fn complete_login_core(
    ctx: &AppContext,
    provider_name: &str,
    headers: &HeaderMap,
    params: &AuthResponse,
    user_agent: &str,
) -> Result<(HeaderMap, User), CoordinationError> {
    let provider = ctx.provider(provider_name)?;
    let session_config = &ctx.config().session;

    let mut session = read_cookie_session(session_config, headers).unwrap_or_default();
    verify_state(session.state.as_deref(), &params.state)?;

    if params.code.is_empty() {
        return Err(CoordinationError::InvalidRequest(
            "Missing authorization code".to_string(),
        ));
    }

    let access_token = provider.exchange_code(&params.code).await?;
    let identity = provider.fetch_identity(&access_token).await?;
    let identity = ProviderIdentity {
        primary_email: normalize_email(&identity.primary_email),
        ..identity
    };
    tracing::info!(external_id = %identity.external_id, "Provider identity resolved");

    let store = ctx.store();
    let existing = AccountStore::get_account(store, &identity.external_id).await?;
    let refresh_email = match &existing {
        Some(account) => email_is_free_for(store, &identity.primary_email, account.user_id).await?,
        None => false,
    };

    let session_token = gen_random_string(SESSION_TOKEN_BYTES)?;
    // the browser was already signed in; that session ends with this login
    let replaced_token = session.token.replace(session_token.clone());
    session.state = None;
    let response_headers = cookie_session_headers(session_config, &session)?;

    let user = persist_login(
        store,
        &identity,
        &access_token,
        existing.as_ref(),
        refresh_email,
        replaced_token.as_deref(),
        &session_token,
        user_agent,
    )
    .await?;

    tracing::info!(user_id = user.id, "Login completed");
    Ok((response_headers, user))
}

/// Constant-time check of the callback `state` against the stored one.
pub(crate) fn verify_state(stored: Option<&str>, received: &str) -> Result<(), CoordinationError> {
    match stored {
        Some(expected) if !expected.is_empty() && secure_compare(received, expected) => Ok(()),
        Some(_) => Err(CoordinationError::StateMismatch.log()),
        None => {
            tracing::warn!("No pending login state in session");
            Err(CoordinationError::StateMismatch)
        }
    }
}

/// Whether `email` may be written to `user_id` without colliding with another user.
async fn email_is_free_for(
    store: &dyn DataStore,
    email: &str,
    user_id: i64,
) -> Result<bool, CoordinationError> {
    match UserStore::get_user_by(store, UserSearchField::Email(email.to_string())).await? {
        None => Ok(true),
        Some(holder) if holder.id == user_id => Ok(false),
        Some(holder) => {
            tracing::warn!(
                user_id,
                holder_id = holder.id,
                "Provider email already belongs to another user; keeping the stored email"
            );
            Ok(false)
        }
    }
}

/// Link or create the user and persist the session, all in one transaction.
///
/// Any failure rolls the transaction back, so no user, account or session
/// row from this login survives it.
pub(crate) async fn persist_login(
    store: &dyn DataStore,
    identity: &ProviderIdentity,
    access_token: &str,
    existing: Option<&Account>,
    refresh_email: bool,
    replaced_token: Option<&str>,
    session_token: &str,
    user_agent: &str,
) -> Result<User, CoordinationError> {
    let mut tx = DbTransaction::begin(store).await?;

    let result = link_and_issue(
        &mut tx,
        identity,
        access_token,
        existing,
        refresh_email,
        replaced_token,
        session_token,
        user_agent,
    )
    .await;

    match result {
        Ok(user) => {
            tx.commit().await?;
            Ok(user)
        }
        Err(e) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::error!(error = %rollback_err, "Rollback of login transaction failed");
            }
            Err(e)
        }
    }
}

async fn link_and_issue(
    tx: &mut DbTransaction,
    identity: &ProviderIdentity,
    access_token: &str,
    existing: Option<&Account>,
    refresh_email: bool,
    replaced_token: Option<&str>,
    session_token: &str,
    user_agent: &str,
) -> Result<User, CoordinationError> {
    let user = match existing {
        Some(account) => {
            AccountStore::update_access_token_tx(tx, &account.id, access_token).await?;
            let email = refresh_email.then_some(identity.primary_email.as_str());
            UserStore::refresh_user_tx(tx, account.user_id, email)
                .await?
                .ok_or(UserError::NotFound)?
        }
        None => {
            let user = UserStore::insert_user_tx(tx, &identity.primary_email).await?;
            AccountStore::insert_account_tx(tx, &identity.external_id, user.id, access_token)
                .await?;
            user
        }
    };

    if let Some(token) = replaced_token.filter(|t| !t.is_empty()) {
        let removed = SessionStore::delete_session_tx(tx, token).await?;
        tracing::debug!(removed, "Previous session of this browser ended");
    }
    SessionStore::insert_session_tx(tx, session_token, user.id, user_agent).await?;
    Ok(user)
}

/// End the current session and expire the cookie.
#[tracing::instrument(skip_all)]
pub async fn logout_core(ctx: &AppContext, headers: &HeaderMap) -> Result<HeaderMap, CoordinationError> {
    let session_config = &ctx.config().session;
    let token = read_cookie_session(session_config, headers)
        .and_then(|session: CookieSession| session.token)
        .filter(|token| !token.is_empty())
        .ok_or(CoordinationError::Unauthorized)?;

    let deleted = SessionStore::delete_session(ctx.store(), &token).await?;
    tracing::info!(deleted, "Session ended");
    Ok(prepare_logout_headers(session_config)?)
}

/// End every session of `user_id` except the current one. Returns how many were removed.
#[tracing::instrument(skip(ctx, current_token))]
pub async fn logout_all_core(
    ctx: &AppContext,
    user_id: i64,
    current_token: &str,
) -> Result<u64, CoordinationError> {
    Ok(SessionStore::delete_other_sessions(ctx.store(), user_id, current_token).await?)
}
