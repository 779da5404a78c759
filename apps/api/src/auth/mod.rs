//! Token authority — issues, validates, and revokes bearer tokens.
//!
//! Tokens are denormalized into the user document rather than a central
//! session table: the user id rides in the token prefix, so validation is a
//! single lookup by id followed by a scan of that user's token list.

pub mod federated;
pub mod gate;
pub mod password;

use axum::http::{header, HeaderMap};
use chrono::{Duration, NaiveDateTime, Utc};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::{AuthToken, User};
use crate::store::DocumentStore;

pub const TOKEN_TTL_HOURS: i64 = 24;

/// Wire format of stored expiry strings. Clients echo it back verbatim,
/// so it must not change. Always UTC.
pub const EXPIRY_FORMAT: &str = "%m/%d/%Y, %H:%M:%S";

/// A freshly minted session token and its formatted expiry.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expiry: String,
}

/// Extracts the user id encoded before the first `.` of a token.
pub fn token_user_id(token: &str) -> Option<i64> {
    token.split('.').next()?.parse().ok()
}

/// Pulls the token out of an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(AppError::Unauthorized)
}

/// Handlers re-derive the caller from the header on every request; no
/// session state survives past a single request.
pub fn user_id_from_headers(headers: &HeaderMap) -> Result<i64, AppError> {
    token_user_id(bearer_token(headers)?).ok_or(AppError::Unauthorized)
}

/// Issues a `"<userId>.<uuid4>"` token valid for 24 hours and appends it to
/// the user's token list. Concurrent sessions each get their own entry.
pub async fn issue_token(store: &dyn DocumentStore, user: &User) -> Result<IssuedToken, AppError> {
    issue_token_with_opaque(store, user, &Uuid::new_v4().to_string()).await
}

/// Same as [`issue_token`] but with a caller-supplied opaque segment.
/// Federated login reuses the provider's access token here.
pub async fn issue_token_with_opaque(
    store: &dyn DocumentStore,
    user: &User,
    opaque: &str,
) -> Result<IssuedToken, AppError> {
    let token = format!("{}.{}", user.id, opaque);
    let expiry = (Utc::now() + Duration::hours(TOKEN_TTL_HOURS))
        .format(EXPIRY_FORMAT)
        .to_string();

    let mut tokens = user.auth_tokens.clone();
    tokens.push(AuthToken {
        token: token.clone(),
        expiry: expiry.clone(),
    });
    store
        .set_auth_tokens(user.id, &tokens)
        .await
        .map_err(AppError::Internal)?;

    Ok(IssuedToken { token, expiry })
}

/// Validates a token: parse the id prefix, load the user, find the exact
/// token, check expiry. Non-consuming — a live token validates any number of
/// times. An expired token is deleted from the list before rejection (lazy
/// cleanup), so the list only ever shrinks through logout or failed checks.
pub async fn validate_token(store: &dyn DocumentStore, token: &str) -> Result<i64, AppError> {
    let user_id = token_user_id(token).ok_or(AppError::Unauthorized)?;
    let user = store
        .find_user(user_id)
        .await
        .map_err(AppError::Internal)?
        .ok_or(AppError::Unauthorized)?;

    let Some(entry) = user.auth_tokens.iter().find(|t| t.token == token) else {
        return Err(AppError::Unauthorized);
    };

    // A stored expiry that does not parse is corrupt state, not a bad
    // credential: fail closed with a 500 rather than a 401.
    let expiry = NaiveDateTime::parse_from_str(&entry.expiry, EXPIRY_FORMAT)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("malformed token expiry: {e}")))?;

    if Utc::now().naive_utc() <= expiry {
        return Ok(user_id);
    }

    let remaining: Vec<AuthToken> = user
        .auth_tokens
        .iter()
        .filter(|t| t.token != token)
        .cloned()
        .collect();
    store
        .set_auth_tokens(user_id, &remaining)
        .await
        .map_err(AppError::Internal)?;

    Err(AppError::Unauthorized)
}

/// Removes the exact matching token from the user's list; no-op if absent.
pub async fn revoke_token(
    store: &dyn DocumentStore,
    user_id: i64,
    token: &str,
) -> Result<(), AppError> {
    let user = store
        .find_user(user_id)
        .await
        .map_err(AppError::Internal)?
        .ok_or(AppError::Unauthorized)?;

    let remaining: Vec<AuthToken> = user
        .auth_tokens
        .iter()
        .filter(|t| t.token != token)
        .cloned()
        .collect();
    store
        .set_auth_tokens(user_id, &remaining)
        .await
        .map_err(AppError::Internal)?;
    Ok(())
}
