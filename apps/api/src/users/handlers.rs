use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    Json,
};
use serde_json::{json, Map, Value};

use crate::auth::{self, user_id_from_headers};
use crate::errors::{require_json, AppError};
use crate::models::user::{ProfileInfo, UserSummary};
use crate::state::AppState;
use crate::users::{self, LoginRequest, LoginResponse, SignupRequest};

/// POST /users/signup
pub async fn handle_signup(
    State(state): State<AppState>,
    body: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<Json<UserSummary>, AppError> {
    let req = require_json(body, "Missing fields in input")?;
    Ok(Json(users::signup(state.store.as_ref(), req).await?))
}

/// POST /users/login
pub async fn handle_login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let req = require_json(body, "Missing username or password")?;
    Ok(Json(users::login(state.store.as_ref(), req).await?))
}

/// POST /users/logout
pub async fn handle_logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    let user_id = user_id_from_headers(&headers)?;
    let token = auth::bearer_token(&headers)?;
    auth::revoke_token(state.store.as_ref(), user_id, token).await?;
    Ok(Json(json!({ "success": "" })))
}

/// GET /getProfile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ProfileInfo>, AppError> {
    let user_id = user_id_from_headers(&headers)?;
    let user = users::load_user(state.store.as_ref(), user_id).await?;
    Ok(Json(ProfileInfo::from(&user)))
}

/// POST /updateProfile
pub async fn handle_update_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<Json<UserSummary>, AppError> {
    let user_id = user_id_from_headers(&headers)?;
    let fields = require_json(body, "Invalid request format")?;
    Ok(Json(
        users::update_profile(state.store.as_ref(), user_id, &fields).await?,
    ))
}
