use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    Json,
};
use uuid::Uuid;

use crate::auth::user_id_from_headers;
use crate::errors::{require_json, AppError};
use crate::models::job::SharedJobView;
use crate::models::user::Application;
use crate::pool::{self, WishlistRequest};
use crate::state::AppState;

/// POST /wishlist
pub async fn handle_wishlist(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<WishlistRequest>, JsonRejection>,
) -> Result<Json<Application>, AppError> {
    let user_id = user_id_from_headers(&headers)?;
    let job_id = require_json(body, "Invalid request format")?
        .job_id
        .ok_or_else(|| AppError::Validation("Missing jobId in request".to_string()))?;
    let job_id = Uuid::parse_str(&job_id)
        .map_err(|_| AppError::Validation("Invalid request format".to_string()))?;
    Ok(Json(
        pool::add_to_wishlist(state.store.as_ref(), user_id, job_id).await?,
    ))
}

/// GET /jobs/shared
pub async fn handle_shared_jobs(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<SharedJobView>>, AppError> {
    let user_id = user_id_from_headers(&headers)?;
    Ok(Json(
        pool::shared_jobs_for(state.store.as_ref(), user_id).await?,
    ))
}
