use axum::{
    extract::{rejection::JsonRejection, Multipart, Query, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::user_id_from_headers;
use crate::errors::{require_json, AppError};
use crate::insights;
use crate::state::AppState;
use crate::users::load_user;

#[derive(Debug, Deserialize)]
pub struct InsightQuery {
    pub keywords: Option<String>,
}

/// GET /fake-job?keywords=<title>
pub async fn handle_career_guide(
    State(state): State<AppState>,
    Query(query): Query<InsightQuery>,
) -> Result<Json<Value>, AppError> {
    let job_title = query
        .keywords
        .filter(|k| !k.is_empty())
        .ok_or_else(|| AppError::Validation("Job title is required".to_string()))?;
    Ok(Json(insights::career_guide(&state.llm, &job_title).await?))
}

/// POST /parse-resume — multipart PDF under the `resume` field.
pub async fn handle_parse_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let mut pdf = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::Validation("No resume file found in the input".to_string()))?
    {
        if field.name() == Some("resume") {
            pdf = Some(field.bytes().await.map_err(|e| {
                AppError::Internal(anyhow::anyhow!("resume upload read failed: {e}"))
            })?);
            break;
        }
    }
    let Some(pdf) = pdf else {
        return Err(AppError::Validation(
            "No resume file found in the input".to_string(),
        ));
    };

    Ok(Json(insights::parse_resume(&state.llm, &pdf).await?))
}

#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    pub resume: Value,
    #[serde(rename = "jobInsights")]
    pub job_insights: Value,
}

/// POST /compare-resume
pub async fn handle_compare_resume(
    State(state): State<AppState>,
    body: Result<Json<CompareRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let req = require_json(body, "Invalid request format")?;
    Ok(Json(
        insights::compare_resume(&state.llm, &req.resume, &req.job_insights).await?,
    ))
}

/// GET /analyses
pub async fn handle_list_analyses(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Value>>, AppError> {
    let user_id = user_id_from_headers(&headers)?;
    let user = load_user(state.store.as_ref(), user_id).await?;
    Ok(Json(user.analyses))
}

/// POST /analyses
pub async fn handle_save_analysis(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let user_id = user_id_from_headers(&headers)?;
    let analysis = require_json(body, "Invalid request format")?;
    let mut user = load_user(state.store.as_ref(), user_id).await?;
    user.analyses.push(analysis);
    state
        .store
        .save_user(&user)
        .await
        .map_err(AppError::Internal)?;
    Ok(Json(json!({ "message": "Analysis saved successfully" })))
}
