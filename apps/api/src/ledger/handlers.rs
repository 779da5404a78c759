use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;

use crate::auth::user_id_from_headers;
use crate::errors::{require_json, AppError};
use crate::ledger::{self, ApplicationPatch, NewApplication};
use crate::models::user::Application;
use crate::pool;
use crate::state::AppState;

/// Request bodies wrap the payload under an `application` key.
#[derive(Debug, Deserialize)]
pub struct ApplicationEnvelope<T> {
    pub application: Option<T>,
}

/// GET /applications
pub async fn handle_list(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Application>>, AppError> {
    let user_id = user_id_from_headers(&headers)?;
    Ok(Json(ledger::list(state.store.as_ref(), user_id).await?))
}

/// POST /applications
pub async fn handle_add(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<ApplicationEnvelope<NewApplication>>, JsonRejection>,
) -> Result<Json<Application>, AppError> {
    let user_id = user_id_from_headers(&headers)?;
    let req = require_json(body, "Missing fields in input")?
        .application
        .ok_or_else(|| AppError::Validation("Missing fields in input".to_string()))?;
    Ok(Json(
        pool::apply_and_share(state.store.as_ref(), user_id, req).await?,
    ))
}

/// PUT /applications/:id
pub async fn handle_update(
    State(state): State<AppState>,
    Path(application_id): Path<i64>,
    headers: HeaderMap,
    body: Result<Json<ApplicationEnvelope<ApplicationPatch>>, JsonRejection>,
) -> Result<Json<Application>, AppError> {
    let user_id = user_id_from_headers(&headers)?;
    let patch = require_json(body, "No fields found in input")?
        .application
        .ok_or_else(|| AppError::Validation("No fields found in input".to_string()))?;
    Ok(Json(
        ledger::update(state.store.as_ref(), user_id, application_id, patch).await?,
    ))
}

/// DELETE /applications/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    Path(application_id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<Application>, AppError> {
    let user_id = user_id_from_headers(&headers)?;
    Ok(Json(
        ledger::delete(state.store.as_ref(), user_id, application_id).await?,
    ))
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::auth::issue_token;
    use crate::models::user::User;
    use crate::routes::build_router;
    use crate::state::AppState;

    async fn state_with_token() -> (AppState, String) {
        let state = AppState::for_tests();
        let mut user = User::new(1);
        user.username = Some("alice".to_string());
        state.store.insert_user(&user).await.unwrap();
        let issued = issue_token(state.store.as_ref(), &user).await.unwrap();
        (state, issued.token)
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn unparseable_update_body_keeps_the_error_shape() {
        let (state, token) = state_with_token().await;
        let response = build_router(state)
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/applications/1")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("not json at all"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "No fields found in input" })
        );
    }

    #[tokio::test]
    async fn unparseable_add_body_keeps_the_error_shape() {
        let (state, token) = state_with_token().await;
        let response = build_router(state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/applications")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{\"application\": "))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Missing fields in input" })
        );
    }

    #[tokio::test]
    async fn missing_content_type_is_a_validation_error_too() {
        let (state, token) = state_with_token().await;
        let response = build_router(state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/applications")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::from("{\"application\": {}}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Missing fields in input" })
        );
    }
}
