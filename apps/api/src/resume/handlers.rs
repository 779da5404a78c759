use axum::{
    extract::{Multipart, State},
    http::{header, HeaderMap, HeaderName, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde_json::{json, Value};

use crate::auth::user_id_from_headers;
use crate::blobs::StoredResume;
use crate::errors::AppError;
use crate::state::AppState;

/// POST /resume — multipart upload under the `file` field, replace semantics.
/// The stored content type is forced to PDF regardless of what the client
/// claims; only PDFs are accepted downstream.
pub async fn handle_upload(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let user_id = user_id_from_headers(&headers)?;

    let mut upload: Option<(String, Bytes)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::Validation("No resume file found in the input".to_string()))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or("resume.pdf").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::Internal(anyhow::anyhow!("resume upload read failed: {e}")))?;
            upload = Some((filename, data));
            break;
        }
    }

    let Some((filename, data)) = upload else {
        return Err(AppError::Validation(
            "No resume file found in the input".to_string(),
        ));
    };

    let replacing = state
        .blobs
        .get(user_id)
        .await
        .map_err(AppError::Internal)?
        .is_some();
    state
        .blobs
        .put(
            user_id,
            StoredResume {
                filename,
                content_type: "application/pdf".to_string(),
                data,
            },
        )
        .await
        .map_err(AppError::Internal)?;

    let message = if replacing {
        "resume successfully replaced"
    } else {
        "resume successfully uploaded"
    };
    Ok(Json(json!({ "message": message })))
}

/// GET /resume — streams the stored file back with the original filename in
/// an `x-filename` header (exposed for browser clients).
pub async fn handle_download(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let user_id = user_id_from_headers(&headers)?;

    let resume = state
        .blobs
        .get(user_id)
        .await
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::Validation("resume could not be found".to_string()))?;

    let mut response_headers = HeaderMap::new();
    response_headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(&resume.content_type)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("bad content type: {e}")))?,
    );
    response_headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&format!("attachment; filename=\"{}\"", resume.filename))
            .map_err(|e| AppError::Internal(anyhow::anyhow!("bad resume filename: {e}")))?,
    );
    response_headers.insert(
        HeaderName::from_static("x-filename"),
        HeaderValue::from_str(&resume.filename)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("bad resume filename: {e}")))?,
    );
    response_headers.insert(
        header::ACCESS_CONTROL_EXPOSE_HEADERS,
        HeaderValue::from_static("x-filename"),
    );

    Ok((response_headers, resume.data).into_response())
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    use crate::auth::issue_token;
    use crate::models::user::User;
    use crate::routes::build_router;
    use crate::state::AppState;

    const BOUNDARY: &str = "test-boundary";

    fn multipart_body(field: &str, filename: &str, content: &[u8]) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/pdf\r\n\r\n");
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    async fn state_with_token() -> (AppState, String) {
        let state = AppState::for_tests();
        let mut user = User::new(1);
        user.username = Some("alice".to_string());
        state.store.insert_user(&user).await.unwrap();
        let issued = issue_token(state.store.as_ref(), &user).await.unwrap();
        (state, issued.token)
    }

    #[tokio::test]
    async fn upload_then_download_round_trip() {
        let (state, token) = state_with_token().await;
        let router = build_router(state);

        let upload = Request::builder()
            .method("POST")
            .uri("/resume")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body("file", "cv.pdf", b"%PDF-1.4 fake")))
            .unwrap();
        let response = router.clone().oneshot(upload).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let download = Request::builder()
            .uri("/resume")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(download).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("x-filename").unwrap(),
            &"cv.pdf".parse::<axum::http::HeaderValue>().unwrap()
        );
    }

    #[tokio::test]
    async fn download_without_upload_is_a_400() {
        let (state, token) = state_with_token().await;
        let response = build_router(state)
            .oneshot(
                Request::builder()
                    .uri("/resume")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn upload_without_file_field_is_a_400() {
        let (state, token) = state_with_token().await;
        let request = Request::builder()
            .method("POST")
            .uri("/resume")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body("other", "cv.pdf", b"%PDF-1.4")))
            .unwrap();
        let response = build_router(state).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
