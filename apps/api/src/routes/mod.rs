pub mod health;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::auth::gate;
use crate::errors::AppError;
use crate::insights::handlers as insight_handlers;
use crate::ledger::handlers as ledger_handlers;
use crate::pool::handlers as pool_handlers;
use crate::resume::handlers as resume_handlers;
use crate::state::AppState;
use crate::users::handlers as user_handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::health_handler))
        .route("/users/signup", post(user_handlers::handle_signup))
        .route("/users/login", post(user_handlers::handle_login))
        .route("/users/logout", post(user_handlers::handle_logout))
        .route("/getProfile", get(user_handlers::handle_get_profile))
        .route("/updateProfile", post(user_handlers::handle_update_profile))
        .route(
            "/applications",
            get(ledger_handlers::handle_list).post(ledger_handlers::handle_add),
        )
        .route(
            "/applications/:id",
            put(ledger_handlers::handle_update).delete(ledger_handlers::handle_delete),
        )
        .route("/wishlist", post(pool_handlers::handle_wishlist))
        .route("/jobs/shared", get(pool_handlers::handle_shared_jobs))
        .route(
            "/resume",
            post(resume_handlers::handle_upload).get(resume_handlers::handle_download),
        )
        .route("/fake-job", get(insight_handlers::handle_career_guide))
        .route("/parse-resume", post(insight_handlers::handle_parse_resume))
        .route(
            "/compare-resume",
            post(insight_handlers::handle_compare_resume),
        )
        .route(
            "/analyses",
            get(insight_handlers::handle_list_analyses)
                .post(insight_handlers::handle_save_analysis),
        )
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            gate::require_auth,
        ))
        .with_state(state)
}

async fn not_found() -> AppError {
    AppError::NotFound("Not Found".to_string())
}
