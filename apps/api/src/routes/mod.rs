pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::services::ServeDir;

use crate::resume::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let resume_files = ServeDir::new(&state.artifacts.output_dir);

    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/users/:user_id/resume",
            get(handlers::handle_get_resume),
        )
        .route(
            "/api/v1/resumes/:id",
            get(handlers::handle_get_resume_by_id).put(handlers::handle_update_resume),
        )
        .route(
            "/api/v1/resumes/:id/template",
            put(handlers::handle_update_template),
        )
        .route(
            "/api/v1/resumes/:id/latex",
            post(handlers::handle_generate_artifact),
        )
        .route("/api/v1/resumes/:id/preview", get(handlers::handle_preview))
        .route(
            "/api/v1/resumes/:id/versions",
            get(handlers::handle_list_versions),
        )
        .route(
            "/api/v1/resumes/:id/versions/:n",
            get(handlers::handle_get_version),
        )
        // Generated PDFs, at the URLs the generation endpoint hands out.
        .nest_service("/resumes", resume_files)
        .with_state(state)
}
