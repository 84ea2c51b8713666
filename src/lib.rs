pub mod config;
pub mod domain;
pub mod shutdown;
pub mod state;
pub mod utils;

use axum::{
    routing::{get, post},
    Json, Router,
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

pub use domain::alert::{AlertRequest, AlertService, InvocationOutcome, Pipeline};
pub use state::AppState;
pub use utils::AlertError;

#[derive(OpenApi)]
#[openapi(
    paths(
        domain::alert::handler::invoke_handler,
    ),
    components(
        schemas(
            domain::alert::dto::AlertRequest,
            domain::alert::dto::InvocationResponse,
            utils::response::ErrorResponse,
        )
    ),
    tags(
        (name = "Alert", description = "Security alert trigger")
    )
)]
pub struct ApiDoc;

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .route(
            "/api/v1/alerts/invoke",
            post(domain::alert::handler::invoke_handler),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
