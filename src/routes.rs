use crate::handlers::{self, AppState};
use crate::openapi::{serve_openapi_spec, serve_swagger_ui};
use axum::{
    routing::{delete, get, put},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

/// Request bodies above this size are rejected with 413.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Builds the full application router around the given state.
pub fn build_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route("/", get(handlers::home))
        .route(
            "/pessoa",
            get(handlers::get_person).post(handlers::create_person),
        )
        .route("/pessoas", get(handlers::list_persons))
        .route("/pessoa_atualiza_cpf", put(handlers::update_cpf))
        .route("/pessoa_atualiza", put(handlers::update_person))
        .route("/pessoa_excluir", delete(handlers::delete_person))
        .route("/pessoa_cep", get(handlers::lookup_address))
        .layer(ServiceBuilder::new().layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES)));

    Router::new()
        .route("/health", get(handlers::health))
        // API Documentation
        .route("/docs", get(serve_swagger_ui))
        .route("/api-docs/openapi.json", get(serve_openapi_spec))
        .merge(api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
