//! Route configuration.

use axum::{extract::DefaultBodyLimit, Router};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers::{
    action_routes, city_routes, contact_routes, entity_routes, health_routes, import_routes,
    search_routes,
};
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .nest("/health", health_routes())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/search", search_routes())
        // Import files can be much larger than JSON bodies
        .nest(
            "/imports",
            import_routes().layer(DefaultBodyLimit::max(upload_limit)),
        )
        .nest("/actions", action_routes())
        .nest("/contacts", contact_routes())
        .nest("/entities", entity_routes())
        .nest("/cities", city_routes())
        .with_state(state)
}
