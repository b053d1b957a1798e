use crate::handlers::{
    consoles::{delete_console, list_consoles, update_console},
    health::health_check,
    tags::{delete_tag, list_tags, update_tag},
    users::{create_token, create_user, get_me, update_me},
    videogames::{
        create_videogame, delete_videogame, get_videogame, list_videogames, update_videogame,
        upload_videogame_image,
    },
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // User registration, token issuance and profile management
        .route("/api/v1/users", post(create_user))
        .route("/api/v1/users/token", post(create_token))
        .route("/api/v1/users/me", get(get_me))
        .route("/api/v1/users/me", patch(update_me))
        // Videogame CRUD routes
        .route("/api/v1/videogames", get(list_videogames))
        .route("/api/v1/videogames", post(create_videogame))
        .route("/api/v1/videogames/:videogame_id", get(get_videogame))
        .route("/api/v1/videogames/:videogame_id", put(update_videogame))
        .route("/api/v1/videogames/:videogame_id", patch(update_videogame))
        .route("/api/v1/videogames/:videogame_id", delete(delete_videogame))
        .route(
            "/api/v1/videogames/:videogame_id/upload-image",
            post(upload_videogame_image),
        )
        // Tag routes
        .route("/api/v1/tags", get(list_tags))
        .route("/api/v1/tags/:tag_id", put(update_tag))
        .route("/api/v1/tags/:tag_id", patch(update_tag))
        .route("/api/v1/tags/:tag_id", delete(delete_tag))
        // Console routes
        .route("/api/v1/consoles", get(list_consoles))
        .route("/api/v1/consoles/:console_id", put(update_console))
        .route("/api/v1/consoles/:console_id", patch(update_console))
        .route("/api/v1/consoles/:console_id", delete(delete_console))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
