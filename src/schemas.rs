use std::path::PathBuf;

use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

use crate::error::ApiError;

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Root directory for stored media files (uploaded images)
    pub media_root: PathBuf,
}

/// API response wrapper
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

/// Error response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// Rejects a decimal value that does not fit the persisted column type:
/// at most `max_digits` significant digits of which `scale` are fractional.
pub fn check_decimal(
    field: &str,
    value: Decimal,
    max_digits: u32,
    scale: u32,
) -> Result<(), ApiError> {
    if value.scale() > scale {
        return Err(ApiError::Validation(format!(
            "Field '{}' must have at most {} decimal places",
            field, scale
        )));
    }
    let limit = Decimal::from(10i64.pow(max_digits - scale));
    if value.abs() >= limit {
        return Err(ApiError::Validation(format!(
            "Field '{}' must have at most {} digits before the decimal point",
            field,
            max_digits - scale
        )));
    }
    Ok(())
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::users::create_user,
        crate::handlers::users::create_token,
        crate::handlers::users::get_me,
        crate::handlers::users::update_me,
        crate::handlers::videogames::list_videogames,
        crate::handlers::videogames::create_videogame,
        crate::handlers::videogames::get_videogame,
        crate::handlers::videogames::update_videogame,
        crate::handlers::videogames::delete_videogame,
        crate::handlers::videogames::upload_videogame_image,
        crate::handlers::tags::list_tags,
        crate::handlers::tags::update_tag,
        crate::handlers::tags::delete_tag,
        crate::handlers::consoles::list_consoles,
        crate::handlers::consoles::update_console,
        crate::handlers::consoles::delete_console,
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            crate::handlers::users::CreateUserRequest,
            crate::handlers::users::CreateTokenRequest,
            crate::handlers::users::UpdateMeRequest,
            crate::handlers::users::UserResponse,
            crate::handlers::users::TokenResponse,
            crate::handlers::videogames::CreateVideogameRequest,
            crate::handlers::videogames::UpdateVideogameRequest,
            crate::handlers::videogames::VideogameResponse,
            crate::handlers::videogames::VideogameDetailResponse,
            crate::handlers::videogames::VideogameImageResponse,
            crate::reconcile::TagDescriptor,
            crate::reconcile::ConsoleDescriptor,
            crate::handlers::tags::UpdateTagRequest,
            crate::handlers::tags::TagResponse,
            crate::handlers::consoles::UpdateConsoleRequest,
            crate::handlers::consoles::ConsoleResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "users", description = "Registration, token issuance and profile management"),
        (name = "videogames", description = "Owner-scoped videogame catalog endpoints"),
        (name = "tags", description = "Owner-scoped tag endpoints"),
        (name = "consoles", description = "Owner-scoped console endpoints"),
    ),
    info(
        title = "GameVault API",
        description = "Multi-user videogame catalog with per-user tags, consoles and image attachments",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;

/// Registers the token security scheme referenced by the protected paths.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "token",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .description(Some("API token, sent as 'Token <key>' or 'Bearer <key>'"))
                        .build(),
                ),
            );
        }
    }
}
