use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use model::entities::console;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use utoipa::ToSchema;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::filters::{RelationRowFilter, parse_assigned_only};
use crate::schemas::{ApiResponse, AppState, ErrorResponse, check_decimal};

/// Query parameters for the console list endpoint
#[derive(Debug, Deserialize, ToSchema)]
pub struct ConsoleListQuery {
    /// When truthy (non-zero integer), only consoles attached to at least
    /// one videogame are returned.
    pub assigned_only: Option<String>,
}

/// Request structure for updating an existing console
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateConsoleRequest {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub rating: Option<Decimal>,
}

/// Response structure for console operations
#[derive(Debug, Serialize, ToSchema)]
pub struct ConsoleResponse {
    pub id: i32,
    pub name: String,
    pub price: Option<Decimal>,
    pub rating: Option<Decimal>,
}

impl From<console::Model> for ConsoleResponse {
    fn from(model: console::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            price: model.price,
            rating: model.rating,
        }
    }
}

async fn find_owned_console(
    state: &AppState,
    owner_id: i32,
    console_id: i32,
) -> Result<console::Model, ApiError> {
    console::Entity::find_by_id(console_id)
        .filter(console::Column::UserId.eq(owner_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Console not found".to_string()))
}

/// List the caller's consoles
#[utoipa::path(
    get,
    path = "/api/v1/consoles",
    tag = "consoles",
    params(
        ("assigned_only" = Option<String>, Query, description = "Restrict to consoles assigned to at least one videogame")
    ),
    responses(
        (status = 200, description = "List of consoles", body = ApiResponse<Vec<ConsoleResponse>>),
        (status = 400, description = "Invalid query parameter", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("token" = []))
)]
#[instrument(skip(state, user))]
pub async fn list_consoles(
    AuthUser(user): AuthUser,
    Query(query): Query<ConsoleListQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ConsoleResponse>>>, ApiError> {
    let filter = RelationRowFilter {
        owner_id: user.id,
        assigned_only: parse_assigned_only(query.assigned_only.as_deref())?,
    };

    let consoles = filter.consoles_select().all(&state.db).await?;
    debug!("Fetched {} consoles for user {}", consoles.len(), user.id);

    Ok(Json(ApiResponse {
        data: consoles.into_iter().map(ConsoleResponse::from).collect(),
        message: "Consoles retrieved successfully".to_string(),
        success: true,
    }))
}

/// Update one of the caller's consoles
#[utoipa::path(
    patch,
    path = "/api/v1/consoles/{console_id}",
    tag = "consoles",
    params(
        ("console_id" = i32, Path, description = "Console ID")
    ),
    request_body = UpdateConsoleRequest,
    responses(
        (status = 200, description = "Console updated successfully", body = ApiResponse<ConsoleResponse>),
        (status = 400, description = "Invalid request data", body = ErrorResponse),
        (status = 404, description = "Console not found", body = ErrorResponse)
    ),
    security(("token" = []))
)]
#[instrument(skip(state, user, request))]
pub async fn update_console(
    AuthUser(user): AuthUser,
    Path(console_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<UpdateConsoleRequest>,
) -> Result<Json<ApiResponse<ConsoleResponse>>, ApiError> {
    let existing = find_owned_console(&state, user.id, console_id).await?;

    let mut active: console::ActiveModel = existing.into();
    if let Some(name) = request.name {
        if name.trim().is_empty() {
            return Err(ApiError::Validation(
                "Console name must not be empty".to_string(),
            ));
        }
        active.name = Set(name);
    }
    if let Some(price) = request.price {
        check_decimal("price", price, 5, 2)?;
        active.price = Set(Some(price));
    }
    if let Some(rating) = request.rating {
        check_decimal("rating", rating, 4, 2)?;
        active.rating = Set(Some(rating));
    }

    let updated = active.update(&state.db).await?;
    info!("Updated console {} for user {}", console_id, user.id);

    Ok(Json(ApiResponse {
        data: ConsoleResponse::from(updated),
        message: "Console updated successfully".to_string(),
        success: true,
    }))
}

/// Delete one of the caller's consoles
#[utoipa::path(
    delete,
    path = "/api/v1/consoles/{console_id}",
    tag = "consoles",
    params(
        ("console_id" = i32, Path, description = "Console ID")
    ),
    responses(
        (status = 200, description = "Console deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Console not found", body = ErrorResponse)
    ),
    security(("token" = []))
)]
#[instrument(skip(state, user))]
pub async fn delete_console(
    AuthUser(user): AuthUser,
    Path(console_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    let existing = find_owned_console(&state, user.id, console_id).await?;
    existing.delete(&state.db).await?;
    info!("Deleted console {} for user {}", console_id, user.id);

    Ok(Json(ApiResponse {
        data: format!("Console with ID {} deleted successfully", console_id),
        message: "Console deleted successfully".to_string(),
        success: true,
    }))
}
