use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use model::entities::tag;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use utoipa::ToSchema;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::filters::{RelationRowFilter, parse_assigned_only};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Query parameters for the tag list endpoint
#[derive(Debug, Deserialize, ToSchema)]
pub struct TagListQuery {
    /// When truthy (non-zero integer), only tags attached to at least one
    /// videogame are returned.
    pub assigned_only: Option<String>,
}

/// Request structure for updating an existing tag
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateTagRequest {
    pub name: Option<String>,
}

/// Response structure for tag operations
#[derive(Debug, Serialize, ToSchema)]
pub struct TagResponse {
    pub id: i32,
    pub name: String,
}

impl From<tag::Model> for TagResponse {
    fn from(model: tag::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

/// Fetches a tag within the caller's ownership scope. A foreign-owned id
/// is indistinguishable from an absent one.
async fn find_owned_tag(state: &AppState, owner_id: i32, tag_id: i32) -> Result<tag::Model, ApiError> {
    tag::Entity::find_by_id(tag_id)
        .filter(tag::Column::UserId.eq(owner_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Tag not found".to_string()))
}

/// List the caller's tags
#[utoipa::path(
    get,
    path = "/api/v1/tags",
    tag = "tags",
    params(
        ("assigned_only" = Option<String>, Query, description = "Restrict to tags assigned to at least one videogame")
    ),
    responses(
        (status = 200, description = "List of tags", body = ApiResponse<Vec<TagResponse>>),
        (status = 400, description = "Invalid query parameter", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("token" = []))
)]
#[instrument(skip(state, user))]
pub async fn list_tags(
    AuthUser(user): AuthUser,
    Query(query): Query<TagListQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<TagResponse>>>, ApiError> {
    let filter = RelationRowFilter {
        owner_id: user.id,
        assigned_only: parse_assigned_only(query.assigned_only.as_deref())?,
    };

    let tags = filter.tags_select().all(&state.db).await?;
    debug!("Fetched {} tags for user {}", tags.len(), user.id);

    Ok(Json(ApiResponse {
        data: tags.into_iter().map(TagResponse::from).collect(),
        message: "Tags retrieved successfully".to_string(),
        success: true,
    }))
}

/// Update one of the caller's tags
#[utoipa::path(
    patch,
    path = "/api/v1/tags/{tag_id}",
    tag = "tags",
    params(
        ("tag_id" = i32, Path, description = "Tag ID")
    ),
    request_body = UpdateTagRequest,
    responses(
        (status = 200, description = "Tag updated successfully", body = ApiResponse<TagResponse>),
        (status = 400, description = "Invalid request data", body = ErrorResponse),
        (status = 404, description = "Tag not found", body = ErrorResponse)
    ),
    security(("token" = []))
)]
#[instrument(skip(state, user, request))]
pub async fn update_tag(
    AuthUser(user): AuthUser,
    Path(tag_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<UpdateTagRequest>,
) -> Result<Json<ApiResponse<TagResponse>>, ApiError> {
    let existing = find_owned_tag(&state, user.id, tag_id).await?;

    let mut active: tag::ActiveModel = existing.into();
    if let Some(name) = request.name {
        if name.trim().is_empty() {
            return Err(ApiError::Validation(
                "Tag name must not be empty".to_string(),
            ));
        }
        active.name = Set(name);
    }

    let updated = active.update(&state.db).await?;
    info!("Updated tag {} for user {}", tag_id, user.id);

    Ok(Json(ApiResponse {
        data: TagResponse::from(updated),
        message: "Tag updated successfully".to_string(),
        success: true,
    }))
}

/// Delete one of the caller's tags
#[utoipa::path(
    delete,
    path = "/api/v1/tags/{tag_id}",
    tag = "tags",
    params(
        ("tag_id" = i32, Path, description = "Tag ID")
    ),
    responses(
        (status = 200, description = "Tag deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Tag not found", body = ErrorResponse)
    ),
    security(("token" = []))
)]
#[instrument(skip(state, user))]
pub async fn delete_tag(
    AuthUser(user): AuthUser,
    Path(tag_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    let existing = find_owned_tag(&state, user.id, tag_id).await?;
    existing.delete(&state.db).await?;
    info!("Deleted tag {} for user {}", tag_id, user.id);

    Ok(Json(ApiResponse {
        data: format!("Tag with ID {} deleted successfully", tag_id),
        message: "Tag deleted successfully".to_string(),
        success: true,
    }))
}
