use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::Json,
};
use model::entities::prelude::{Console, Tag, VideogameConsole, VideogameTag};
use model::entities::{console, tag, videogame};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, LoaderTrait, ModelTrait, QueryFilter, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use utoipa::ToSchema;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::filters::VideogameFilter;
use crate::handlers::consoles::ConsoleResponse;
use crate::handlers::tags::TagResponse;
use crate::reconcile::{
    ConsoleDescriptor, TagDescriptor, resolve_consoles, resolve_tags, set_videogame_consoles,
    set_videogame_tags,
};
use crate::schemas::{ApiResponse, AppState, ErrorResponse, check_decimal};
use crate::uploads::{remove_stored_image, store_videogame_image};

/// Query parameters for the videogame list endpoint
#[derive(Debug, Deserialize, ToSchema)]
pub struct VideogameListQuery {
    /// Comma-separated tag ids; matching any of them qualifies
    pub tags: Option<String>,
    /// Comma-separated console ids; matching any of them qualifies
    pub consoles: Option<String>,
}

/// Request structure for creating a new videogame
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateVideogameRequest {
    pub title: String,
    pub price: Decimal,
    pub rating: Decimal,
    pub players: i32,
    pub genre: String,
    /// Defaults to an empty string when omitted
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    /// Nested tag descriptors, reconciled against the caller's tags
    #[serde(default)]
    pub tags: Option<Vec<TagDescriptor>>,
    /// Nested console descriptors, reconciled against the caller's consoles
    #[serde(default)]
    pub consoles: Option<Vec<ConsoleDescriptor>>,
}

/// Request structure for updating an existing videogame. Every field is
/// optional: an absent key leaves the current value (or relation set)
/// untouched, an empty descriptor list clears the relation.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateVideogameRequest {
    pub title: Option<String>,
    pub price: Option<Decimal>,
    pub rating: Option<Decimal>,
    pub players: Option<i32>,
    pub genre: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub tags: Option<Vec<TagDescriptor>>,
    pub consoles: Option<Vec<ConsoleDescriptor>>,
}

/// List-shape response: everything but the free-text description
#[derive(Debug, Serialize, ToSchema)]
pub struct VideogameResponse {
    pub id: i32,
    pub title: String,
    pub price: Decimal,
    pub rating: Decimal,
    pub players: i32,
    pub genre: String,
    pub link: Option<String>,
    pub tags: Vec<TagResponse>,
    pub consoles: Vec<ConsoleResponse>,
}

/// Detail-shape response: adds description and the image reference
#[derive(Debug, Serialize, ToSchema)]
pub struct VideogameDetailResponse {
    pub id: i32,
    pub title: String,
    pub price: Decimal,
    pub rating: Decimal,
    pub players: i32,
    pub genre: String,
    pub description: String,
    pub link: Option<String>,
    pub image: Option<String>,
    pub tags: Vec<TagResponse>,
    pub consoles: Vec<ConsoleResponse>,
}

/// Response for the image upload endpoint
#[derive(Debug, Serialize, ToSchema)]
pub struct VideogameImageResponse {
    pub id: i32,
    pub image: Option<String>,
}

fn summary_response(
    model: videogame::Model,
    tags: Vec<tag::Model>,
    consoles: Vec<console::Model>,
) -> VideogameResponse {
    VideogameResponse {
        id: model.id,
        title: model.title,
        price: model.price,
        rating: model.rating,
        players: model.players,
        genre: model.genre,
        link: model.link,
        tags: tags.into_iter().map(TagResponse::from).collect(),
        consoles: consoles.into_iter().map(ConsoleResponse::from).collect(),
    }
}

fn detail_response(
    model: videogame::Model,
    tags: Vec<tag::Model>,
    consoles: Vec<console::Model>,
) -> VideogameDetailResponse {
    VideogameDetailResponse {
        id: model.id,
        title: model.title,
        price: model.price,
        rating: model.rating,
        players: model.players,
        genre: model.genre,
        description: model.description,
        link: model.link,
        image: model.image,
        tags: tags.into_iter().map(TagResponse::from).collect(),
        consoles: consoles.into_iter().map(ConsoleResponse::from).collect(),
    }
}

/// Fetches a videogame within the caller's ownership scope. Foreign-owned
/// ids collapse to the same not-found outcome as absent ones.
async fn find_owned_videogame(
    state: &AppState,
    owner_id: i32,
    videogame_id: i32,
) -> Result<videogame::Model, ApiError> {
    videogame::Entity::find_by_id(videogame_id)
        .filter(videogame::Column::UserId.eq(owner_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Videogame not found".to_string()))
}

async fn load_detail(
    state: &AppState,
    model: videogame::Model,
) -> Result<VideogameDetailResponse, ApiError> {
    let tags = model.find_related(Tag).all(&state.db).await?;
    let consoles = model.find_related(Console).all(&state.db).await?;
    Ok(detail_response(model, tags, consoles))
}

fn check_videogame_decimals(price: Option<Decimal>, rating: Option<Decimal>) -> Result<(), ApiError> {
    if let Some(price) = price {
        check_decimal("price", price, 5, 2)?;
    }
    if let Some(rating) = rating {
        check_decimal("rating", rating, 4, 2)?;
    }
    Ok(())
}

/// List the caller's videogames
#[utoipa::path(
    get,
    path = "/api/v1/videogames",
    tag = "videogames",
    params(
        ("tags" = Option<String>, Query, description = "Comma-separated tag ids to filter by"),
        ("consoles" = Option<String>, Query, description = "Comma-separated console ids to filter by")
    ),
    responses(
        (status = 200, description = "List of videogames", body = ApiResponse<Vec<VideogameResponse>>),
        (status = 400, description = "Invalid filter parameter", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("token" = []))
)]
#[instrument(skip(state, user))]
pub async fn list_videogames(
    AuthUser(user): AuthUser,
    Query(query): Query<VideogameListQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<VideogameResponse>>>, ApiError> {
    let filter =
        VideogameFilter::from_params(user.id, query.tags.as_deref(), query.consoles.as_deref())?;

    let games = filter.into_select().all(&state.db).await?;
    debug!("Fetched {} videogames for user {}", games.len(), user.id);

    let tags = games.load_many_to_many(Tag, VideogameTag, &state.db).await?;
    let consoles = games
        .load_many_to_many(Console, VideogameConsole, &state.db)
        .await?;

    let data = games
        .into_iter()
        .zip(tags)
        .zip(consoles)
        .map(|((game, game_tags), game_consoles)| summary_response(game, game_tags, game_consoles))
        .collect();

    Ok(Json(ApiResponse {
        data,
        message: "Videogames retrieved successfully".to_string(),
        success: true,
    }))
}

/// Create a new videogame owned by the caller
#[utoipa::path(
    post,
    path = "/api/v1/videogames",
    tag = "videogames",
    request_body = CreateVideogameRequest,
    responses(
        (status = 201, description = "Videogame created successfully", body = ApiResponse<VideogameDetailResponse>),
        (status = 400, description = "Invalid request data", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("token" = []))
)]
#[instrument(skip(state, user, request))]
pub async fn create_videogame(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(request): Json<CreateVideogameRequest>,
) -> Result<(StatusCode, Json<ApiResponse<VideogameDetailResponse>>), ApiError> {
    check_videogame_decimals(Some(request.price), Some(request.rating))?;

    // The entity insert and its relation attachments commit as one unit.
    let txn = state.db.begin().await?;

    // The owner is always the caller; any owner value in the payload is
    // discarded by deserialization.
    let game = videogame::ActiveModel {
        user_id: Set(user.id),
        title: Set(request.title),
        price: Set(request.price),
        rating: Set(request.rating),
        players: Set(request.players),
        genre: Set(request.genre),
        description: Set(request.description.unwrap_or_default()),
        link: Set(request.link),
        image: Set(None),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    if let Some(descriptors) = &request.tags {
        let tags = resolve_tags(&txn, user.id, descriptors).await?;
        set_videogame_tags(&txn, game.id, &tags).await?;
    }
    if let Some(descriptors) = &request.consoles {
        let consoles = resolve_consoles(&txn, user.id, descriptors).await?;
        set_videogame_consoles(&txn, game.id, &consoles).await?;
    }

    txn.commit().await?;
    info!("Created videogame {} for user {}", game.id, user.id);

    let data = load_detail(&state, game).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data,
            message: "Videogame created successfully".to_string(),
            success: true,
        }),
    ))
}

/// Retrieve one of the caller's videogames
#[utoipa::path(
    get,
    path = "/api/v1/videogames/{videogame_id}",
    tag = "videogames",
    params(
        ("videogame_id" = i32, Path, description = "Videogame ID")
    ),
    responses(
        (status = 200, description = "Videogame details", body = ApiResponse<VideogameDetailResponse>),
        (status = 404, description = "Videogame not found", body = ErrorResponse)
    ),
    security(("token" = []))
)]
#[instrument(skip(state, user))]
pub async fn get_videogame(
    AuthUser(user): AuthUser,
    Path(videogame_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<VideogameDetailResponse>>, ApiError> {
    let game = find_owned_videogame(&state, user.id, videogame_id).await?;
    let data = load_detail(&state, game).await?;

    Ok(Json(ApiResponse {
        data,
        message: "Videogame retrieved successfully".to_string(),
        success: true,
    }))
}

/// Update one of the caller's videogames (partial semantics)
#[utoipa::path(
    patch,
    path = "/api/v1/videogames/{videogame_id}",
    tag = "videogames",
    params(
        ("videogame_id" = i32, Path, description = "Videogame ID")
    ),
    request_body = UpdateVideogameRequest,
    responses(
        (status = 200, description = "Videogame updated successfully", body = ApiResponse<VideogameDetailResponse>),
        (status = 400, description = "Invalid request data", body = ErrorResponse),
        (status = 404, description = "Videogame not found", body = ErrorResponse)
    ),
    security(("token" = []))
)]
#[instrument(skip(state, user, request))]
pub async fn update_videogame(
    AuthUser(user): AuthUser,
    Path(videogame_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<UpdateVideogameRequest>,
) -> Result<Json<ApiResponse<VideogameDetailResponse>>, ApiError> {
    let existing = find_owned_videogame(&state, user.id, videogame_id).await?;
    check_videogame_decimals(request.price, request.rating)?;

    let txn = state.db.begin().await?;

    // Scalar fields: only touched when the key is present. The owner is
    // never updatable; an owner value in the payload is silently dropped.
    let mut active: videogame::ActiveModel = existing.into();
    if let Some(title) = request.title {
        active.title = Set(title);
    }
    if let Some(price) = request.price {
        active.price = Set(price);
    }
    if let Some(rating) = request.rating {
        active.rating = Set(rating);
    }
    if let Some(players) = request.players {
        active.players = Set(players);
    }
    if let Some(genre) = request.genre {
        active.genre = Set(genre);
    }
    if let Some(description) = request.description {
        active.description = Set(description);
    }
    if let Some(link) = request.link {
        active.link = Set(Some(link));
    }
    let updated = active.update(&txn).await?;

    // Relation sets: an absent key leaves the set untouched, a present key
    // (empty list included) replaces it with exactly the resolved rows.
    if let Some(descriptors) = &request.tags {
        let tags = resolve_tags(&txn, user.id, descriptors).await?;
        set_videogame_tags(&txn, updated.id, &tags).await?;
    }
    if let Some(descriptors) = &request.consoles {
        let consoles = resolve_consoles(&txn, user.id, descriptors).await?;
        set_videogame_consoles(&txn, updated.id, &consoles).await?;
    }

    txn.commit().await?;
    info!("Updated videogame {} for user {}", videogame_id, user.id);

    let data = load_detail(&state, updated).await?;
    Ok(Json(ApiResponse {
        data,
        message: "Videogame updated successfully".to_string(),
        success: true,
    }))
}

/// Delete one of the caller's videogames
#[utoipa::path(
    delete,
    path = "/api/v1/videogames/{videogame_id}",
    tag = "videogames",
    params(
        ("videogame_id" = i32, Path, description = "Videogame ID")
    ),
    responses(
        (status = 200, description = "Videogame deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Videogame not found", body = ErrorResponse)
    ),
    security(("token" = []))
)]
#[instrument(skip(state, user))]
pub async fn delete_videogame(
    AuthUser(user): AuthUser,
    Path(videogame_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    let existing = find_owned_videogame(&state, user.id, videogame_id).await?;
    let image = existing.image.clone();

    existing.delete(&state.db).await?;
    if let Some(image) = image {
        remove_stored_image(&state.media_root, &image).await;
    }
    info!("Deleted videogame {} for user {}", videogame_id, user.id);

    Ok(Json(ApiResponse {
        data: format!("Videogame with ID {} deleted successfully", videogame_id),
        message: "Videogame deleted successfully".to_string(),
        success: true,
    }))
}

/// Upload an image for one of the caller's videogames
#[utoipa::path(
    post,
    path = "/api/v1/videogames/{videogame_id}/upload-image",
    tag = "videogames",
    params(
        ("videogame_id" = i32, Path, description = "Videogame ID")
    ),
    request_body(content = Vec<u8>, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image stored successfully", body = ApiResponse<VideogameImageResponse>),
        (status = 400, description = "Payload is not a decodable image", body = ErrorResponse),
        (status = 404, description = "Videogame not found", body = ErrorResponse)
    ),
    security(("token" = []))
)]
#[instrument(skip(state, user, multipart))]
pub async fn upload_videogame_image(
    AuthUser(user): AuthUser,
    Path(videogame_id): Path<i32>,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<VideogameImageResponse>>, ApiError> {
    let existing = find_owned_videogame(&state, user.id, videogame_id).await?;

    // Take the first field named "image".
    let mut payload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("Invalid multipart payload: {}", e)))?
    {
        if field.name() == Some("image") {
            let file_name = field.file_name().map(|s| s.to_string());
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::Validation(format!("Invalid multipart payload: {}", e)))?;
            payload = Some((file_name, bytes));
            break;
        }
    }

    let Some((file_name, bytes)) = payload else {
        return Err(ApiError::Validation(
            "Multipart field 'image' is required".to_string(),
        ));
    };

    let relative_path =
        store_videogame_image(&state.media_root, &bytes, file_name.as_deref()).await?;

    let previous = existing.image.clone();
    let mut active: videogame::ActiveModel = existing.into();
    active.image = Set(Some(relative_path));
    let updated = active.update(&state.db).await?;

    // The replaced file is only removed once the new reference is persisted.
    if let Some(previous) = previous {
        remove_stored_image(&state.media_root, &previous).await;
    }
    info!("Stored image for videogame {} of user {}", updated.id, user.id);

    Ok(Json(ApiResponse {
        data: VideogameImageResponse {
            id: updated.id,
            image: updated.image,
        },
        message: "Image uploaded successfully".to_string(),
        success: true,
    }))
}
