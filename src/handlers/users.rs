use axum::{extract::State, http::StatusCode, response::Json};
use model::entities::user::{self, normalize_email};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use utoipa::ToSchema;

use crate::auth::{AuthUser, generate_api_key, hash_password, verify_password};
use crate::error::ApiError;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

const MIN_PASSWORD_LEN: usize = 5;

/// Request body for registering a new user
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateUserRequest {
    /// Email address (unique login identifier)
    pub email: String,
    /// Display name
    pub name: String,
    /// Password, at least 5 characters
    pub password: String,
}

/// Request body for issuing an API token
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateTokenRequest {
    pub email: String,
    pub password: String,
}

/// Request body for updating the caller's own profile
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateMeRequest {
    pub name: Option<String>,
    pub password: Option<String>,
}

/// User response model
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
    pub name: String,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            name: model.name,
        }
    }
}

/// Token response model
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

fn validate_credentials(email: &str, password: &str) -> Result<(), ApiError> {
    if email.trim().is_empty() {
        return Err(ApiError::Validation(
            "User must have an email address".to_string(),
        ));
    }
    if !email.contains('@') {
        return Err(ApiError::Validation(
            "Enter a valid email address".to_string(),
        ));
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created successfully", body = ApiResponse<UserResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), ApiError> {
    validate_credentials(&request.email, &request.password)?;
    let email = normalize_email(&request.email);
    debug!("Registering user with email: {}", email);

    let existing = user::Entity::find()
        .filter(user::Column::Email.eq(email.as_str()))
        .one(&state.db)
        .await?;
    if existing.is_some() {
        warn!("Registration rejected, email already taken: {}", email);
        return Err(ApiError::Validation(
            "A user with this email already exists".to_string(),
        ));
    }

    let new_user = user::ActiveModel {
        email: Set(email),
        name: Set(request.name),
        password_hash: Set(hash_password(&request.password)?),
        api_key: Set(None),
        is_active: Set(true),
        is_staff: Set(false),
        is_superuser: Set(false),
        ..Default::default()
    };

    let user_model = new_user.insert(&state.db).await?;
    info!("User created successfully with ID: {}", user_model.id);

    let response = ApiResponse {
        data: UserResponse::from(user_model),
        message: "User created successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Issue an API token for a user
#[utoipa::path(
    post,
    path = "/api/v1/users/token",
    tag = "users",
    request_body = CreateTokenRequest,
    responses(
        (status = 200, description = "Token issued", body = ApiResponse<TokenResponse>),
        (status = 400, description = "Invalid credentials", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn create_token(
    State(state): State<AppState>,
    Json(request): Json<CreateTokenRequest>,
) -> Result<Json<ApiResponse<TokenResponse>>, ApiError> {
    let email = normalize_email(&request.email);
    debug!("Token requested for email: {}", email);

    let found = user::Entity::find()
        .filter(user::Column::Email.eq(email.as_str()))
        .filter(user::Column::IsActive.eq(true))
        .one(&state.db)
        .await?;

    let Some(user_model) = found else {
        warn!("Token request for unknown email");
        return Err(ApiError::Validation(
            "Unable to authenticate with provided credentials".to_string(),
        ));
    };

    if !verify_password(&request.password, &user_model.password_hash) {
        warn!("Token request with wrong password for user {}", user_model.id);
        return Err(ApiError::Validation(
            "Unable to authenticate with provided credentials".to_string(),
        ));
    }

    // The token is minted once and reused on subsequent requests.
    let token = match &user_model.api_key {
        Some(key) => key.clone(),
        None => {
            let key = generate_api_key();
            let mut active: user::ActiveModel = user_model.into();
            active.api_key = Set(Some(key.clone()));
            active.update(&state.db).await?;
            key
        }
    };

    Ok(Json(ApiResponse {
        data: TokenResponse { token },
        message: "Token issued successfully".to_string(),
        success: true,
    }))
}

/// Retrieve the caller's own profile
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    tag = "users",
    responses(
        (status = 200, description = "Profile retrieved", body = ApiResponse<UserResponse>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("token" = []))
)]
#[instrument(skip_all)]
pub async fn get_me(AuthUser(user): AuthUser) -> Json<ApiResponse<UserResponse>> {
    Json(ApiResponse {
        data: UserResponse::from(user),
        message: "Profile retrieved successfully".to_string(),
        success: true,
    })
}

/// Update the caller's own profile (partial)
#[utoipa::path(
    patch,
    path = "/api/v1/users/me",
    tag = "users",
    request_body = UpdateMeRequest,
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<UserResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("token" = []))
)]
#[instrument(skip_all)]
pub async fn update_me(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(request): Json<UpdateMeRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    if let Some(password) = &request.password {
        if password.len() < MIN_PASSWORD_LEN {
            return Err(ApiError::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
    }

    let user_id = user.id;
    let mut active: user::ActiveModel = user.into();
    if let Some(name) = request.name {
        active.name = Set(name);
    }
    if let Some(password) = request.password {
        active.password_hash = Set(hash_password(&password)?);
    }

    let updated = active.update(&state.db).await?;
    info!("User {} updated their profile", user_id);

    Ok(Json(ApiResponse {
        data: UserResponse::from(updated),
        message: "Profile updated successfully".to_string(),
        success: true,
    }))
}
