//! Token authentication: password hashing, API key issuance and the
//! request extractor that resolves `Authorization` headers to a user.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum::{async_trait, extract::FromRequestParts, http::header::AUTHORIZATION, http::request::Parts};
use model::entities::user;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use tracing::debug;
use uuid::Uuid;

use crate::error::ApiError;
use crate::schemas::AppState;

/// Hashes a password into PHC string format.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ApiError::Internal(format!("failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Verifies a password against a stored PHC hash. A malformed stored hash
/// counts as a failed verification rather than an internal error.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// Mints a fresh opaque API key.
pub fn generate_api_key() -> String {
    Uuid::new_v4().simple().to_string()
}

/// The authenticated caller, resolved from the `Authorization` header.
/// Every owner-scoped handler takes this extractor as its first argument,
/// so authentication always runs before any ownership check.
#[derive(Debug, Clone)]
pub struct AuthUser(pub user::Model);

/// Accepts `Authorization: Token <key>` (the scheme API clients use) and
/// `Bearer <key>` as an alias.
fn token_from_header(value: &str) -> Option<&str> {
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    match scheme {
        "Token" | "Bearer" => Some(token),
        _ => None,
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Authentication credentials were not provided".to_string()))?;

        let token = token_from_header(header)
            .ok_or_else(|| ApiError::Unauthorized("Invalid authorization header".to_string()))?;

        let found = user::Entity::find()
            .filter(user::Column::ApiKey.eq(token))
            .filter(user::Column::IsActive.eq(true))
            .one(&state.db)
            .await?;

        match found {
            Some(user) => {
                debug!("Authenticated request for user {}", user.id);
                Ok(AuthUser(user))
            }
            None => Err(ApiError::Unauthorized("Invalid token".to_string())),
        }
    }
}
