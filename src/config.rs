use anyhow::Result;
use sea_orm::Database;
use std::path::PathBuf;

use crate::schemas::AppState;

/// Initialize application state for an explicit database URL and media root.
pub async fn initialize_app_state(database_url: &str, media_root: &str) -> Result<AppState> {
    tracing::info!("Connecting to database: {}", database_url);
    let db = Database::connect(database_url).await?;

    Ok(AppState {
        db,
        media_root: PathBuf::from(media_root),
    })
}
