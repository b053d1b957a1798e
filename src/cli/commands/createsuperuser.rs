use anyhow::{Result, bail};
use model::entities::user::{self, normalize_email};
use sea_orm::{ActiveModelTrait, ColumnTrait, Database, EntityTrait, QueryFilter, Set};
use tracing::info;

use crate::auth::hash_password;

pub async fn create_superuser(email: &str, password: &str, database_url: &str) -> Result<()> {
    if email.trim().is_empty() {
        bail!("User must have an email address");
    }
    if !email.contains('@') {
        bail!("Enter a valid email address");
    }
    if password.len() < 5 {
        bail!("Password must be at least 5 characters");
    }

    let db = Database::connect(database_url).await?;
    let email = normalize_email(email);

    let existing = user::Entity::find()
        .filter(user::Column::Email.eq(email.as_str()))
        .one(&db)
        .await?;
    if existing.is_some() {
        bail!("A user with email '{}' already exists", email);
    }

    let created = user::ActiveModel {
        email: Set(email),
        name: Set(String::new()),
        password_hash: Set(hash_password(password)?),
        api_key: Set(None),
        is_active: Set(true),
        is_staff: Set(true),
        is_superuser: Set(true),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    info!("Superuser created with ID: {}", created.id);
    println!("Superuser '{}' created.", created.email);
    Ok(())
}
