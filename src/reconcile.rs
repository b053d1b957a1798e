//! Relation reconciler: resolves client-supplied tag/console descriptors to
//! existing-or-new rows owned by the caller, and replaces a videogame's
//! relation set with exactly the resolved rows.

use std::collections::BTreeSet;

use model::entities::{console, tag, videogame_console, videogame_tag};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::schemas::check_decimal;

/// A nested tag payload on a videogame create/update request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TagDescriptor {
    pub name: String,
}

/// A nested console payload on a videogame create/update request.
/// Price and rating are only used when the descriptor creates a new row;
/// the name is the sole reconciliation key.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConsoleDescriptor {
    pub name: String,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub rating: Option<Decimal>,
}

/// Resolves each tag descriptor to a row owned by `owner_id`, creating rows
/// that do not exist yet. All descriptors are validated before any row is
/// created, so a malformed entry leaves the store untouched.
///
/// Lookup-before-create keyed on (name, user) makes resubmission idempotent;
/// if duplicates ever exist (a concurrent-create race), the first match by id
/// wins.
pub async fn resolve_tags<C: ConnectionTrait>(
    db: &C,
    owner_id: i32,
    descriptors: &[TagDescriptor],
) -> Result<Vec<tag::Model>, ApiError> {
    for descriptor in descriptors {
        if descriptor.name.trim().is_empty() {
            return Err(ApiError::Validation(
                "Tag name must not be empty".to_string(),
            ));
        }
    }

    let mut resolved = Vec::with_capacity(descriptors.len());
    for descriptor in descriptors {
        let existing = tag::Entity::find()
            .filter(tag::Column::UserId.eq(owner_id))
            .filter(tag::Column::Name.eq(descriptor.name.as_str()))
            .order_by_asc(tag::Column::Id)
            .one(db)
            .await?;

        let row = match existing {
            Some(row) => row,
            None => {
                debug!("Creating tag '{}' for user {}", descriptor.name, owner_id);
                tag::ActiveModel {
                    name: Set(descriptor.name.clone()),
                    user_id: Set(owner_id),
                    ..Default::default()
                }
                .insert(db)
                .await?
            }
        };
        resolved.push(row);
    }

    Ok(resolved)
}

/// Console counterpart of [`resolve_tags`]. Matching is by name only; an
/// existing row's price/rating are left as they are even when the descriptor
/// carries different values.
pub async fn resolve_consoles<C: ConnectionTrait>(
    db: &C,
    owner_id: i32,
    descriptors: &[ConsoleDescriptor],
) -> Result<Vec<console::Model>, ApiError> {
    for descriptor in descriptors {
        if descriptor.name.trim().is_empty() {
            return Err(ApiError::Validation(
                "Console name must not be empty".to_string(),
            ));
        }
        if let Some(price) = descriptor.price {
            check_decimal("price", price, 5, 2)?;
        }
        if let Some(rating) = descriptor.rating {
            check_decimal("rating", rating, 4, 2)?;
        }
    }

    let mut resolved = Vec::with_capacity(descriptors.len());
    for descriptor in descriptors {
        let existing = console::Entity::find()
            .filter(console::Column::UserId.eq(owner_id))
            .filter(console::Column::Name.eq(descriptor.name.as_str()))
            .order_by_asc(console::Column::Id)
            .one(db)
            .await?;

        let row = match existing {
            Some(row) => row,
            None => {
                debug!(
                    "Creating console '{}' for user {}",
                    descriptor.name, owner_id
                );
                console::ActiveModel {
                    name: Set(descriptor.name.clone()),
                    user_id: Set(owner_id),
                    price: Set(descriptor.price),
                    rating: Set(descriptor.rating),
                    ..Default::default()
                }
                .insert(db)
                .await?
            }
        };
        resolved.push(row);
    }

    Ok(resolved)
}

/// Replaces the videogame's tag set with exactly the given rows.
/// Duplicate descriptor names resolve to the same row, so ids are collapsed
/// to a set before the join rows are written.
pub async fn set_videogame_tags<C: ConnectionTrait>(
    db: &C,
    videogame_id: i32,
    tags: &[tag::Model],
) -> Result<(), ApiError> {
    videogame_tag::Entity::delete_many()
        .filter(videogame_tag::Column::VideogameId.eq(videogame_id))
        .exec(db)
        .await?;

    let ids: BTreeSet<i32> = tags.iter().map(|t| t.id).collect();
    let rows = ids.into_iter().map(|tag_id| videogame_tag::ActiveModel {
        videogame_id: Set(videogame_id),
        tag_id: Set(tag_id),
    });
    videogame_tag::Entity::insert_many(rows)
        .on_empty_do_nothing()
        .exec(db)
        .await?;

    Ok(())
}

/// Replaces the videogame's console set with exactly the given rows.
pub async fn set_videogame_consoles<C: ConnectionTrait>(
    db: &C,
    videogame_id: i32,
    consoles: &[console::Model],
) -> Result<(), ApiError> {
    videogame_console::Entity::delete_many()
        .filter(videogame_console::Column::VideogameId.eq(videogame_id))
        .exec(db)
        .await?;

    let ids: BTreeSet<i32> = consoles.iter().map(|c| c.id).collect();
    let rows = ids.into_iter().map(|console_id| videogame_console::ActiveModel {
        videogame_id: Set(videogame_id),
        console_id: Set(console_id),
    });
    videogame_console::Entity::insert_many(rows)
        .on_empty_do_nothing()
        .exec(db)
        .await?;

    Ok(())
}
