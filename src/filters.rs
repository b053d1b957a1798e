//! Query filter engine: turns raw filter parameters into owner-scoped
//! SeaORM selects with a fixed predicate order and de-duplicated results.

use std::collections::BTreeSet;

use model::entities::{console, tag, videogame, videogame_console, videogame_tag};
use sea_orm::{
    ColumnTrait, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select,
};

use crate::error::ApiError;

/// Parses a comma-separated list of relation-row ids into a set.
/// Any non-numeric token fails the whole parameter.
pub fn parse_id_list(param: &str, raw: &str) -> Result<BTreeSet<i32>, ApiError> {
    raw.split(',')
        .map(|token| {
            token.trim().parse::<i32>().map_err(|_| {
                ApiError::Validation(format!(
                    "Invalid value '{}' in '{}' filter, expected a comma-separated list of ids",
                    token, param
                ))
            })
        })
        .collect()
}

/// Parses the int-ish `assigned_only` flag: any non-zero value is truthy.
pub fn parse_assigned_only(raw: Option<&str>) -> Result<bool, ApiError> {
    match raw {
        None => Ok(false),
        Some(token) => token.trim().parse::<i64>().map(|v| v != 0).map_err(|_| {
            ApiError::Validation(format!(
                "Invalid value '{}' for 'assigned_only', expected an integer",
                token
            ))
        }),
    }
}

/// Filter specification for the videogame list endpoint. Predicates are
/// applied in a fixed order: ownership, then tag membership, then console
/// membership, with a final DISTINCT to collapse join duplicates.
#[derive(Debug, Clone)]
pub struct VideogameFilter {
    pub owner_id: i32,
    pub tag_ids: Option<BTreeSet<i32>>,
    pub console_ids: Option<BTreeSet<i32>>,
}

impl VideogameFilter {
    pub fn from_params(
        owner_id: i32,
        tags: Option<&str>,
        consoles: Option<&str>,
    ) -> Result<Self, ApiError> {
        let tag_ids = tags.map(|raw| parse_id_list("tags", raw)).transpose()?;
        let console_ids = consoles
            .map(|raw| parse_id_list("consoles", raw))
            .transpose()?;
        Ok(Self {
            owner_id,
            tag_ids,
            console_ids,
        })
    }

    /// Builds the scoped select. Each provided id set is an independent
    /// "has at least one matching relation row" predicate; multiple sets
    /// combine with AND. Results are ordered by descending id.
    pub fn into_select(self) -> Select<videogame::Entity> {
        let mut select =
            videogame::Entity::find().filter(videogame::Column::UserId.eq(self.owner_id));

        if let Some(tag_ids) = self.tag_ids {
            select = select
                .join_rev(JoinType::InnerJoin, videogame_tag::Relation::Videogame.def())
                .filter(videogame_tag::Column::TagId.is_in(tag_ids));
        }

        if let Some(console_ids) = self.console_ids {
            select = select
                .join_rev(
                    JoinType::InnerJoin,
                    videogame_console::Relation::Videogame.def(),
                )
                .filter(videogame_console::Column::ConsoleId.is_in(console_ids));
        }

        select.distinct().order_by_desc(videogame::Column::Id)
    }
}

/// Filter specification shared by the tag and console list endpoints.
#[derive(Debug, Clone, Copy)]
pub struct RelationRowFilter {
    pub owner_id: i32,
    /// When set, only rows attached to at least one videogame are returned.
    pub assigned_only: bool,
}

impl RelationRowFilter {
    pub fn tags_select(self) -> Select<tag::Entity> {
        let mut select = tag::Entity::find().filter(tag::Column::UserId.eq(self.owner_id));
        if self.assigned_only {
            select = select.join_rev(JoinType::InnerJoin, videogame_tag::Relation::Tag.def());
        }
        select.distinct().order_by_desc(tag::Column::Name)
    }

    pub fn consoles_select(self) -> Select<console::Entity> {
        let mut select = console::Entity::find().filter(console::Column::UserId.eq(self.owner_id));
        if self.assigned_only {
            select = select.join_rev(
                JoinType::InnerJoin,
                videogame_console::Relation::Console.def(),
            );
        }
        select.distinct().order_by_desc(console::Column::Name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{Migrator, MigratorTrait};
    use model::entities::user;
    use rust_decimal::Decimal;
    use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};

    async fn setup_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");
        db
    }

    async fn create_user(db: &DatabaseConnection, email: &str) -> user::Model {
        user::ActiveModel {
            email: Set(email.to_string()),
            name: Set("Test".to_string()),
            password_hash: Set("hash".to_string()),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap()
    }

    async fn create_videogame(db: &DatabaseConnection, user_id: i32, title: &str) -> videogame::Model {
        videogame::ActiveModel {
            user_id: Set(user_id),
            title: Set(title.to_string()),
            price: Set(Decimal::new(6000, 2)),
            rating: Set(Decimal::new(1000, 2)),
            players: Set(4),
            genre: Set("FPS".to_string()),
            description: Set(String::new()),
            link: Set(None),
            image: Set(None),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap()
    }

    async fn create_tag(db: &DatabaseConnection, user_id: i32, name: &str) -> tag::Model {
        tag::ActiveModel {
            name: Set(name.to_string()),
            user_id: Set(user_id),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap()
    }

    async fn attach_tag(db: &DatabaseConnection, videogame_id: i32, tag_id: i32) {
        videogame_tag::ActiveModel {
            videogame_id: Set(videogame_id),
            tag_id: Set(tag_id),
        }
        .insert(db)
        .await
        .unwrap();
    }

    #[test]
    fn test_parse_id_list() {
        let ids = parse_id_list("tags", "3,1, 2").unwrap();
        assert_eq!(ids.into_iter().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_parse_id_list_rejects_non_numeric_token() {
        assert!(parse_id_list("tags", "1,apple,3").is_err());
        assert!(parse_id_list("consoles", "").is_err());
    }

    #[test]
    fn test_parse_assigned_only() {
        assert!(!parse_assigned_only(None).unwrap());
        assert!(!parse_assigned_only(Some("0")).unwrap());
        assert!(parse_assigned_only(Some("1")).unwrap());
        assert!(parse_assigned_only(Some("2")).unwrap());
        assert!(parse_assigned_only(Some("yes")).is_err());
    }

    #[tokio::test]
    async fn test_videogame_filter_or_within_one_field() {
        let db = setup_db().await;
        let user = create_user(&db, "filter1@example.com").await;
        let game_a = create_videogame(&db, user.id, "A").await;
        let game_b = create_videogame(&db, user.id, "B").await;
        let tag1 = create_tag(&db, user.id, "tag1").await;
        let tag2 = create_tag(&db, user.id, "tag2").await;
        attach_tag(&db, game_a.id, tag1.id).await;
        attach_tag(&db, game_b.id, tag2.id).await;

        let filter = VideogameFilter::from_params(
            user.id,
            Some(&format!("{},{}", tag1.id, tag2.id)),
            None,
        )
        .unwrap();
        let results = filter.into_select().all(&db).await.unwrap();

        // Both games match (OR within one filter field), newest id first.
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, game_b.id);
        assert_eq!(results[1].id, game_a.id);
    }

    #[tokio::test]
    async fn test_videogame_filter_deduplicates_multi_tag_matches() {
        let db = setup_db().await;
        let user = create_user(&db, "filter2@example.com").await;
        let game = create_videogame(&db, user.id, "Multi").await;
        let tag1 = create_tag(&db, user.id, "tag1").await;
        let tag2 = create_tag(&db, user.id, "tag2").await;
        attach_tag(&db, game.id, tag1.id).await;
        attach_tag(&db, game.id, tag2.id).await;

        let filter = VideogameFilter::from_params(
            user.id,
            Some(&format!("{},{}", tag1.id, tag2.id)),
            None,
        )
        .unwrap();
        let results = filter.into_select().all(&db).await.unwrap();

        // Matches via two join rows but appears exactly once.
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, game.id);
    }

    #[tokio::test]
    async fn test_videogame_filter_and_across_fields() {
        let db = setup_db().await;
        let user = create_user(&db, "filter3@example.com").await;
        let game_tagged = create_videogame(&db, user.id, "Tagged").await;
        let game_both = create_videogame(&db, user.id, "Both").await;
        let tag = create_tag(&db, user.id, "tag").await;
        attach_tag(&db, game_tagged.id, tag.id).await;
        attach_tag(&db, game_both.id, tag.id).await;

        let console = console::ActiveModel {
            name: Set("Xbox".to_string()),
            user_id: Set(user.id),
            price: Set(None),
            rating: Set(None),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();
        videogame_console::ActiveModel {
            videogame_id: Set(game_both.id),
            console_id: Set(console.id),
        }
        .insert(&db)
        .await
        .unwrap();

        let filter = VideogameFilter::from_params(
            user.id,
            Some(&tag.id.to_string()),
            Some(&console.id.to_string()),
        )
        .unwrap();
        let results = filter.into_select().all(&db).await.unwrap();

        // Only the game matching both filters survives the AND.
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, game_both.id);
    }

    #[tokio::test]
    async fn test_videogame_filter_never_crosses_owners() {
        let db = setup_db().await;
        let user1 = create_user(&db, "owner1@example.com").await;
        let user2 = create_user(&db, "owner2@example.com").await;
        let game2 = create_videogame(&db, user2.id, "Theirs").await;
        let tag2 = create_tag(&db, user2.id, "theirs").await;
        attach_tag(&db, game2.id, tag2.id).await;

        // Filtering by another user's tag id yields nothing for user1.
        let filter =
            VideogameFilter::from_params(user1.id, Some(&tag2.id.to_string()), None).unwrap();
        let results = filter.into_select().all(&db).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_assigned_only_excludes_orphans_and_deduplicates() {
        let db = setup_db().await;
        let user = create_user(&db, "assigned@example.com").await;
        let game_a = create_videogame(&db, user.id, "A").await;
        let game_b = create_videogame(&db, user.id, "B").await;
        let used = create_tag(&db, user.id, "used").await;
        let orphan = create_tag(&db, user.id, "orphan").await;
        attach_tag(&db, game_a.id, used.id).await;
        attach_tag(&db, game_b.id, used.id).await;

        let all = RelationRowFilter {
            owner_id: user.id,
            assigned_only: false,
        }
        .tags_select()
        .all(&db)
        .await
        .unwrap();
        assert_eq!(all.len(), 2);
        // Descending name order.
        assert_eq!(all[0].id, used.id);
        assert_eq!(all[1].id, orphan.id);

        let assigned = RelationRowFilter {
            owner_id: user.id,
            assigned_only: true,
        }
        .tags_select()
        .all(&db)
        .await
        .unwrap();
        // The orphan disappears; the used tag appears once despite two joins.
        assert_eq!(assigned.len(), 1);
        assert_eq!(assigned[0].id, used.id);
    }
}
