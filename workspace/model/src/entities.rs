//! This file serves as the root for all SeaORM entity modules.
//! We define the data models for the videogame catalog service here:
//! users own videogames, tags and consoles, with many-to-many join
//! tables linking videogames to their tags and consoles.

pub mod console;
pub mod tag;
pub mod user;
pub mod videogame;
pub mod videogame_console;
pub mod videogame_tag;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::console::Entity as Console;
    pub use super::tag::Entity as Tag;
    pub use super::user::Entity as User;
    pub use super::videogame::Entity as Videogame;
    pub use super::videogame_console::Entity as VideogameConsole;
    pub use super::videogame_tag::Entity as VideogameTag;
}

#[cfg(test)]
mod test {
    use migration::{Migrator, MigratorTrait};
    use rust_decimal::Decimal;
    use sea_orm::{
        ActiveModelTrait, ColumnTrait, ConnectionTrait, Database, DatabaseConnection, DbErr,
        EntityTrait, ModelTrait, QueryFilter, Set,
    };

    use super::*;
    use prelude::*;

    async fn setup_db() -> Result<DatabaseConnection, DbErr> {
        let db = Database::connect("sqlite::memory:").await?;

        // Enable foreign keys
        db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;

        Migrator::up(&db, None).await.expect("Migrations failed.");
        Ok(db)
    }

    #[tokio::test]
    async fn test_entity_integration() -> Result<(), DbErr> {
        let db = setup_db().await?;

        // Create users
        let user1 = user::ActiveModel {
            email: Set("user1@example.com".to_string()),
            name: Set("User One".to_string()),
            password_hash: Set("hash1".to_string()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let user2 = user::ActiveModel {
            email: Set("user2@example.com".to_string()),
            name: Set("User Two".to_string()),
            password_hash: Set("hash2".to_string()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Create tags
        let tag1 = tag::ActiveModel {
            name: Set("FPS".to_string()),
            user_id: Set(user1.id),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let tag2 = tag::ActiveModel {
            name: Set("Horror".to_string()),
            user_id: Set(user1.id),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Create a console
        let console1 = console::ActiveModel {
            name: Set("Xbox 360".to_string()),
            user_id: Set(user1.id),
            price: Set(Some(Decimal::new(29999, 2))), // 299.99
            rating: Set(Some(Decimal::new(900, 2))),  // 9.00
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Create videogames
        let game1 = videogame::ActiveModel {
            user_id: Set(user1.id),
            title: Set("Halo 3".to_string()),
            price: Set(Decimal::new(6000, 2)),  // 60.00
            rating: Set(Decimal::new(1000, 2)), // 10.00
            players: Set(4),
            genre: Set("FPS".to_string()),
            description: Set(String::new()),
            link: Set(None),
            image: Set(None),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let game2 = videogame::ActiveModel {
            user_id: Set(user2.id),
            title: Set("Gears of War".to_string()),
            price: Set(Decimal::new(4000, 2)),
            rating: Set(Decimal::new(950, 2)),
            players: Set(2),
            genre: Set("TPS".to_string()),
            description: Set("Cover shooter".to_string()),
            link: Set(None),
            image: Set(None),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Link game1 to tags and a console
        videogame_tag::ActiveModel {
            videogame_id: Set(game1.id),
            tag_id: Set(tag1.id),
        }
        .insert(&db)
        .await?;

        videogame_console::ActiveModel {
            videogame_id: Set(game1.id),
            console_id: Set(console1.id),
        }
        .insert(&db)
        .await?;

        // Verify users
        let users = User::find().all(&db).await?;
        assert_eq!(users.len(), 2);
        assert!(users.iter().any(|u| u.email == "user1@example.com"));

        // Verify ownership columns
        let user1_games = Videogame::find()
            .filter(videogame::Column::UserId.eq(user1.id))
            .all(&db)
            .await?;
        assert_eq!(user1_games.len(), 1);
        assert_eq!(user1_games[0].title, "Halo 3");

        // Verify decimals round-trip exactly
        assert_eq!(user1_games[0].price, Decimal::new(6000, 2));
        assert_eq!(user1_games[0].rating, Decimal::new(1000, 2));

        // Traverse the many-to-many relation from the videogame side
        let game1_tags = game1.find_related(Tag).all(&db).await?;
        assert_eq!(game1_tags.len(), 1);
        assert_eq!(game1_tags[0].id, tag1.id);

        let game1_consoles = game1.find_related(Console).all(&db).await?;
        assert_eq!(game1_consoles.len(), 1);
        assert_eq!(game1_consoles[0].id, console1.id);

        // ...and from the tag side
        let tag1_games = tag1.find_related(Videogame).all(&db).await?;
        assert_eq!(tag1_games.len(), 1);
        assert_eq!(tag1_games[0].id, game1.id);

        // tag2 has no associations
        let tag2_games = tag2.find_related(Videogame).all(&db).await?;
        assert!(tag2_games.is_empty());

        // Deleting a videogame removes join rows but not the tag/console rows
        game1.delete(&db).await?;
        assert!(VideogameTag::find().all(&db).await?.is_empty());
        assert!(VideogameConsole::find().all(&db).await?.is_empty());
        assert_eq!(Tag::find().all(&db).await?.len(), 2);
        assert_eq!(Console::find().all(&db).await?.len(), 1);

        // Deleting a user cascades to everything the user owns
        user1.delete(&db).await?;
        assert!(Tag::find().all(&db).await?.is_empty());
        assert!(Console::find().all(&db).await?.is_empty());
        let remaining = Videogame::find().all(&db).await?;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, game2.id);

        Ok(())
    }
}
