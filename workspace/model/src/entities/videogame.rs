use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

use super::{console, tag, user, videogame_console, videogame_tag};

/// A videogame record in a user's personal catalog.
/// The owner is fixed at creation time and never changes afterwards.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "videogames")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// The user that owns this record. All reads and writes are scoped to it.
    pub user_id: i32,
    pub title: String,
    /// Retail price, 3 integer digits and 2 fractional digits.
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub price: Decimal,
    /// Review rating, 2 integer digits and 2 fractional digits.
    #[sea_orm(column_type = "Decimal(Some((4, 2)))")]
    pub rating: Decimal,
    pub players: i32,
    pub genre: String,
    /// Free-text description. Empty string when not provided, never NULL.
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub link: Option<String>,
    /// Relative path of the uploaded image under the media root.
    pub image: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "user::Entity",
        from = "Column::UserId",
        to = "user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "videogame_tag::Entity")]
    VideogameTag,
    #[sea_orm(has_many = "videogame_console::Entity")]
    VideogameConsole,
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<tag::Entity> for Entity {
    fn to() -> RelationDef {
        videogame_tag::Relation::Tag.def()
    }

    fn via() -> Option<RelationDef> {
        Some(videogame_tag::Relation::Videogame.def().rev())
    }
}

impl Related<console::Entity> for Entity {
    fn to() -> RelationDef {
        videogame_console::Relation::Console.def()
    }

    fn via() -> Option<RelationDef> {
        Some(videogame_console::Relation::Videogame.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
