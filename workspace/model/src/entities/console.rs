use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

use super::{user, videogame, videogame_console};

/// A hardware console a videogame can be played on. Like tags, consoles are
/// owned per-user and reconciled by name on attachment.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "consoles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub user_id: i32,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))", nullable)]
    pub price: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((4, 2)))", nullable)]
    pub rating: Option<Decimal>,
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
    #[sea_orm(has_many = "videogame_console::Entity")]
    VideogameConsole,
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<videogame::Entity> for Entity {
    fn to() -> RelationDef {
        videogame_console::Relation::Videogame.def()
    }

    fn via() -> Option<RelationDef> {
        Some(videogame_console::Relation::Console.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
