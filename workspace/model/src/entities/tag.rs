use sea_orm::entity::prelude::*;

use super::{user, videogame, videogame_tag};

/// A tag for filtering videogames. Tags are private to their owning user;
/// (name, user) is not enforced unique at the store level, the reconciler
/// matches on it best-effort instead.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tags")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub user_id: i32,
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
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<videogame::Entity> for Entity {
    fn to() -> RelationDef {
        videogame_tag::Relation::Videogame.def()
    }

    fn via() -> Option<RelationDef> {
        Some(videogame_tag::Relation::Tag.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
