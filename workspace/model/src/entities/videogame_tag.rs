use sea_orm::entity::prelude::*;

use super::{tag, videogame};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "videogames_tags")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub videogame_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub tag_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "videogame::Entity",
        from = "Column::VideogameId",
        to = "videogame::Column::Id",
        on_delete = "Cascade"
    )]
    Videogame,
    #[sea_orm(
        belongs_to = "tag::Entity",
        from = "Column::TagId",
        to = "tag::Column::Id",
        on_delete = "Cascade"
    )]
    Tag,
}

impl Related<videogame::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Videogame.def()
    }
}

impl Related<tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tag.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
