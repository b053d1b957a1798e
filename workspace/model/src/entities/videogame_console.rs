use sea_orm::entity::prelude::*;

use super::{console, videogame};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "videogames_consoles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub videogame_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub console_id: i32,
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
        belongs_to = "console::Entity",
        from = "Column::ConsoleId",
        to = "console::Column::Id",
        on_delete = "Cascade"
    )]
    Console,
}

impl Related<videogame::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Videogame.def()
    }
}

impl Related<console::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Console.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
