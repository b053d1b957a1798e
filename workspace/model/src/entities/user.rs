use sea_orm::entity::prelude::*;

/// Represents a user of the system. Users authenticate by email and own
/// all of their videogames, tags and consoles.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Normalized email address, the login identifier.
    #[sea_orm(unique)]
    pub email: String,
    pub name: String,
    /// Argon2 PHC-format hash of the user's password.
    pub password_hash: String,
    /// Opaque API token credential, minted on first token request.
    #[sea_orm(unique)]
    pub api_key: Option<String>,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::videogame::Entity")]
    Videogame,
    #[sea_orm(has_many = "super::tag::Entity")]
    Tag,
    #[sea_orm(has_many = "super::console::Entity")]
    Console,
}

impl Related<super::videogame::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Videogame.def()
    }
}

impl Related<super::tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tag.def()
    }
}

impl Related<super::console::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Console.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Normalizes an email address the way the registration endpoint expects:
/// surrounding whitespace is trimmed and the domain part is lowercased.
/// The local part is preserved as given.
pub fn normalize_email(email: &str) -> String {
    let email = email.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
        None => email.to_string(),
    }
}
