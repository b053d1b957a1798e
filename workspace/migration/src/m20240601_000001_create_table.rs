use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string(Users::Email).unique_key())
                    .col(string(Users::Name))
                    .col(string(Users::PasswordHash))
                    .col(string_null(Users::ApiKey).unique_key())
                    .col(boolean(Users::IsActive).default(true))
                    .col(boolean(Users::IsStaff).default(false))
                    .col(boolean(Users::IsSuperuser).default(false))
                    .to_owned(),
            )
            .await?;

        // Create tags table
        manager
            .create_table(
                Table::create()
                    .table(Tags::Table)
                    .if_not_exists()
                    .col(pk_auto(Tags::Id))
                    .col(string(Tags::Name))
                    .col(integer(Tags::UserId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tag_user")
                            .from(Tags::Table, Tags::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create consoles table
        manager
            .create_table(
                Table::create()
                    .table(Consoles::Table)
                    .if_not_exists()
                    .col(pk_auto(Consoles::Id))
                    .col(string(Consoles::Name))
                    .col(integer(Consoles::UserId))
                    .col(decimal_len_null(Consoles::Price, 5, 2))
                    .col(decimal_len_null(Consoles::Rating, 4, 2))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_console_user")
                            .from(Consoles::Table, Consoles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create videogames table
        manager
            .create_table(
                Table::create()
                    .table(Videogames::Table)
                    .if_not_exists()
                    .col(pk_auto(Videogames::Id))
                    .col(integer(Videogames::UserId))
                    .col(string(Videogames::Title))
                    .col(decimal_len(Videogames::Price, 5, 2))
                    .col(decimal_len(Videogames::Rating, 4, 2))
                    .col(integer(Videogames::Players))
                    .col(string(Videogames::Genre))
                    .col(text(Videogames::Description).default(""))
                    .col(string_null(Videogames::Link))
                    .col(string_null(Videogames::Image))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_videogame_user")
                            .from(Videogames::Table, Videogames::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create videogames_tags table (join table)
        manager
            .create_table(
                Table::create()
                    .table(VideogamesTags::Table)
                    .if_not_exists()
                    .col(integer(VideogamesTags::VideogameId))
                    .col(integer(VideogamesTags::TagId))
                    .primary_key(
                        Index::create()
                            .name("pk_videogames_tags")
                            .col(VideogamesTags::VideogameId)
                            .col(VideogamesTags::TagId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_videogames_tags_videogame")
                            .from(VideogamesTags::Table, VideogamesTags::VideogameId)
                            .to(Videogames::Table, Videogames::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_videogames_tags_tag")
                            .from(VideogamesTags::Table, VideogamesTags::TagId)
                            .to(Tags::Table, Tags::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create videogames_consoles table (join table)
        manager
            .create_table(
                Table::create()
                    .table(VideogamesConsoles::Table)
                    .if_not_exists()
                    .col(integer(VideogamesConsoles::VideogameId))
                    .col(integer(VideogamesConsoles::ConsoleId))
                    .primary_key(
                        Index::create()
                            .name("pk_videogames_consoles")
                            .col(VideogamesConsoles::VideogameId)
                            .col(VideogamesConsoles::ConsoleId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_videogames_consoles_videogame")
                            .from(VideogamesConsoles::Table, VideogamesConsoles::VideogameId)
                            .to(Videogames::Table, Videogames::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_videogames_consoles_console")
                            .from(VideogamesConsoles::Table, VideogamesConsoles::ConsoleId)
                            .to(Consoles::Table, Consoles::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(VideogamesConsoles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(VideogamesTags::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Videogames::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Consoles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tags::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    Name,
    PasswordHash,
    ApiKey,
    IsActive,
    IsStaff,
    IsSuperuser,
}

#[derive(DeriveIden)]
enum Tags {
    Table,
    Id,
    Name,
    UserId,
}

#[derive(DeriveIden)]
enum Consoles {
    Table,
    Id,
    Name,
    UserId,
    Price,
    Rating,
}

#[derive(DeriveIden)]
enum Videogames {
    Table,
    Id,
    UserId,
    Title,
    Price,
    Rating,
    Players,
    Genre,
    Description,
    Link,
    Image,
}

#[derive(DeriveIden)]
enum VideogamesTags {
    Table,
    VideogameId,
    TagId,
}

#[derive(DeriveIden)]
enum VideogamesConsoles {
    Table,
    VideogameId,
    ConsoleId,
}
