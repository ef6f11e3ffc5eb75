use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Movie::Table)
                    .if_not_exists()
                    .col(pk_auto(Movie::MovieId))
                    .col(string(Movie::Title))
                    .col(string(Movie::Director))
                    .col(string(Movie::Studio))
                    .col(json(Movie::MovieCast))
                    .col(integer(Movie::ReleaseYear))
                    .col(string_uniq(Movie::Poster))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Movie::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Movie {
    Table,
    MovieId,
    Title,
    Director,
    Studio,
    MovieCast,
    ReleaseYear,
    Poster,
}
