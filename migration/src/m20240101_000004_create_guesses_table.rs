use sea_orm_migration::prelude::*;

use crate::m20240101_000003_create_games_table::Games;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // One row per (game_id, guess_number)
        manager
            .create_table(
                Table::create()
                    .table(Guesses::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Guesses::GameId).uuid().not_null())
                    .col(ColumnDef::new(Guesses::GuessNumber).integer().not_null())
                    .col(ColumnDef::new(Guesses::GuessWord).string_len(5).not_null())
                    .col(ColumnDef::new(Guesses::ResultPattern).string_len(5).not_null())
                    .col(
                        ColumnDef::new(Guesses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(Guesses::GameId)
                            .col(Guesses::GuessNumber),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_guesses_game")
                            .from(Guesses::Table, Guesses::GameId)
                            .to(Games::Table, Games::Id),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Guesses::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Guesses {
    Table,
    GameId,
    GuessNumber,
    GuessWord,
    ResultPattern,
    CreatedAt,
}
