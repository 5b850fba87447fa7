use sea_orm_migration::prelude::*;

use crate::m20240101_000001_create_players_table::Players;
use crate::m20240101_000002_create_words_table::Words;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Games::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Games::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Games::PlayerId).uuid().not_null())
                    .col(ColumnDef::new(Games::WordId).integer().not_null())
                    .col(
                        ColumnDef::new(Games::Status)
                            .string_len(16)
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(Games::NumGuesses)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Games::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Games::CompletedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_games_player")
                            .from(Games::Table, Games::PlayerId)
                            .to(Players::Table, Players::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_games_word")
                            .from(Games::Table, Games::WordId)
                            .to(Words::Table, Words::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // History lookups for word selection and stats
        manager
            .create_index(
                Index::create()
                    .name("idx_games_player_created")
                    .table(Games::Table)
                    .col(Games::PlayerId)
                    .col(Games::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // At most one active game per player (partial index, raw SQL)
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_games_one_active_per_player \
                 ON games (player_id) WHERE status = 'active'",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Games::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Games {
    Table,
    Id,
    PlayerId,
    WordId,
    Status,
    NumGuesses,
    CreatedAt,
    CompletedAt,
}
