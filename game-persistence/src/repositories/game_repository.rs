use std::collections::{HashMap, HashSet};

use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, TransactionTrait, sea_query::Expr,
};
use tracing::{debug, info, warn};

use super::{PlayerRepository, WordRepository, is_unique_violation};
use crate::entities::{games, guesses, prelude::*};
use game_core::{CompletedGame, Game, GuessOutcome, PlayerHistory, WordBank};
use game_types::{Feedback, GameId, GameStatus, GuessRecord, PlayerId, Word};

/// A game together with its guesses, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct GameWithGuesses {
    pub game: Game,
    pub guesses: Vec<GuessRecord>,
}

/// Result of asking for a game: either a fresh one or the player's
/// unfinished one.
#[derive(Debug, Clone, PartialEq)]
pub enum StartedGame {
    Created(GameWithGuesses),
    Resumed(GameWithGuesses),
}

impl StartedGame {
    pub fn is_new(&self) -> bool {
        matches!(self, StartedGame::Created(_))
    }

    pub fn into_inner(self) -> GameWithGuesses {
        match self {
            StartedGame::Created(inner) | StartedGame::Resumed(inner) => inner,
        }
    }
}

pub struct GameRepository {
    db: DatabaseConnection,
}

impl GameRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_game(model: games::Model, target: &str) -> Result<Game> {
        let target = Word::parse(target)
            .with_context(|| format!("Game {} has invalid target {:?}", model.id, target))?;
        let status: GameStatus = model.status.parse().map_err(|e: String| anyhow!(e))?;
        let num_guesses = u8::try_from(model.num_guesses)?;

        let game = Game::restore(
            model.id,
            model.player_id,
            target,
            status,
            num_guesses,
            model.created_at.with_timezone(&Utc),
            model.completed_at.map(|t| t.with_timezone(&Utc)),
        )?;
        Ok(game)
    }

    fn model_to_guess(model: guesses::Model) -> Result<GuessRecord> {
        let guess = Word::parse(&model.guess_word)
            .with_context(|| format!("Game {} has invalid guess", model.game_id))?;
        let result = Feedback::from_pattern(&guess, &model.result_pattern).ok_or_else(|| {
            anyhow!(
                "Guess {} of game {} has malformed result {:?}",
                model.guess_number,
                model.game_id,
                model.result_pattern
            )
        })?;

        Ok(GuessRecord {
            guess,
            guess_number: u8::try_from(model.guess_number)?,
            result,
        })
    }

    fn model_to_completed(model: &games::Model) -> Result<CompletedGame> {
        Ok(CompletedGame {
            status: model.status.parse().map_err(|e: String| anyhow!(e))?,
            num_guesses: u8::try_from(model.num_guesses)?,
        })
    }

    async fn load_guesses<C: ConnectionTrait>(conn: &C, game_id: GameId) -> Result<Vec<GuessRecord>> {
        let models = Guesses::find()
            .filter(guesses::Column::GameId.eq(game_id))
            .order_by_asc(guesses::Column::GuessNumber)
            .all(conn)
            .await?;

        models.into_iter().map(Self::model_to_guess).collect()
    }

    async fn load_active<C: ConnectionTrait>(
        conn: &C,
        player_id: PlayerId,
    ) -> Result<Option<GameWithGuesses>> {
        let Some((model, word)) = Games::find()
            .filter(games::Column::PlayerId.eq(player_id))
            .filter(games::Column::Status.eq(GameStatus::Active.as_str()))
            .find_also_related(Words)
            .one(conn)
            .await?
        else {
            return Ok(None);
        };

        let word = word.ok_or_else(|| anyhow!("Game {} has no target word", model.id))?;
        let game = Self::model_to_game(model, &word.word)?;
        let guesses = Self::load_guesses(conn, game.id).await?;

        Ok(Some(GameWithGuesses { game, guesses }))
    }

    /// Targets of every game the player has had.
    async fn target_history<C: ConnectionTrait>(
        conn: &C,
        player_id: PlayerId,
    ) -> Result<HashSet<Word>> {
        let rows = Games::find()
            .filter(games::Column::PlayerId.eq(player_id))
            .find_also_related(Words)
            .all(conn)
            .await?;

        rows.into_iter()
            .filter_map(|(_, word)| word)
            .map(|word| Word::parse(&word.word).map_err(anyhow::Error::from))
            .collect()
    }

    /// The player's unfinished game, if any.
    pub async fn find_active(&self, player_id: PlayerId) -> Result<Option<GameWithGuesses>> {
        Self::load_active(&self.db, player_id).await
    }

    /// Return the player's active game, creating one if there is none.
    ///
    /// New targets avoid words from the player's earlier games. If another
    /// request creates a game first, its game is returned as resumed, so a
    /// player never ends up with two active games.
    pub async fn start_or_resume(&self, player_id: PlayerId, bank: &WordBank) -> Result<StartedGame> {
        let txn = self.db.begin().await?;

        if let Some(existing) = Self::load_active(&txn, player_id).await? {
            txn.commit().await?;
            debug!("Resuming game {} for player {}", existing.game.id, player_id);
            return Ok(StartedGame::Resumed(existing));
        }

        let history = Self::target_history(&txn, player_id).await?;
        let target = {
            let mut rng = rand::rng();
            bank.pick_unseen_word(&history, &mut rng)?
        };
        let word_id = WordRepository::find_id(&txn, &target)
            .await?
            .ok_or_else(|| anyhow!("Word {} is not in the words table", target))?;

        let game = Game::new(player_id, target);
        let game_model = games::ActiveModel {
            id: Set(game.id),
            player_id: Set(player_id),
            word_id: Set(word_id),
            status: Set(game.status().as_str().to_string()),
            num_guesses: Set(i32::from(game.num_guesses())),
            created_at: Set(game.created_at.into()),
            completed_at: Set(None),
        };

        match Games::insert(game_model).exec_without_returning(&txn).await {
            Ok(_) => {
                txn.commit().await?;
                info!("Created game {} for player {}", game.id, player_id);
                Ok(StartedGame::Created(GameWithGuesses {
                    game,
                    guesses: Vec::new(),
                }))
            }
            Err(err) if is_unique_violation(&err) => {
                txn.rollback().await?;
                warn!("Concurrent start for player {}, resuming the winner", player_id);
                let existing = self
                    .find_active(player_id)
                    .await?
                    .ok_or_else(|| anyhow!("Active game for player {} vanished", player_id))?;
                Ok(StartedGame::Resumed(existing))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Persist an applied guess and the game's new state as one unit.
    ///
    /// Fails without writing anything when the stored game is no longer
    /// active or has moved past the guess count `outcome` was built from.
    pub async fn record_guess(&self, game_id: GameId, outcome: &GuessOutcome) -> Result<()> {
        let txn = self.db.begin().await?;
        let now = Utc::now();

        let guess_model = guesses::ActiveModel {
            game_id: Set(game_id),
            guess_number: Set(i32::from(outcome.record.guess_number)),
            guess_word: Set(outcome.record.guess.as_str().to_string()),
            result_pattern: Set(outcome.record.result.pattern()),
            created_at: Set(now.into()),
        };
        Guesses::insert(guess_model)
            .exec_without_returning(&txn)
            .await
            .with_context(|| {
                format!(
                    "Guess {} already recorded for game {}",
                    outcome.record.guess_number, game_id
                )
            })?;

        let mut update = Games::update_many()
            .col_expr(games::Column::Status, Expr::value(outcome.status.as_str()))
            .col_expr(
                games::Column::NumGuesses,
                Expr::value(i32::from(outcome.num_guesses)),
            );
        if let Some(completed_at) = outcome.completed_at {
            update = update.col_expr(
                games::Column::CompletedAt,
                Expr::value(completed_at.fixed_offset()),
            );
        }

        let updated = update
            .filter(games::Column::Id.eq(game_id))
            .filter(games::Column::Status.eq(GameStatus::Active.as_str()))
            .filter(games::Column::NumGuesses.eq(i32::from(outcome.previous_guesses())))
            .exec(&txn)
            .await?;

        if updated.rows_affected != 1 {
            // Dropping the transaction rolls back the guess insert
            return Err(anyhow!(
                "Game {} changed while guess {} was being recorded",
                game_id,
                outcome.record.guess_number
            ));
        }

        txn.commit().await?;
        debug!(
            "Recorded guess {} for game {} ({})",
            outcome.record.guess_number, game_id, outcome.status
        );
        Ok(())
    }

    /// The player's finished games in creation order.
    pub async fn completed_games(&self, player_id: PlayerId) -> Result<Vec<CompletedGame>> {
        let models = Games::find()
            .filter(games::Column::PlayerId.eq(player_id))
            .filter(games::Column::Status.ne(GameStatus::Active.as_str()))
            .order_by_asc(games::Column::CreatedAt)
            .order_by_asc(games::Column::Id)
            .all(&self.db)
            .await?;

        models.iter().map(Self::model_to_completed).collect()
    }

    /// Every registered player with their finished games, in registration
    /// order.
    pub async fn player_histories(&self) -> Result<Vec<PlayerHistory>> {
        let players = PlayerRepository::new(self.db.clone()).all_players().await?;
        let finished = Games::find()
            .filter(games::Column::Status.ne(GameStatus::Active.as_str()))
            .order_by_asc(games::Column::CreatedAt)
            .order_by_asc(games::Column::Id)
            .all(&self.db)
            .await?;

        let mut by_player: HashMap<PlayerId, Vec<CompletedGame>> = HashMap::new();
        for model in &finished {
            by_player
                .entry(model.player_id)
                .or_default()
                .push(Self::model_to_completed(model)?);
        }

        Ok(players
            .into_iter()
            .map(|player| PlayerHistory {
                games: by_player.remove(&player.id).unwrap_or_default(),
                player_id: player.id,
                name: player.name,
                registered_at: player.created_at.with_timezone(&Utc),
            })
            .collect())
    }
}
