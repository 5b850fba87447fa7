use anyhow::bail;
use tracing::{debug, error, info};

use crate::identity::short_fingerprint;
use game_core::{RequestMeta, StatsAggregator, WordBank, normalize_player_name, resolve_fingerprint};
use game_persistence::DatabaseManager;
use game_types::{
    CurrentGameResponse, GameError, GuessResponse, Leaderboard, Player, PlayerStatsResponse,
    StartGameResponse,
};

/// Response for a start request, plus whether a new game was created.
#[derive(Debug, Clone)]
pub struct StartResult {
    pub response: StartGameResponse,
    pub created: bool,
}

/// Runs player, game and stats operations against the database.
///
/// Holds no game state of its own; every call loads what it needs and
/// writes its changes back atomically.
pub struct GameManager {
    database: DatabaseManager,
    word_bank: WordBank,
    stats: StatsAggregator,
}

impl GameManager {
    pub fn new(database: DatabaseManager, word_bank: WordBank, stats: StatsAggregator) -> Self {
        Self {
            database,
            word_bank,
            stats,
        }
    }

    /// Seed `vocabulary` into the words table and build the runtime bank
    /// from the table, so stored targets and guess validation agree.
    pub async fn bootstrap(
        database: DatabaseManager,
        vocabulary: &WordBank,
        stats: StatsAggregator,
    ) -> anyhow::Result<Self> {
        let words = database.words();
        words.seed_words(vocabulary.words()).await?;

        let word_bank = WordBank::new(words.all_words().await?);
        if word_bank.is_empty() {
            bail!("Words table is empty after seeding");
        }
        info!("Word bank ready with {} words", word_bank.len());

        Ok(Self::new(database, word_bank, stats))
    }

    pub fn word_bank(&self) -> &WordBank {
        &self.word_bank
    }

    pub async fn register(&self, meta: &RequestMeta, name: &str) -> Result<Player, GameError> {
        let name = normalize_player_name(name)?;
        let fingerprint = resolve_fingerprint(meta);

        match self.database.players().create_player(&name, &fingerprint).await {
            Ok(Some(player)) => {
                info!(
                    "Registered player {} ({}) for {}",
                    player.id,
                    player.name,
                    short_fingerprint(&fingerprint)
                );
                Ok(player)
            }
            Ok(None) => {
                debug!("Fingerprint {} already registered", short_fingerprint(&fingerprint));
                Err(GameError::Conflict)
            }
            Err(err) => Err(internal_error("register player", err)),
        }
    }

    async fn lookup(&self, meta: &RequestMeta) -> Result<Option<Player>, GameError> {
        let fingerprint = resolve_fingerprint(meta);
        self.database
            .players()
            .find_by_fingerprint(&fingerprint)
            .await
            .map_err(|err| internal_error("look up player", err))
    }

    /// The player behind this browser, or `NotFound`.
    pub async fn current_player(&self, meta: &RequestMeta) -> Result<Player, GameError> {
        self.lookup(meta).await?.ok_or(GameError::NotFound)
    }

    // Game endpoints treat a missing player as unauthenticated
    async fn registered_player(&self, meta: &RequestMeta) -> Result<Player, GameError> {
        self.lookup(meta).await?.ok_or(GameError::Unregistered)
    }

    pub async fn start_or_resume(&self, meta: &RequestMeta) -> Result<StartResult, GameError> {
        let player = self.registered_player(meta).await?;

        let started = self
            .database
            .games()
            .start_or_resume(player.id, &self.word_bank)
            .await
            .map_err(|err| internal_error("start game", err))?;

        let created = started.is_new();
        let inner = started.into_inner();
        Ok(StartResult {
            response: StartGameResponse {
                game_id: inner.game.id,
                guesses: inner.guesses,
            },
            created,
        })
    }

    pub async fn current_game(&self, meta: &RequestMeta) -> Result<CurrentGameResponse, GameError> {
        let player = self.registered_player(meta).await?;

        let active = self
            .database
            .games()
            .find_active(player.id)
            .await
            .map_err(|err| internal_error("load active game", err))?
            .ok_or(GameError::NoActiveGame)?;

        Ok(CurrentGameResponse {
            game_id: active.game.id,
            status: active.game.status(),
            num_guesses: active.game.num_guesses(),
            guesses: active.guesses,
        })
    }

    /// Validate and apply a guess to the player's active game.
    ///
    /// Checks run in order: registration, active game, guess shape, then
    /// vocabulary. Nothing is written unless every check passes.
    pub async fn submit_guess(&self, meta: &RequestMeta, raw_guess: &str) -> Result<GuessResponse, GameError> {
        let player = self.registered_player(meta).await?;

        let games = self.database.games();
        let active = games
            .find_active(player.id)
            .await
            .map_err(|err| internal_error("load active game", err))?
            .ok_or(GameError::NoActiveGame)?;

        let guess = self.word_bank.validate_guess(raw_guess)?;

        let mut game = active.game;
        let outcome = game.apply_guess(guess)?;
        games
            .record_guess(game.id, &outcome)
            .await
            .map_err(|err| internal_error("record guess", err))?;

        debug!(
            "Player {} guess {} in game {}: {}",
            player.id,
            outcome.num_guesses,
            game.id,
            outcome.record.result.pattern()
        );
        if outcome.status.is_terminal() {
            info!(
                "Game {} finished as {} after {} guesses",
                game.id, outcome.status, outcome.num_guesses
            );
        }

        let mut guesses = active.guesses;
        guesses.push(outcome.record.clone());

        Ok(GuessResponse {
            game_id: game.id,
            status: outcome.status,
            num_guesses: outcome.num_guesses,
            guess: outcome.record,
            guesses,
            answer: outcome.answer,
        })
    }

    pub async fn leaderboard(&self) -> Result<Leaderboard, GameError> {
        let histories = self
            .database
            .games()
            .player_histories()
            .await
            .map_err(|err| internal_error("load leaderboard", err))?;

        Ok(self.stats.leaderboard(&histories))
    }

    pub async fn player_stats(&self, meta: &RequestMeta) -> Result<PlayerStatsResponse, GameError> {
        let player = self.current_player(meta).await?;

        let completed = self
            .database
            .games()
            .completed_games(player.id)
            .await
            .map_err(|err| internal_error("load player stats", err))?;

        Ok(PlayerStatsResponse::from(&StatsAggregator::player_stats(&completed)))
    }
}

// Keeps a domain error raised under a repository call, wraps anything else
fn internal_error(action: &str, err: anyhow::Error) -> GameError {
    error!("Failed to {}: {:#}", action, err);
    match err.downcast::<GameError>() {
        Ok(game_error) => game_error,
        Err(err) => GameError::internal(err),
    }
}
