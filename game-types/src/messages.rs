use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{GameId, GameStatus, GuessRecord, PlayerStats, Word};

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GuessRequest {
    #[serde(default)]
    pub guess: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StartGameResponse {
    pub game_id: GameId,
    pub guesses: Vec<GuessRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CurrentGameResponse {
    pub game_id: GameId,
    pub status: GameStatus,
    pub num_guesses: u8,
    pub guesses: Vec<GuessRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GuessResponse {
    pub game_id: GameId,
    pub status: GameStatus,
    pub num_guesses: u8,
    pub guess: GuessRecord,
    pub guesses: Vec<GuessRecord>,
    /// Only present on the guess that loses the game
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub answer: Option<Word>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PlayerStatsResponse {
    pub games_won: u32,
    pub games_lost: u32,
    pub avg_guesses: Option<f64>,
    pub current_streak: u32,
    pub best_streak: u32,
}

impl From<&PlayerStats> for PlayerStatsResponse {
    fn from(stats: &PlayerStats) -> Self {
        PlayerStatsResponse {
            games_won: stats.games_won,
            games_lost: stats.games_lost,
            avg_guesses: stats.avg_guesses_per_win,
            current_streak: stats.current_streak,
            best_streak: stats.best_streak,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ErrorResponse {
    pub error: String,
}
