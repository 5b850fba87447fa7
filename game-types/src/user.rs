use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Player {
    pub id: Uuid,
    pub name: String,
    pub fingerprint: String,
    pub created_at: String, // ISO 8601 string for simplicity
}

/// Aggregates over a player's finished games.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PlayerStats {
    pub games_played: u32,
    pub games_won: u32,
    pub games_lost: u32,
    pub avg_guesses_per_win: Option<f64>,
    pub current_streak: u32,
    pub best_streak: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LeaderboardEntry {
    pub name: String,
    pub games_won: u32,
    pub games_played: u32,
    pub avg_guesses_per_win: Option<f64>,
    pub current_streak: u32,
    pub best_streak: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Leaderboard {
    pub champions: Vec<LeaderboardEntry>,
    pub prolific: Vec<LeaderboardEntry>,
}
