use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use game_types::{GameStatus, Leaderboard, LeaderboardEntry, PlayerId, PlayerStats};

/// A finished game as seen by the aggregator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletedGame {
    pub status: GameStatus,
    pub num_guesses: u8,
}

/// A player and their games, oldest first
#[derive(Debug, Clone)]
pub struct PlayerHistory {
    pub player_id: PlayerId,
    pub name: String,
    pub registered_at: DateTime<Utc>,
    pub games: Vec<CompletedGame>,
}

pub struct StatsAggregator {
    pub top_n: usize,
    pub champion_min_wins: u32,
}

impl Default for StatsAggregator {
    fn default() -> Self {
        Self {
            top_n: 20,
            champion_min_wins: 5,
        }
    }
}

impl StatsAggregator {
    pub fn new(top_n: usize, champion_min_wins: u32) -> Self {
        Self {
            top_n,
            champion_min_wins,
        }
    }

    /// Summarize a player's games. `games` must be in creation order; games
    /// that are still active are ignored.
    pub fn player_stats(games: &[CompletedGame]) -> PlayerStats {
        let mut stats = PlayerStats::default();
        let mut total_win_guesses: u32 = 0;
        let mut streak: u32 = 0;

        for game in games.iter().filter(|g| g.status.is_terminal()) {
            stats.games_played += 1;
            match game.status {
                GameStatus::Won => {
                    stats.games_won += 1;
                    total_win_guesses += u32::from(game.num_guesses);
                    streak += 1;
                    stats.best_streak = stats.best_streak.max(streak);
                }
                _ => streak = 0,
            }
        }

        stats.games_lost = stats.games_played - stats.games_won;
        stats.current_streak = streak;
        stats.avg_guesses_per_win = (stats.games_won > 0)
            .then(|| f64::from(total_win_guesses) / f64::from(stats.games_won));
        stats
    }

    /// Build both leaderboard rankings.
    ///
    /// Players without finished games are left out. Ties fall back to
    /// registration order and then player id so the output is stable.
    pub fn leaderboard(&self, players: &[PlayerHistory]) -> Leaderboard {
        let mut ranked: Vec<(&PlayerHistory, PlayerStats)> = players
            .iter()
            .map(|p| (p, Self::player_stats(&p.games)))
            .filter(|(_, stats)| stats.games_played > 0)
            .collect();

        ranked.sort_by(|(a, a_stats), (b, b_stats)| {
            b_stats
                .games_won
                .cmp(&a_stats.games_won)
                .then_with(|| registration_order(a, b))
        });
        let prolific = ranked
            .iter()
            .take(self.top_n)
            .map(|(p, stats)| to_entry(p, stats))
            .collect();

        let mut champions: Vec<&(&PlayerHistory, PlayerStats)> = ranked
            .iter()
            .filter(|(_, stats)| stats.games_won >= self.champion_min_wins)
            .collect();
        champions.sort_by(|(a, a_stats), (b, b_stats)| {
            compare_average(a_stats.avg_guesses_per_win, b_stats.avg_guesses_per_win)
                .then_with(|| b_stats.games_won.cmp(&a_stats.games_won))
                .then_with(|| registration_order(a, b))
        });
        let champions = champions
            .into_iter()
            .take(self.top_n)
            .map(|(p, stats)| to_entry(p, stats))
            .collect();

        Leaderboard {
            champions,
            prolific,
        }
    }
}

fn registration_order(a: &PlayerHistory, b: &PlayerHistory) -> Ordering {
    a.registered_at
        .cmp(&b.registered_at)
        .then_with(|| a.player_id.cmp(&b.player_id))
}

// Lower is better; a missing average sorts last
fn compare_average(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn to_entry(player: &PlayerHistory, stats: &PlayerStats) -> LeaderboardEntry {
    LeaderboardEntry {
        name: player.name.clone(),
        games_won: stats.games_won,
        games_played: stats.games_played,
        avg_guesses_per_win: stats.avg_guesses_per_win,
        current_streak: stats.current_streak,
        best_streak: stats.best_streak,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn won(num_guesses: u8) -> CompletedGame {
        CompletedGame {
            status: GameStatus::Won,
            num_guesses,
        }
    }

    fn lost() -> CompletedGame {
        CompletedGame {
            status: GameStatus::Lost,
            num_guesses: 6,
        }
    }

    fn player(name: &str, offset_secs: i64, games: Vec<CompletedGame>) -> PlayerHistory {
        PlayerHistory {
            player_id: Uuid::new_v4(),
            name: name.to_string(),
            registered_at: DateTime::from_timestamp(offset_secs, 0).unwrap(),
            games,
        }
    }

    #[test]
    fn test_empty_history() {
        let stats = StatsAggregator::player_stats(&[]);
        assert_eq!(stats, PlayerStats::default());
        assert_eq!(stats.avg_guesses_per_win, None);
    }

    #[test]
    fn test_counts_and_average() {
        let stats = StatsAggregator::player_stats(&[won(3), lost(), won(4), won(5)]);
        assert_eq!(stats.games_played, 4);
        assert_eq!(stats.games_won, 3);
        assert_eq!(stats.games_lost, 1);
        assert_eq!(stats.avg_guesses_per_win, Some(4.0));
    }

    #[test]
    fn test_no_wins_has_no_average() {
        let stats = StatsAggregator::player_stats(&[lost(), lost()]);
        assert_eq!(stats.games_lost, 2);
        assert_eq!(stats.avg_guesses_per_win, None);
        assert_eq!(stats.current_streak, 0);
        assert_eq!(stats.best_streak, 0);
    }

    #[test]
    fn test_streaks() {
        let history = [won(2), won(3), won(4), lost(), won(1), won(6)];
        let stats = StatsAggregator::player_stats(&history);
        assert_eq!(stats.current_streak, 2);
        assert_eq!(stats.best_streak, 3);

        // A loss resets the current streak but not the best
        let mut after_loss = history.to_vec();
        after_loss.push(lost());
        let stats = StatsAggregator::player_stats(&after_loss);
        assert_eq!(stats.current_streak, 0);
        assert_eq!(stats.best_streak, 3);
    }

    #[test]
    fn test_best_streak_never_decreases() {
        let history = [won(2), lost(), won(3), won(3), lost(), lost(), won(5)];
        let mut best = 0;
        for end in 0..=history.len() {
            let stats = StatsAggregator::player_stats(&history[..end]);
            assert!(stats.best_streak >= best);
            assert!(stats.current_streak <= stats.best_streak);
            best = stats.best_streak;
        }
        assert_eq!(best, 2);
    }

    #[test]
    fn test_active_games_are_ignored() {
        let active = CompletedGame {
            status: GameStatus::Active,
            num_guesses: 2,
        };
        let stats = StatsAggregator::player_stats(&[won(3), active]);
        assert_eq!(stats.games_played, 1);
        assert_eq!(stats.current_streak, 1);
    }

    #[test]
    fn test_champions_need_minimum_wins_and_rank_by_average() {
        let players = vec![
            player("slow", 0, vec![won(5); 6]),
            player("fast", 1, vec![won(2); 5]),
            player("rookie", 2, vec![won(1); 4]),
        ];

        let board = StatsAggregator::default().leaderboard(&players);
        let names: Vec<&str> = board.champions.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["fast", "slow"]);
        assert_eq!(board.champions[0].avg_guesses_per_win, Some(2.0));
    }

    #[test]
    fn test_prolific_ranks_by_wins_and_skips_idle_players() {
        let players = vec![
            player("idle", 0, vec![]),
            player("one", 1, vec![won(3)]),
            player("three", 2, vec![won(3), won(4), lost(), won(2)]),
            player("loser", 3, vec![lost()]),
        ];

        let board = StatsAggregator::default().leaderboard(&players);
        let names: Vec<&str> = board.prolific.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["three", "one", "loser"]);
        assert_eq!(board.prolific[0].games_played, 4);
        assert_eq!(board.prolific[0].current_streak, 1);
        assert!(board.champions.is_empty());
    }

    #[test]
    fn test_ties_use_registration_order() {
        let players = vec![
            player("later", 10, vec![won(3); 5]),
            player("earlier", 5, vec![won(3); 5]),
        ];

        let board = StatsAggregator::default().leaderboard(&players);
        assert_eq!(board.prolific[0].name, "earlier");
        assert_eq!(board.champions[0].name, "earlier");

        // Same input, same output
        assert_eq!(board, StatsAggregator::default().leaderboard(&players));
    }

    #[test]
    fn test_leaderboard_truncates_to_top_n() {
        let players: Vec<PlayerHistory> = (0..10)
            .map(|i| player(&format!("p{}", i), i, vec![won(3); (i + 1) as usize]))
            .collect();

        let board = StatsAggregator::new(3, 5).leaderboard(&players);
        assert_eq!(board.prolific.len(), 3);
        assert_eq!(board.prolific[0].name, "p9");
        assert_eq!(board.champions.len(), 3);
    }
}
