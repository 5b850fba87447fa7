#![allow(dead_code)]

use std::sync::Arc;

use game_core::{RequestMeta, StatsAggregator, WordBank};
use game_persistence::DatabaseManager;
use game_persistence::connection::connect_to_memory_database;
use game_server::game_manager::GameManager;
use game_types::{GuessResponse, Player, Word};
use migration::{Migrator, MigratorTrait};

const TEST_WORDS: &[&str] = &[
    "about", "above", "after", "again", "beach", "black", "brown", "chair", "close", "early",
    "house", "place", "right", "round", "today", "which", "world", "wrong", "guess", "first",
    "third", "forth", "fifth", "sixth", "seven", "eight",
];

/// Test setup backed by a fresh in-memory database
pub struct TestGameServerSetup {
    pub database: DatabaseManager,
    pub game_manager: Arc<GameManager>,
}

impl TestGameServerSetup {
    pub async fn new() -> Self {
        Self::with_stats(StatsAggregator::default()).await
    }

    pub async fn with_stats(stats: StatsAggregator) -> Self {
        let db = connect_to_memory_database().await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        let database = DatabaseManager::from_connection(db);

        let vocabulary = WordBank::from_word_list(&TEST_WORDS.join("\n"));
        let game_manager = GameManager::bootstrap(database.clone(), &vocabulary, stats)
            .await
            .unwrap();

        Self {
            database,
            game_manager: Arc::new(game_manager),
        }
    }

    pub async fn register(&self, browser: &RequestMeta, name: &str) -> Player {
        self.game_manager
            .register(browser, name)
            .await
            .expect("registration should succeed")
    }

    /// Reads the hidden target straight from storage
    pub async fn target_of(&self, player: &Player) -> Word {
        self.database
            .games()
            .find_active(player.id)
            .await
            .unwrap()
            .expect("player should have an active game")
            .game
            .target()
            .clone()
    }

    pub fn miss_for(&self, target: &Word) -> Word {
        self.game_manager
            .word_bank()
            .words()
            .iter()
            .find(|w| *w != target)
            .unwrap()
            .clone()
    }

    /// Starts a game and wins it after `misses` wrong guesses
    pub async fn win_game(&self, browser: &RequestMeta, player: &Player, misses: usize) -> GuessResponse {
        self.game_manager.start_or_resume(browser).await.unwrap();
        let target = self.target_of(player).await;
        let miss = self.miss_for(&target);

        for _ in 0..misses {
            self.game_manager
                .submit_guess(browser, miss.as_str())
                .await
                .unwrap();
        }
        self.game_manager
            .submit_guess(browser, target.as_str())
            .await
            .unwrap()
    }

    /// Starts a game and misses six times
    pub async fn lose_game(&self, browser: &RequestMeta, player: &Player) -> GuessResponse {
        self.game_manager.start_or_resume(browser).await.unwrap();
        let target = self.target_of(player).await;
        let miss = self.miss_for(&target);

        let mut last = None;
        for _ in 0..6 {
            last = Some(
                self.game_manager
                    .submit_guess(browser, miss.as_str())
                    .await
                    .unwrap(),
            );
        }
        last.unwrap()
    }
}

/// Request metadata for a distinct browser
pub fn browser(user_agent: &str) -> RequestMeta {
    RequestMeta {
        remote_addr: Some("192.0.2.50".to_string()),
        forwarded_for: None,
        user_agent: Some(user_agent.to_string()),
        accept_language: Some("en-US".to_string()),
    }
}
