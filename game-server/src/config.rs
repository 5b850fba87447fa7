use std::env;
use std::fmt::Display;
use std::str::FromStr;

use anyhow::{Result, anyhow};
use game_core::StatsAggregator;
use game_persistence::connection::DEFAULT_DATABASE_URL;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Directory of `.txt` word lists; the embedded list is used when unset
    pub words_directory: Option<String>,
    pub leaderboard_size: usize,
    pub champion_min_wins: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source, falling back to
    /// defaults for anything missing.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_var(&lookup, "PORT", defaults.port)?,
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            words_directory: lookup("WORDS_DIRECTORY").filter(|dir| !dir.trim().is_empty()),
            leaderboard_size: parse_var(&lookup, "LEADERBOARD_SIZE", defaults.leaderboard_size)?,
            champion_min_wins: parse_var(&lookup, "CHAMPION_MIN_WINS", defaults.champion_min_wins)?,
        })
    }

    pub fn stats_aggregator(&self) -> StatsAggregator {
        StatsAggregator::new(self.leaderboard_size, self.champion_min_wins)
    }
}

impl Default for Config {
    fn default() -> Self {
        let stats = StatsAggregator::default();
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            words_directory: None,
            leaderboard_size: stats.top_n,
            champion_min_wins: stats.champion_min_wins,
        }
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("Invalid {} {:?}: {}", key, raw, e)),
        None => Ok(default),
    }
}
