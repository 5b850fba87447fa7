use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

use game_core::WordBank;
use game_persistence::DatabaseManager;
use game_server::{config::Config, create_routes, game_manager::GameManager};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting Wordblitz server...");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    let vocabulary = match &config.words_directory {
        Some(words_dir) => {
            info!("Loading words from directory: {}", words_dir);
            match WordBank::from_directory(words_dir) {
                Ok(bank) => bank,
                Err(e) => {
                    error!("Failed to load words from directory '{}': {:#}", words_dir, e);
                    error!("Unset WORDS_DIRECTORY to use the built-in word list.");
                    std::process::exit(1);
                }
            }
        }
        None => {
            info!("Using built-in word list");
            WordBank::with_default_words()
        }
    };

    // Initialize database connection and run migrations
    let database = match DatabaseManager::connect(&config.database_url).await {
        Ok(database) => database,
        Err(e) => {
            error!("Failed to connect to database and run migrations: {}", e);
            std::process::exit(1);
        }
    };

    let game_manager =
        match GameManager::bootstrap(database, &vocabulary, config.stats_aggregator()).await {
            Ok(manager) => Arc::new(manager),
            Err(e) => {
                error!("Failed to seed words: {:#}", e);
                std::process::exit(1);
            }
        };

    let routes = create_routes(game_manager);

    let host = match config.host.parse::<std::net::IpAddr>() {
        Ok(host) => host,
        Err(e) => {
            error!("Invalid HOST '{}': {}", config.host, e);
            std::process::exit(1);
        }
    };
    info!("Server starting on {}:{}", host, config.port);

    let (addr, server) =
        warp::serve(routes).bind_with_graceful_shutdown((host, config.port), shutdown_signal());

    info!("Server started successfully on {}. Press Ctrl+C to stop.", addr);
    server.await;
    info!("Server shutdown complete.");
}

async fn shutdown_signal() {
    // Wait for SIGINT (Ctrl+C) or SIGTERM
    #[cfg(unix)]
    {
        let (mut sigint, mut sigterm) = match (
            signal::unix::signal(signal::unix::SignalKind::interrupt()),
            signal::unix::signal(signal::unix::SignalKind::terminate()),
        ) {
            (Ok(sigint), Ok(sigterm)) => (sigint, sigterm),
            (Err(e), _) | (_, Err(e)) => {
                error!("Failed to install signal handlers: {}", e);
                return std::future::pending().await;
            }
        };

        tokio::select! {
            _ = sigint.recv() => {
                info!("Received SIGINT, shutting down gracefully...");
            }
            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down gracefully...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for ctrl+c: {}", e);
            return std::future::pending().await;
        }
        info!("Received Ctrl+C, shutting down gracefully...");
    }
}
