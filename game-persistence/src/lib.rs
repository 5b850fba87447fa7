pub mod connection;
pub mod entities;
pub mod repositories;

use sea_orm::{DatabaseConnection, DbErr};

use repositories::{GameRepository, PlayerRepository, WordRepository};

/// Owns the connection pool and hands out repositories over it.
#[derive(Clone)]
pub struct DatabaseManager {
    connection: DatabaseConnection,
}

impl DatabaseManager {
    pub async fn connect(database_url: &str) -> Result<Self, DbErr> {
        let connection = connection::connect_and_migrate(database_url).await?;
        Ok(Self { connection })
    }

    pub fn from_connection(connection: DatabaseConnection) -> Self {
        Self { connection }
    }

    pub fn get_connection(&self) -> &DatabaseConnection {
        &self.connection
    }

    pub fn players(&self) -> PlayerRepository {
        PlayerRepository::new(self.connection.clone())
    }

    pub fn words(&self) -> WordRepository {
        WordRepository::new(self.connection.clone())
    }

    pub fn games(&self) -> GameRepository {
        GameRepository::new(self.connection.clone())
    }
}
