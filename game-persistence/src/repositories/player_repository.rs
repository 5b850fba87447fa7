use anyhow::Result;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use tracing::debug;
use uuid::Uuid;

use super::is_unique_violation;
use crate::entities::{players, prelude::*};
use game_types::Player;

pub struct PlayerRepository {
    db: DatabaseConnection,
}

impl PlayerRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_player(model: players::Model) -> Player {
        Player {
            id: model.id,
            name: model.name,
            fingerprint: model.fingerprint,
            created_at: model.created_at.to_rfc3339(),
        }
    }

    pub async fn find_by_fingerprint(&self, fingerprint: &str) -> Result<Option<Player>> {
        let model = Players::find()
            .filter(players::Column::Fingerprint.eq(fingerprint))
            .one(&self.db)
            .await?;

        Ok(model.map(Self::model_to_player))
    }

    /// Insert a new player. Returns `None` when the fingerprint is taken,
    /// including when a concurrent registration wins the race.
    pub async fn create_player(&self, name: &str, fingerprint: &str) -> Result<Option<Player>> {
        if self.find_by_fingerprint(fingerprint).await?.is_some() {
            return Ok(None);
        }

        let player_model = players::ActiveModel {
            id: sea_orm::ActiveValue::Set(Uuid::new_v4()),
            name: sea_orm::ActiveValue::Set(name.to_string()),
            fingerprint: sea_orm::ActiveValue::Set(fingerprint.to_string()),
            created_at: sea_orm::ActiveValue::Set(chrono::Utc::now().into()),
        };

        match Players::insert(player_model).exec(&self.db).await {
            Ok(saved) => {
                let created = Players::find_by_id(saved.last_insert_id)
                    .one(&self.db)
                    .await?
                    .ok_or_else(|| anyhow::anyhow!("Failed to retrieve created player"))?;
                Ok(Some(Self::model_to_player(created)))
            }
            Err(err) if is_unique_violation(&err) => {
                debug!("Fingerprint registered concurrently");
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Every player, oldest registration first.
    pub async fn all_players(&self) -> Result<Vec<players::Model>> {
        let players = Players::find()
            .order_by_asc(players::Column::CreatedAt)
            .order_by_asc(players::Column::Id)
            .all(&self.db)
            .await?;
        Ok(players)
    }
}
