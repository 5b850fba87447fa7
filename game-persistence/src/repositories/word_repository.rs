use anyhow::Result;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    sea_query::OnConflict,
};
use tracing::info;

use crate::entities::{prelude::*, words};
use game_types::Word;

// Keeps each INSERT well under SQLite's bound parameter limit
const SEED_BATCH_SIZE: usize = 500;

pub struct WordRepository {
    db: DatabaseConnection,
}

impl WordRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Insert any words not already stored. Returns how many were added.
    pub async fn seed_words(&self, words: &[Word]) -> Result<u64> {
        let mut inserted = 0;

        for batch in words.chunks(SEED_BATCH_SIZE) {
            let models = batch.iter().map(|word| words::ActiveModel {
                word: sea_orm::ActiveValue::Set(word.as_str().to_string()),
                ..Default::default()
            });

            inserted += Words::insert_many(models)
                .on_conflict(OnConflict::column(words::Column::Word).do_nothing().to_owned())
                .exec_without_returning(&self.db)
                .await?;
        }

        info!("Seeded {} new words ({} offered)", inserted, words.len());
        Ok(inserted)
    }

    /// All stored words, alphabetically.
    pub async fn all_words(&self) -> Result<Vec<Word>> {
        let models = Words::find()
            .order_by_asc(words::Column::Word)
            .all(&self.db)
            .await?;

        models
            .into_iter()
            .map(|model| {
                Word::parse(&model.word)
                    .map_err(|e| anyhow::anyhow!("Stored word {:?}: {}", model.word, e))
            })
            .collect()
    }

    /// Row id of `word`. Takes any connection so it can run inside a caller's
    /// transaction.
    pub async fn find_id<C: ConnectionTrait>(conn: &C, word: &Word) -> Result<Option<i32>> {
        let model = Words::find()
            .filter(words::Column::Word.eq(word.as_str()))
            .one(conn)
            .await?;
        Ok(model.map(|m| m.id))
    }
}
