pub mod game_repository;
pub mod player_repository;
pub mod word_repository;

pub use game_repository::*;
pub use player_repository::*;
pub use word_repository::*;

use sea_orm::{DbErr, SqlErr};

pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
