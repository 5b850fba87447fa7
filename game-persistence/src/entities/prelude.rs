pub use super::games::Entity as Games;
pub use super::guesses::Entity as Guesses;
pub use super::players::Entity as Players;
pub use super::words::Entity as Words;
