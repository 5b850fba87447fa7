pub mod prelude;

pub mod games;
pub mod guesses;
pub mod players;
pub mod words;
