pub mod evaluation;
pub mod game_state;
pub mod identity;
pub mod stats;
pub mod word_bank;

// Re-export main components
pub use evaluation::*;
pub use game_state::*;
pub use identity::*;
pub use stats::*;
pub use word_bank::*;
