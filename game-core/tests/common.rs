#![allow(dead_code)]

use game_core::{Game, GuessOutcome, RequestMeta, WordBank};
use game_types::{LetterStatus, Word};
use uuid::Uuid;

/// Creates a test WordBank with a known set of words
pub fn create_test_bank() -> WordBank {
    let word_list = "apple\ncrane\nhello\nhouse\nmouse\nplane\nslate\nstone\ntests\ntrain\nvalid\nwater\nworld";
    WordBank::from_word_list(word_list)
}

pub fn word(s: &str) -> Word {
    Word::parse(s).expect("test word should be valid")
}

/// Creates a fresh game for a new player with a specific target word
pub fn create_game_with_word(target: &str) -> Game {
    Game::new(Uuid::new_v4(), word(target))
}

/// Validates `raw` against the bank and applies it
pub fn play(game: &mut Game, bank: &WordBank, raw: &str) -> GuessOutcome {
    let guess = bank.validate_guess(raw).expect("guess should be valid");
    game.apply_guess(guess).expect("game should accept guess")
}

/// Plays misses until the game is lost, returning the final outcome
pub fn play_to_loss(game: &mut Game, bank: &WordBank) -> GuessOutcome {
    let miss = bank
        .words()
        .iter()
        .find(|w| *w != game.target())
        .expect("bank needs a word other than the target")
        .clone();

    loop {
        let outcome = game.apply_guess(miss.clone()).expect("game should accept guess");
        if outcome.status.is_terminal() {
            return outcome;
        }
    }
}

pub fn browser(addr: &str, user_agent: &str, language: &str) -> RequestMeta {
    RequestMeta {
        remote_addr: Some(addr.to_string()),
        forwarded_for: None,
        user_agent: Some(user_agent.to_string()),
        accept_language: Some(language.to_string()),
    }
}

/// Counts correct + present markings per letter in a result
pub fn marked_counts(outcome: &GuessOutcome) -> std::collections::HashMap<char, usize> {
    let mut counts = std::collections::HashMap::new();
    for letter in outcome.record.result.letters() {
        if letter.status != LetterStatus::Absent {
            *counts.entry(letter.letter).or_insert(0) += 1;
        }
    }
    counts
}
