use chrono::{DateTime, Utc};
use game_types::{GameError, GameId, GameStatus, GuessRecord, MAX_GUESSES, PlayerId, Word};
use uuid::Uuid;

use crate::GuessEvaluator;

/// One puzzle attempt as the engine sees it.
///
/// The target is private: callers only learn it through [`GuessOutcome::answer`]
/// on the guess that loses the game.
#[derive(Debug, Clone, PartialEq)]
pub struct Game {
    pub id: GameId,
    pub player_id: PlayerId,
    target: Word,
    status: GameStatus,
    num_guesses: u8,
    pub created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

/// What happened when a guess was applied.
#[derive(Debug, Clone, PartialEq)]
pub struct GuessOutcome {
    pub record: GuessRecord,
    pub status: GameStatus,
    pub num_guesses: u8,
    pub completed_at: Option<DateTime<Utc>>,
    pub answer: Option<Word>,
}

impl GuessOutcome {
    /// Guess count the game had before this guess was applied
    pub fn previous_guesses(&self) -> u8 {
        self.num_guesses - 1
    }
}

impl Game {
    pub fn new(player_id: PlayerId, target: Word) -> Self {
        Self {
            id: Uuid::new_v4(),
            player_id,
            target,
            status: GameStatus::Active,
            num_guesses: 0,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Rebuild a game from stored fields, checking they are consistent.
    pub fn restore(
        id: GameId,
        player_id: PlayerId,
        target: Word,
        status: GameStatus,
        num_guesses: u8,
        created_at: DateTime<Utc>,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<Self, GameError> {
        if num_guesses > MAX_GUESSES {
            return Err(GameError::internal(format!(
                "Game {} has {} guesses",
                id, num_guesses
            )));
        }
        if status.is_terminal() != completed_at.is_some() {
            return Err(GameError::internal(format!(
                "Game {} is {} but completion time is {:?}",
                id, status, completed_at
            )));
        }

        Ok(Self {
            id,
            player_id,
            target,
            status,
            num_guesses,
            created_at,
            completed_at,
        })
    }

    pub fn target(&self) -> &Word {
        &self.target
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn num_guesses(&self) -> u8 {
        self.num_guesses
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn is_active(&self) -> bool {
        self.status == GameStatus::Active
    }

    /// Apply a validated guess.
    ///
    /// The game is won when the guess equals the target and lost when the
    /// sixth guess misses. Terminal games accept no further guesses.
    pub fn apply_guess(&mut self, guess: Word) -> Result<GuessOutcome, GameError> {
        if !self.is_active() || self.num_guesses >= MAX_GUESSES {
            return Err(GameError::NoActiveGame);
        }

        let guess_number = self.num_guesses + 1;
        let result = GuessEvaluator::evaluate(&guess, &self.target);

        let won = guess == self.target;
        let lost = !won && guess_number == MAX_GUESSES;

        self.num_guesses = guess_number;
        if won {
            self.status = GameStatus::Won;
        } else if lost {
            self.status = GameStatus::Lost;
        }
        if self.status.is_terminal() {
            self.completed_at = Some(Utc::now());
        }

        Ok(GuessOutcome {
            record: GuessRecord {
                guess,
                guess_number,
                result,
            },
            status: self.status,
            num_guesses: self.num_guesses,
            completed_at: self.completed_at,
            answer: lost.then(|| self.target.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(s: &str) -> Word {
        Word::parse(s).unwrap()
    }

    fn new_game(target: &str) -> Game {
        Game::new(Uuid::new_v4(), word(target))
    }

    #[test]
    fn test_new_game_is_active() {
        let game = new_game("crane");
        assert!(game.is_active());
        assert_eq!(game.num_guesses(), 0);
        assert_eq!(game.completed_at(), None);
        assert_eq!(game.target().as_str(), "crane");
    }

    #[test]
    fn test_winning_guess() {
        let mut game = new_game("crane");

        let first = game.apply_guess(word("slate")).unwrap();
        assert_eq!(first.status, GameStatus::Active);
        assert_eq!(first.record.guess_number, 1);
        assert_eq!(first.answer, None);
        assert_eq!(first.completed_at, None);

        let second = game.apply_guess(word("crane")).unwrap();
        assert_eq!(second.status, GameStatus::Won);
        assert_eq!(second.num_guesses, 2);
        assert_eq!(second.previous_guesses(), 1);
        assert!(second.record.result.is_solved());
        assert!(second.completed_at.is_some());
        assert_eq!(second.answer, None);
        assert_eq!(game.status(), GameStatus::Won);
    }

    #[test]
    fn test_sixth_miss_loses_and_reveals_answer() {
        let mut game = new_game("crane");

        for n in 1..=5 {
            let outcome = game.apply_guess(word("slate")).unwrap();
            assert_eq!(outcome.status, GameStatus::Active);
            assert_eq!(outcome.num_guesses, n);
            assert_eq!(outcome.answer, None);
        }

        let last = game.apply_guess(word("slate")).unwrap();
        assert_eq!(last.status, GameStatus::Lost);
        assert_eq!(last.num_guesses, 6);
        assert_eq!(last.answer, Some(word("crane")));
        assert!(game.completed_at().is_some());
    }

    #[test]
    fn test_win_on_sixth_guess_is_not_a_loss() {
        let mut game = new_game("crane");
        for _ in 0..5 {
            game.apply_guess(word("slate")).unwrap();
        }
        let last = game.apply_guess(word("crane")).unwrap();
        assert_eq!(last.status, GameStatus::Won);
        assert_eq!(last.answer, None);
    }

    #[test]
    fn test_terminal_games_reject_guesses() {
        let mut game = new_game("crane");
        game.apply_guess(word("crane")).unwrap();

        let before = game.clone();
        assert_eq!(game.apply_guess(word("slate")), Err(GameError::NoActiveGame));
        assert_eq!(game, before);
    }

    #[test]
    fn test_restore_checks_invariants() {
        let id = Uuid::new_v4();
        let player = Uuid::new_v4();
        let now = Utc::now();

        assert!(Game::restore(id, player, word("crane"), GameStatus::Active, 3, now, None).is_ok());
        assert!(Game::restore(id, player, word("crane"), GameStatus::Won, 3, now, Some(now)).is_ok());

        // Too many guesses
        assert!(Game::restore(id, player, word("crane"), GameStatus::Active, 7, now, None).is_err());
        // Terminal without completion time
        assert!(Game::restore(id, player, word("crane"), GameStatus::Lost, 6, now, None).is_err());
        // Active with completion time
        assert!(Game::restore(id, player, word("crane"), GameStatus::Active, 1, now, Some(now)).is_err());
    }
}
