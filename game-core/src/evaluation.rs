use game_types::{Feedback, LetterResult, LetterStatus, WORD_LENGTH, Word};

pub struct GuessEvaluator;

impl GuessEvaluator {
    /// Score a guess against the target word.
    ///
    /// Exact matches are resolved first and consume their target letter, so a
    /// letter is never reported as `Present` more times than the target still
    /// has it available.
    pub fn evaluate(guess: &Word, target: &Word) -> Feedback {
        let guess_chars = guess.letters();
        let target_chars = target.letters();

        let mut statuses = [LetterStatus::Absent; WORD_LENGTH];
        let mut resolved = [false; WORD_LENGTH];
        let mut remaining: [Option<char>; WORD_LENGTH] = target_chars.map(Some);

        // First pass: mark correct positions
        for i in 0..WORD_LENGTH {
            if guess_chars[i] == target_chars[i] {
                statuses[i] = LetterStatus::Correct;
                resolved[i] = true;
                remaining[i] = None;
            }
        }

        // Second pass: present letters consume one remaining occurrence each
        for i in 0..WORD_LENGTH {
            if resolved[i] {
                continue;
            }

            let letter = Some(guess_chars[i]);
            if let Some(slot) = remaining.iter_mut().find(|slot| **slot == letter) {
                statuses[i] = LetterStatus::Present;
                *slot = None;
            }
        }

        Feedback(std::array::from_fn(|i| LetterResult {
            letter: guess_chars[i],
            status: statuses[i],
        }))
    }
}
