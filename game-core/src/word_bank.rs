use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use game_types::{GameError, Word};
use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::{debug, info};

const DEFAULT_WORDS: &str = include_str!("../words/default.txt");

/// The fixed vocabulary. Every word is both a valid guess and a candidate target.
#[derive(Debug, Clone)]
pub struct WordBank {
    words: Vec<Word>,
    index: HashSet<Word>,
}

impl WordBank {
    pub fn new(words: impl IntoIterator<Item = Word>) -> Self {
        // Sorted so that selection with a seeded rng is reproducible
        let words: Vec<Word> = words.into_iter().collect::<BTreeSet<_>>().into_iter().collect();
        let index = words.iter().cloned().collect();
        Self { words, index }
    }

    /// Create a word bank from a word list, one word per line.
    /// Blank lines and `#` comments are skipped, as is anything that is not
    /// exactly five ASCII letters.
    pub fn from_word_list(word_list: &str) -> Self {
        let words = word_list
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| Word::parse(line).ok());

        Self::new(words)
    }

    /// Load and merge every `.txt` file in a directory
    pub fn from_directory<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let mut combined = String::new();

        let entries = std::fs::read_dir(dir)
            .with_context(|| format!("Failed to read words directory {}", dir.display()))?;
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("txt") {
                continue;
            }

            debug!("Loading word file {}", path.display());
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read word file {}", path.display()))?;
            combined.push_str(&contents);
            combined.push('\n');
        }

        let bank = Self::from_word_list(&combined);
        if bank.is_empty() {
            return Err(anyhow!("No five letter words found in {}", dir.display()));
        }

        info!("Loaded {} words from {}", bank.len(), dir.display());
        Ok(bank)
    }

    /// The vocabulary compiled into the binary
    pub fn with_default_words() -> Self {
        Self::from_word_list(DEFAULT_WORDS)
    }

    /// Case-insensitive membership test
    pub fn is_valid_word(&self, word: &str) -> bool {
        Word::parse(word)
            .map(|word| self.contains(&word))
            .unwrap_or(false)
    }

    pub fn contains(&self, word: &Word) -> bool {
        self.index.contains(word)
    }

    /// Turn raw user input into a guess: shape first, then vocabulary.
    pub fn validate_guess(&self, raw: &str) -> Result<Word, GameError> {
        let word = Word::parse(raw)?;
        if !self.contains(&word) {
            return Err(GameError::UnknownWord {
                word: word.to_string(),
            });
        }
        Ok(word)
    }

    /// Pick a target the player has not had before.
    ///
    /// `history` holds the targets of the player's previous games. Once every
    /// word has been used, any word may repeat.
    pub fn pick_unseen_word<R: Rng + ?Sized>(
        &self,
        history: &HashSet<Word>,
        rng: &mut R,
    ) -> Result<Word, GameError> {
        let unseen: Vec<&Word> = self
            .words
            .iter()
            .filter(|word| !history.contains(*word))
            .collect();

        let picked = match unseen.choose(rng) {
            Some(word) => Some(*word),
            None => {
                debug!("Player has seen all {} words, allowing repeats", self.len());
                self.words.choose(rng)
            }
        };

        picked
            .cloned()
            .ok_or_else(|| GameError::internal("No words available"))
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
