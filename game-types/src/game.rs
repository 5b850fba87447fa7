use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use ts_rs::TS;

use crate::WordError;

pub const WORD_LENGTH: usize = 5;
pub const MAX_GUESSES: u8 = 6;

/// A lowercase, five letter ASCII word.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, TS)]
#[ts(export, type = "string")]
pub struct Word(String);

impl Word {
    /// Normalizes `raw` (trim + lowercase) and checks it is five ASCII letters.
    pub fn parse(raw: &str) -> Result<Self, WordError> {
        let normalized = raw.trim().to_lowercase();
        let length = normalized.chars().count();
        if length != WORD_LENGTH {
            return Err(WordError::WrongLength(length));
        }
        if !normalized.chars().all(|c| c.is_ascii_lowercase()) {
            return Err(WordError::NonAlphabetic);
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn letters(&self) -> [char; WORD_LENGTH] {
        let mut letters = [' '; WORD_LENGTH];
        for (slot, c) in letters.iter_mut().zip(self.0.chars()) {
            *slot = c;
        }
        letters
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Word {
    type Error = WordError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Word::parse(&value)
    }
}

impl From<Word> for String {
    fn from(word: Word) -> Self {
        word.0
    }
}

impl Serialize for Word {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Word {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Word::parse(&raw).map_err(de::Error::custom)
    }
}

impl FromStr for Word {
    type Err = WordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Word::parse(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum GameStatus {
    Active,
    Won,
    Lost,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Active => "active",
            GameStatus::Won => "won",
            GameStatus::Lost => "lost",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameStatus::Active)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(GameStatus::Active),
            "won" => Ok(GameStatus::Won),
            "lost" => Ok(GameStatus::Lost),
            other => Err(format!("unknown game status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum LetterStatus {
    Correct, // letter in the right position
    Present, // letter elsewhere in the word
    Absent,  // letter not in word (or all occurrences already used)
}

impl LetterStatus {
    fn code(&self) -> char {
        match self {
            LetterStatus::Correct => 'C',
            LetterStatus::Present => 'P',
            LetterStatus::Absent => 'A',
        }
    }

    fn from_code(code: char) -> Option<Self> {
        match code {
            'C' => Some(LetterStatus::Correct),
            'P' => Some(LetterStatus::Present),
            'A' => Some(LetterStatus::Absent),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LetterResult {
    pub letter: char,
    pub status: LetterStatus,
}

/// Per-position result of one guess, always exactly five entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Feedback(pub [LetterResult; WORD_LENGTH]);

impl Feedback {
    pub fn letters(&self) -> &[LetterResult; WORD_LENGTH] {
        &self.0
    }

    pub fn is_solved(&self) -> bool {
        self.0.iter().all(|l| l.status == LetterStatus::Correct)
    }

    /// Compact storage form, one status code per position (e.g. `CPAAA`).
    pub fn pattern(&self) -> String {
        self.0.iter().map(|l| l.status.code()).collect()
    }

    /// Rebuilds feedback from a guessed word and its stored pattern.
    pub fn from_pattern(word: &Word, pattern: &str) -> Option<Self> {
        let codes: Vec<char> = pattern.chars().collect();
        if codes.len() != WORD_LENGTH {
            return None;
        }

        let letters = word.letters();
        let mut results = [LetterResult {
            letter: ' ',
            status: LetterStatus::Absent,
        }; WORD_LENGTH];
        for (i, slot) in results.iter_mut().enumerate() {
            *slot = LetterResult {
                letter: letters[i],
                status: LetterStatus::from_code(codes[i])?,
            };
        }
        Some(Self(results))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GuessRecord {
    pub guess: Word,
    pub guess_number: u8,
    pub result: Feedback,
}
