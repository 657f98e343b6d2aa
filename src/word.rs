//! Word representation shared by the game, the collaborators and the cache.

use std::fmt;
use thiserror::Error;

/// Error type for strings that cannot be a game word
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WordError {
    #[error("word must contain at least two letters, got {0}")]
    TooShort(usize),
    #[error("word may only contain the letters a-z")]
    NotAlphabetic,
}

/// An immutable lowercase alphabetic word.
///
/// Invariant: at least two characters, all ASCII letters, stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Word(String);

impl Word {
    /// Parse a word, trimming surrounding whitespace and lowercasing it.
    ///
    /// # Errors
    /// Returns `WordError` if the trimmed text is shorter than two characters or contains
    /// anything other than ASCII letters.
    ///
    /// # Examples
    /// ```
    /// use wordle_clone::word::Word;
    ///
    /// let word = Word::parse(" Crane\n").unwrap();
    /// assert_eq!(word.as_str(), "crane");
    /// assert!(Word::parse("cr4ne").is_err());
    /// ```
    pub fn parse(text: &str) -> Result<Self, WordError> {
        let text = text.trim().to_ascii_lowercase();
        if !text.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(WordError::NotAlphabetic);
        }
        if text.len() < 2 {
            return Err(WordError::TooShort(text.len()));
        }
        Ok(Self(text))
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of letters (every letter is a single byte).
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn letters(&self) -> Vec<char> {
        self.0.chars().collect()
    }

    #[must_use]
    pub fn contains(&self, letter: char) -> bool {
        self.0.contains(letter)
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Word {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Parse `text` and keep it only if it has exactly `length` letters.
#[must_use]
pub fn word_of_length(text: &str, length: usize) -> Option<Word> {
    Word::parse(text).ok().filter(|word| word.len() == length)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_lowercases_and_trims() {
        let word = Word::parse("  SLATE ").unwrap();
        assert_eq!(word.as_str(), "slate");
        assert_eq!(word.len(), 5);
        assert_eq!(word.to_string(), "slate");
    }

    #[test]
    fn parse_rejects_non_letters() {
        assert_eq!(Word::parse("cr4ne"), Err(WordError::NotAlphabetic));
        assert_eq!(Word::parse("two words"), Err(WordError::NotAlphabetic));
        assert_eq!(Word::parse("café"), Err(WordError::NotAlphabetic));
    }

    #[test]
    fn parse_rejects_short_input() {
        assert_eq!(Word::parse("a"), Err(WordError::TooShort(1)));
        assert_eq!(Word::parse("   "), Err(WordError::TooShort(0)));
        assert!(Word::parse("an").is_ok());
    }

    #[test]
    fn word_of_length_filters_length() {
        assert!(word_of_length("crane", 5).is_some());
        assert!(word_of_length("cranes", 5).is_none());
        assert!(word_of_length("cr4ne", 5).is_none());
    }

    #[test]
    fn letters_preserve_order() {
        let word = Word::parse("robot").unwrap();
        assert_eq!(word.letters(), vec!['r', 'o', 'b', 'o', 't']);
        assert!(word.contains('b'));
        assert!(!word.contains('z'));
    }
}
