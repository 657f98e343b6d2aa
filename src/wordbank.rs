use crate::dictionary::{DictionaryValidator, Lookup};
use crate::error::GameError;
use crate::word::{Word, word_of_length};
use crate::word_source::WordSource;
use rand::seq::IndexedRandom;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

pub const EMBEDDED_WORDBANK: &str = include_str!("resources/wordbank.txt");

pub fn load_wordbank_from_str(data: &str, length: usize) -> Vec<Word> {
    data.lines()
        .filter_map(|line| word_of_length(line, length))
        .collect()
}

pub fn load_wordbank_from_file<P: AsRef<Path>>(path: P, length: usize) -> io::Result<Vec<Word>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut words = Vec::new();
    for line in reader.lines() {
        if let Some(word) = word_of_length(&line?, length) {
            words.push(word);
        }
    }
    Ok(words)
}

/// An in-memory word list that acts as both word source and dictionary.
///
/// Used for offline play: every generated word is drawn from the list and only listed words
/// count as dictionary words.
#[derive(Debug, Clone)]
pub struct WordBank {
    words: Vec<Word>,
    index: BTreeSet<String>,
}

impl WordBank {
    #[must_use]
    pub fn new(words: Vec<Word>) -> Self {
        let index = words.iter().map(|w| w.as_str().to_string()).collect();
        Self { words, index }
    }

    /// The word list compiled into the binary.
    #[must_use]
    pub fn embedded(length: usize) -> Self {
        Self::new(load_wordbank_from_str(EMBEDDED_WORDBANK, length))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl WordSource for WordBank {
    fn generate(&self, length: usize) -> Result<Word, GameError> {
        let candidates: Vec<&Word> = self.words.iter().filter(|w| w.len() == length).collect();
        candidates
            .choose(&mut rand::rng())
            .map(|w| (*w).clone())
            .ok_or(GameError::WordUnavailable { attempts: 1 })
    }
}

impl DictionaryValidator for WordBank {
    fn check(&self, word: &str) -> Result<Lookup, GameError> {
        if self.index.contains(&word.trim().to_ascii_lowercase()) {
            Ok(Lookup::Found)
        } else {
            Ok(Lookup::NotFound)
        }
    }
}
