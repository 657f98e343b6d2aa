//! Dictionary lookups used to confirm that guesses and target words are real words.

use crate::error::GameError;
use log::{debug, warn};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_DICTIONARY_URL: &str = "https://api.dictionaryapi.dev/api/v2/entries/en/";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lookup {
    Found,
    NotFound,
}

/// Something that can tell whether a string is a dictionary word.
///
/// "Not found" is an ordinary answer; `Err` is reserved for failures to get an answer at all.
pub trait DictionaryValidator: Send + Sync {
    /// # Errors
    /// Returns an error when the dictionary could not be consulted.
    fn check(&self, word: &str) -> Result<Lookup, GameError>;

    /// Like [`check`](Self::check), treating lookup failures as "not a word".
    fn is_word(&self, word: &str) -> bool {
        match self.check(word) {
            Ok(Lookup::Found) => true,
            Ok(Lookup::NotFound) => false,
            Err(e) => {
                warn!("dictionary lookup for '{word}' failed: {e}");
                false
            }
        }
    }
}

/// Only alphabetic strings of two or more letters are ever sent to a dictionary.
#[must_use]
pub fn is_checkable(word: &str) -> bool {
    word.len() > 1 && word.chars().all(|c| c.is_ascii_alphabetic())
}

/// Dictionary backed by a dictionary-entries HTTP service keyed by the word.
pub struct HttpDictionary {
    client: Client,
    base_url: String,
}

impl HttpDictionary {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, GameError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

impl DictionaryValidator for HttpDictionary {
    fn check(&self, word: &str) -> Result<Lookup, GameError> {
        if !is_checkable(word) {
            return Ok(Lookup::NotFound);
        }
        let url = format!("{}{}", self.base_url, word.to_ascii_lowercase());
        let response = self.client.get(&url).send()?;
        let status = response.status();
        debug!("dictionary GET {url} -> {status}");
        if status == StatusCode::NOT_FOUND {
            Ok(Lookup::NotFound)
        } else if status.is_success() {
            Ok(Lookup::Found)
        } else {
            Err(GameError::UnexpectedStatus {
                service: "dictionary",
                status: status.as_u16(),
            })
        }
    }
}

/// Keep only the entries the dictionary confirms.
pub fn retain_words<D>(dictionary: &D, words: Vec<String>) -> Vec<String>
where
    D: DictionaryValidator + ?Sized,
{
    words
        .into_iter()
        .filter(|word| dictionary.is_word(word.trim()))
        .collect()
}

/// Rewrite a newline-delimited word file so that it only holds dictionary words.
///
/// Blank lines are dropped silently. Returns the lines that were removed.
///
/// # Errors
/// Returns an error if the file cannot be read or rewritten.
pub fn prune_word_file<D>(dictionary: &D, path: &Path) -> Result<Vec<String>, GameError>
where
    D: DictionaryValidator + ?Sized,
{
    let contents = fs::read_to_string(path)?;
    let lines: Vec<String> = contents
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect();
    let kept = retain_words(dictionary, lines.clone());

    let mut rewritten = String::new();
    for word in &kept {
        rewritten.push_str(word);
        rewritten.push('\n');
    }
    fs::write(path, rewritten)?;

    let kept: HashSet<String> = kept.into_iter().collect();
    Ok(lines
        .into_iter()
        .filter(|line| !kept.contains(line))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SetDictionary(HashSet<&'static str>);

    impl DictionaryValidator for SetDictionary {
        fn check(&self, word: &str) -> Result<Lookup, GameError> {
            if self.0.contains(word) {
                Ok(Lookup::Found)
            } else {
                Ok(Lookup::NotFound)
            }
        }
    }

    struct BrokenDictionary;

    impl DictionaryValidator for BrokenDictionary {
        fn check(&self, _word: &str) -> Result<Lookup, GameError> {
            Err(GameError::UnexpectedStatus {
                service: "dictionary",
                status: 500,
            })
        }
    }

    fn dictionary() -> SetDictionary {
        SetDictionary(["crane", "slate", "apple"].into_iter().collect())
    }

    #[test]
    fn checkable_words() {
        assert!(is_checkable("crane"));
        assert!(is_checkable("ab"));
        assert!(!is_checkable("a"));
        assert!(!is_checkable(""));
        assert!(!is_checkable("cr4ne"));
        assert!(!is_checkable("two words"));
    }

    #[test]
    fn errors_count_as_not_a_word() {
        assert!(!BrokenDictionary.is_word("crane"));
    }

    #[test]
    fn retain_words_filters() {
        let words = vec!["crane".to_string(), "xqzvw".to_string(), "slate".to_string()];
        assert_eq!(retain_words(&dictionary(), words), vec!["crane", "slate"]);
    }

    #[test]
    fn prune_word_file_rewrites_in_place() {
        let path = std::env::temp_dir().join("wordle_clone_prune_test.txt");
        fs::write(&path, "crane\nqqqqq\n\n  apple \nzzzzz\n").unwrap();

        let removed = prune_word_file(&dictionary(), &path).unwrap();
        assert_eq!(removed, vec!["qqqqq", "zzzzz"]);
        assert_eq!(fs::read_to_string(&path).unwrap(), "crane\napple\n");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn prune_missing_file_is_an_error() {
        let path = std::env::temp_dir().join("wordle_clone_prune_missing.txt");
        let _ = fs::remove_file(&path);
        assert!(matches!(
            prune_word_file(&dictionary(), &path),
            Err(GameError::Io(_))
        ));
    }
}
