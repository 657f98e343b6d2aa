//! Random word generation through a word-list HTTP service.

use crate::error::GameError;
use crate::word::{Word, word_of_length};
use log::debug;
use reqwest::blocking::Client;
use std::time::Duration;

pub const DEFAULT_WORD_API_URL: &str = "https://random-word-api.herokuapp.com/word";

const SERVICE: &str = "word list";

/// Produces random lowercase words of a requested length.
pub trait WordSource: Send + Sync {
    /// # Errors
    /// Returns an error when no word could be produced.
    fn generate(&self, length: usize) -> Result<Word, GameError>;

    /// Produce up to `count` words in one go. Sources may return fewer words than asked for.
    ///
    /// # Errors
    /// Returns an error when the source is unavailable.
    fn generate_batch(&self, length: usize, count: usize) -> Result<Vec<Word>, GameError> {
        (0..count).map(|_| self.generate(length)).collect()
    }
}

pub struct HttpWordSource {
    client: Client,
    base_url: String,
}

impl HttpWordSource {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, GameError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn fetch(&self, url: &str) -> Result<String, GameError> {
        let response = self.client.get(url).send()?;
        let status = response.status();
        debug!("word list GET {url} -> {status}");
        if !status.is_success() {
            return Err(GameError::UnexpectedStatus {
                service: SERVICE,
                status: status.as_u16(),
            });
        }
        Ok(response.text()?)
    }
}

impl WordSource for HttpWordSource {
    fn generate(&self, length: usize) -> Result<Word, GameError> {
        let body = self.fetch(&format!("{}?length={length}", self.base_url))?;
        parse_single_word(&body, length)
    }

    fn generate_batch(&self, length: usize, count: usize) -> Result<Vec<Word>, GameError> {
        let body = self.fetch(&format!(
            "{}?length={length}&number={count}",
            self.base_url
        ))?;
        parse_word_batch(&body, length)
    }
}

/// Parse a response body of the form `["w1","w2",...]`.
///
/// # Errors
/// Returns `MalformedResponse` if the body is not a JSON array of strings.
pub fn parse_word_list(body: &str) -> Result<Vec<String>, GameError> {
    serde_json::from_str(body.trim()).map_err(|e| GameError::MalformedResponse {
        service: SERVICE,
        detail: e.to_string(),
    })
}

/// Unwrap a single-word response such as `["crane"]`.
///
/// # Errors
/// Returns `MalformedResponse` if the body holds no alphabetic word of `length` letters.
pub fn parse_single_word(body: &str, length: usize) -> Result<Word, GameError> {
    let words = parse_word_list(body)?;
    words
        .first()
        .and_then(|word| word_of_length(word, length))
        .ok_or_else(|| GameError::MalformedResponse {
            service: SERVICE,
            detail: format!("expected one {length}-letter word, got {body:?}"),
        })
}

/// Parse a batch response, keeping the words in service order and skipping unusable entries.
///
/// # Errors
/// Returns `MalformedResponse` if the body is not a JSON array of strings.
pub fn parse_word_batch(body: &str, length: usize) -> Result<Vec<Word>, GameError> {
    let words = parse_word_list(body)?
        .iter()
        .filter_map(|entry| {
            let word = word_of_length(entry, length);
            if word.is_none() {
                debug!("skipping unusable word list entry {entry:?}");
            }
            word
        })
        .collect();
    Ok(words)
}
