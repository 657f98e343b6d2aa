//! Target word selection: cache first, then the word source, every candidate confirmed by
//! the dictionary, all within a bounded number of attempts.

use crate::cache::WordCache;
use crate::dictionary::DictionaryValidator;
use crate::error::GameError;
use crate::word::Word;
use crate::word_source::WordSource;
use log::{debug, info, warn};
use std::sync::Arc;

pub const DEFAULT_MAX_RETRIES: usize = 10;

pub struct WordSelector {
    source: Arc<dyn WordSource>,
    dictionary: Arc<dyn DictionaryValidator>,
    cache: Option<WordCache>,
    word_length: usize,
    max_retries: usize,
}

impl WordSelector {
    #[must_use]
    pub fn new(
        source: Arc<dyn WordSource>,
        dictionary: Arc<dyn DictionaryValidator>,
        word_length: usize,
    ) -> Self {
        Self {
            source,
            dictionary,
            cache: None,
            word_length,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    #[must_use]
    pub fn with_cache(mut self, cache: WordCache) -> Self {
        self.cache = Some(cache);
        self
    }

    #[must_use]
    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    #[must_use]
    pub fn dictionary(&self) -> &dyn DictionaryValidator {
        self.dictionary.as_ref()
    }

    #[must_use]
    pub fn word_length(&self) -> usize {
        self.word_length
    }

    /// Produce a dictionary-confirmed target word.
    ///
    /// # Errors
    /// Returns `WordUnavailable` once the cache and the word source have both used up
    /// their retry budget.
    pub fn select_target(&self) -> Result<Word, GameError> {
        if let Some(word) = self.select_from_cache() {
            return Ok(word);
        }

        for attempt in 1..=self.max_retries {
            match self.source.generate(self.word_length) {
                Ok(word) if word.len() != self.word_length => {
                    debug!("attempt {attempt}: source returned '{word}' of the wrong length");
                }
                Ok(word) => {
                    if self.dictionary.is_word(word.as_str()) {
                        info!("selected target word after {attempt} attempt(s)");
                        return Ok(word);
                    }
                    debug!("attempt {attempt}: '{word}' is not a dictionary word");
                }
                Err(e) => warn!("attempt {attempt}: word generation failed: {e}"),
            }
        }

        Err(GameError::WordUnavailable {
            attempts: self.max_retries,
        })
    }

    fn select_from_cache(&self) -> Option<Word> {
        let cache = self.cache.as_ref()?;
        let mut rng = rand::rng();
        for _ in 0..self.max_retries {
            let word = cache.pick(&mut rng)?;
            if self.dictionary.is_word(word.as_str()) {
                info!("selected target word from cache {}", cache.path().display());
                return Some(word);
            }
        }
        None
    }
}
