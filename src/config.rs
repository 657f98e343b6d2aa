use crate::cache::{FillSettings, WordCache};
use crate::cli::Cli;
use crate::dictionary::{DEFAULT_DICTIONARY_URL, DictionaryValidator, HttpDictionary};
use crate::error::GameError;
use crate::selector::{DEFAULT_MAX_RETRIES, WordSelector};
use crate::word_source::{DEFAULT_WORD_API_URL, HttpWordSource, WordSource};
use crate::wordbank::{WordBank, load_wordbank_from_file};
use log::info;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

pub const WORD_LENGTH: usize = 5;
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;
const CACHE_DIR_NAME: &str = "wordle-clone";
const CACHE_FILE_NAME: &str = "words.txt";
const FALLBACK_CACHE_PATH: &str = "cache";

/// Per-user location of the word cache, falling back to `./cache`.
#[must_use]
pub fn default_cache_path() -> PathBuf {
    dirs::cache_dir().map_or_else(
        || PathBuf::from(FALLBACK_CACHE_PATH),
        |dir| dir.join(CACHE_DIR_NAME).join(CACHE_FILE_NAME),
    )
}

/// The word source and dictionary the game and the cache filler share.
#[derive(Clone)]
pub struct Collaborators {
    pub source: Arc<dyn WordSource>,
    pub dictionary: Arc<dyn DictionaryValidator>,
}

#[derive(Debug, Clone)]
pub struct GameConfig {
    pub word_length: usize,
    pub offline: bool,
    /// Offline word list; `None` uses the built-in one.
    pub wordbank_path: Option<PathBuf>,
    pub word_api_url: String,
    pub dictionary_api_url: String,
    pub request_timeout: Duration,
    pub max_retries: usize,
    /// `None` disables the cache entirely.
    pub cache_path: Option<PathBuf>,
    pub fill: FillSettings,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            word_length: WORD_LENGTH,
            offline: false,
            wordbank_path: None,
            word_api_url: DEFAULT_WORD_API_URL.to_string(),
            dictionary_api_url: DEFAULT_DICTIONARY_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            cache_path: Some(default_cache_path()),
            fill: FillSettings::default(),
        }
    }
}

impl GameConfig {
    #[must_use]
    pub fn from_cli(cli: &Cli) -> Self {
        let defaults = Self::default();
        let cache_path = if cli.no_cache || cli.offline {
            None
        } else {
            cli.cache_path.clone().or_else(|| defaults.cache_path.clone())
        };
        Self {
            offline: cli.offline,
            wordbank_path: cli.wordbank.clone(),
            word_api_url: cli.word_api.clone(),
            dictionary_api_url: cli.dictionary_api.clone(),
            request_timeout: Duration::from_secs(cli.timeout.max(1)),
            max_retries: cli.retries.max(1),
            cache_path,
            fill: FillSettings {
                target_lines: cli.cache_lines,
                ..defaults.fill
            },
            ..defaults
        }
    }

    /// Build the word source and dictionary: a word list when offline, the HTTP services
    /// otherwise.
    ///
    /// # Errors
    /// Returns an error if the offline word list cannot be read or an HTTP client cannot be
    /// built.
    pub fn collaborators(&self) -> Result<Collaborators, GameError> {
        if self.offline {
            let bank = match &self.wordbank_path {
                Some(path) => WordBank::new(load_wordbank_from_file(path, self.word_length)?),
                None => WordBank::embedded(self.word_length),
            };
            info!("offline play with {} words", bank.len());
            let bank = Arc::new(bank);
            return Ok(Collaborators {
                source: bank.clone(),
                dictionary: bank,
            });
        }
        Ok(Collaborators {
            source: Arc::new(HttpWordSource::new(
                self.word_api_url.clone(),
                self.request_timeout,
            )?),
            dictionary: Arc::new(HttpDictionary::new(
                self.dictionary_api_url.clone(),
                self.request_timeout,
            )?),
        })
    }

    #[must_use]
    pub fn cache(&self) -> Option<WordCache> {
        self.cache_path
            .as_ref()
            .map(|path| WordCache::new(path.clone(), self.word_length))
    }

    #[must_use]
    pub fn selector(&self, collaborators: &Collaborators) -> WordSelector {
        let selector = WordSelector::new(
            Arc::clone(&collaborators.source),
            Arc::clone(&collaborators.dictionary),
            self.word_length,
        )
        .with_max_retries(self.max_retries);
        match self.cache() {
            Some(cache) => selector.with_cache(cache),
            None => selector,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(args: &[&str]) -> GameConfig {
        let cli = Cli::try_parse_from(std::iter::once("wordle-clone").chain(args.iter().copied()))
            .unwrap();
        GameConfig::from_cli(&cli)
    }

    #[test]
    fn defaults_match_the_game() {
        let config = parse(&[]);
        assert_eq!(config.word_length, 5);
        assert!(!config.offline);
        assert_eq!(config.word_api_url, DEFAULT_WORD_API_URL);
        assert_eq!(config.dictionary_api_url, DEFAULT_DICTIONARY_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.fill.target_lines, 250);
        assert_eq!(config.fill.batch_size, 25);
        assert_eq!(config.cache_path, Some(default_cache_path()));
    }

    #[test]
    fn cache_can_be_moved_or_disabled() {
        let config = parse(&["--cache", "/tmp/words.txt"]);
        assert_eq!(config.cache_path, Some(PathBuf::from("/tmp/words.txt")));
        assert!(parse(&["--no-cache"]).cache().is_none());
    }

    #[test]
    fn offline_play_skips_the_cache() {
        let config = parse(&["--offline"]);
        assert!(config.offline);
        assert!(config.cache().is_none());
        let collaborators = config.collaborators().unwrap();
        assert!(collaborators.dictionary.is_word("crane"));
        let target = config.selector(&collaborators).select_target().unwrap();
        assert_eq!(target.len(), 5);
    }

    #[test]
    fn offline_play_from_a_word_list_file() {
        let path = std::env::temp_dir().join("wordle_clone_config_wordbank.txt");
        std::fs::write(&path, "PLUMB\nnotaword5\nabc\n").unwrap();
        let config = parse(&["--offline", "--wordbank", path.to_str().unwrap()]);
        let collaborators = config.collaborators().unwrap();
        assert!(collaborators.dictionary.is_word("plumb"));
        assert!(!collaborators.dictionary.is_word("crane"));
        let target = config.selector(&collaborators).select_target().unwrap();
        assert_eq!(target.as_str(), "plumb");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_word_list_is_an_error() {
        let config = parse(&["--offline", "--wordbank", "/nonexistent/wordle_clone_words.txt"]);
        assert!(matches!(config.collaborators(), Err(GameError::Io(_))));
    }

    #[test]
    fn numeric_options_have_floors() {
        let config = parse(&["--timeout", "0", "--retries", "0", "--cache-lines", "40"]);
        assert_eq!(config.request_timeout, Duration::from_secs(1));
        assert_eq!(config.max_retries, 1);
        assert_eq!(config.fill.target_lines, 40);
    }

    #[test]
    fn default_cache_path_is_named_for_the_game() {
        let path = default_cache_path();
        assert!(path.ends_with("wordle-clone/words.txt") || path == PathBuf::from("cache"));
    }
}
