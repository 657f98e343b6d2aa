//! Newline-delimited cache of candidate target words and the background task that fills it.
//!
//! The cache is advisory. A missing or unreadable file is an empty cache, readers only look
//! at newline-terminated lines so a concurrent append never yields a torn word, and during
//! play the file is only appended to. `WordCache::prune` rewrites it and must not run
//! alongside a filler.

use crate::dictionary::{DictionaryValidator, prune_word_file};
use crate::error::GameError;
use crate::word::{Word, word_of_length};
use crate::word_source::WordSource;
use log::{debug, info, warn};
use rand::Rng;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

/// Below this many entries the cache is not used for selection.
pub const MIN_CACHED_WORDS: usize = 10;
pub const DEFAULT_TARGET_LINES: usize = 250;
pub const DEFAULT_BATCH_SIZE: usize = 25;
/// Consecutive failed batch requests after which the filler gives up.
pub const MAX_FILL_FAILURES: usize = 3;

#[derive(Debug, Clone)]
pub struct WordCache {
    path: PathBuf,
    word_length: usize,
}

impl WordCache {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, word_length: usize) -> Self {
        Self {
            path: path.into(),
            word_length,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Complete lines currently in the file, including ones that are not usable words.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.complete_contents().lines().count()
    }

    /// Usable words from the complete lines of the file.
    #[must_use]
    pub fn words(&self) -> Vec<Word> {
        self.complete_contents()
            .lines()
            .filter_map(|line| word_of_length(line, self.word_length))
            .collect()
    }

    /// Pick a random cached word, or `None` if the cache holds too few words.
    ///
    /// Only one half of the entries, chosen at random, is considered.
    pub fn pick<R: Rng>(&self, rng: &mut R) -> Option<Word> {
        let words = self.words();
        if words.len() < MIN_CACHED_WORDS {
            debug!(
                "cache {} holds {} words, not using it",
                self.path.display(),
                words.len()
            );
            return None;
        }
        let half = words.len() / 2;
        let range = if rng.random_bool(0.5) {
            0..half
        } else {
            half..words.len()
        };
        let index = rng.random_range(range);
        Some(words[index].clone())
    }

    /// Drop entries the dictionary does not confirm. Returns the removed lines.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or rewritten.
    pub fn prune(&self, dictionary: &dyn DictionaryValidator) -> Result<Vec<String>, GameError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let removed = prune_word_file(dictionary, &self.path)?;
        info!(
            "pruned {} entries from word cache {}",
            removed.len(),
            self.path.display()
        );
        Ok(removed)
    }

    /// Append words, one per line, in a single write.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or written.
    pub fn append(&self, words: &[Word]) -> io::Result<()> {
        if words.is_empty() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut buffer = String::with_capacity(words.len() * (self.word_length + 1));
        for word in words {
            buffer.push_str(word.as_str());
            buffer.push('\n');
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(buffer.as_bytes())?;
        file.flush()
    }

    fn complete_contents(&self) -> String {
        let mut contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return String::new(),
            Err(e) => {
                warn!("could not read word cache {}: {e}", self.path.display());
                return String::new();
            }
        };
        let complete = contents.rfind('\n').map_or(0, |i| i + 1);
        contents.truncate(complete);
        contents
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FillSettings {
    pub target_lines: usize,
    pub batch_size: usize,
}

impl Default for FillSettings {
    fn default() -> Self {
        Self {
            target_lines: DEFAULT_TARGET_LINES,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

/// Fill `cache` with dictionary-confirmed words until it reaches the target size or `stop`
/// is raised. Gives up after `MAX_FILL_FAILURES` consecutive rounds that add no word.
/// Returns the number of words appended.
pub fn fill_cache(
    cache: &WordCache,
    source: &dyn WordSource,
    dictionary: &dyn DictionaryValidator,
    settings: FillSettings,
    stop: &AtomicBool,
) -> usize {
    let mut appended = 0;
    let mut failures = 0;

    while !stop.load(Ordering::Relaxed) && cache.line_count() < settings.target_lines {
        let batch = source
            .generate_batch(cache.word_length, settings.batch_size)
            .unwrap_or_else(|e| {
                warn!("cache fill request failed: {e}");
                Vec::new()
            });

        let mut confirmed = Vec::with_capacity(batch.len());
        for word in batch {
            if stop.load(Ordering::Relaxed) {
                break;
            }
            if dictionary.is_word(word.as_str()) {
                confirmed.push(word);
            }
        }

        // A round that adds nothing counts as a failure, whatever the cause.
        if confirmed.is_empty() {
            failures += 1;
            debug!("cache fill round added no words ({failures}/{MAX_FILL_FAILURES})");
            if failures >= MAX_FILL_FAILURES {
                warn!("cache fill giving up after {failures} rounds without new words");
                break;
            }
            continue;
        }
        failures = 0;

        if let Err(e) = cache.append(&confirmed) {
            warn!("could not append to word cache {}: {e}", cache.path.display());
            break;
        }
        appended += confirmed.len();
        debug!("cache fill appended {} words", confirmed.len());
    }

    appended
}

/// Handle to the background cache fill thread.
///
/// Dropping the handle asks the thread to stop without waiting for it.
pub struct CacheFiller {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<usize>>,
}

impl CacheFiller {
    pub fn spawn(
        cache: WordCache,
        source: Arc<dyn WordSource>,
        dictionary: Arc<dyn DictionaryValidator>,
        settings: FillSettings,
    ) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let handle = thread::spawn(move || {
            info!("cache fill started for {}", cache.path.display());
            let appended =
                fill_cache(&cache, source.as_ref(), dictionary.as_ref(), settings, &flag);
            info!("cache fill finished, {appended} words appended");
            appended
        });
        Self {
            stop,
            handle: Some(handle),
        }
    }

    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// Stop the thread and wait for it. Returns the number of words it appended.
    pub fn stop(mut self) -> usize {
        self.request_stop();
        self.handle
            .take()
            .and_then(|handle| handle.join().ok())
            .unwrap_or(0)
    }
}

impl Drop for CacheFiller {
    fn drop(&mut self) {
        self.request_stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::Lookup;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::sync::atomic::AtomicUsize;

    fn temp_cache(name: &str) -> WordCache {
        let path = std::env::temp_dir().join(format!("wordle_clone_cache_{name}.txt"));
        let _ = fs::remove_file(&path);
        WordCache::new(path, 5)
    }

    fn words(list: &[&str]) -> Vec<Word> {
        list.iter().map(|w| Word::parse(w).unwrap()).collect()
    }

    struct CountingSource {
        calls: AtomicUsize,
    }

    impl WordSource for CountingSource {
        fn generate(&self, _length: usize) -> Result<Word, GameError> {
            let n = self.calls.fetch_add(1, Ordering::Relaxed);
            let letter = (b'a' + (n % 26) as u8) as char;
            Ok(Word::parse(&letter.to_string().repeat(5)).unwrap())
        }
    }

    struct FailingSource;

    impl WordSource for FailingSource {
        fn generate(&self, _length: usize) -> Result<Word, GameError> {
            Err(GameError::WordUnavailable { attempts: 1 })
        }
    }

    /// Accepts every word except "bbbbb".
    struct PickyDictionary;

    impl DictionaryValidator for PickyDictionary {
        fn check(&self, word: &str) -> Result<Lookup, GameError> {
            Ok(if word == "bbbbb" {
                Lookup::NotFound
            } else {
                Lookup::Found
            })
        }
    }

    #[test]
    fn missing_file_is_empty() {
        let cache = temp_cache("missing");
        assert_eq!(cache.line_count(), 0);
        assert!(cache.words().is_empty());
        assert!(cache.pick(&mut StdRng::seed_from_u64(1)).is_none());
    }

    #[test]
    fn append_then_read_back() {
        let cache = temp_cache("append");
        cache.append(&words(&["crane", "slate"])).unwrap();
        cache.append(&words(&["pride"])).unwrap();
        let read: Vec<String> = cache.words().iter().map(Word::to_string).collect();
        assert_eq!(read, vec!["crane", "slate", "pride"]);
        fs::remove_file(cache.path()).unwrap();
    }

    #[test]
    fn partial_trailing_line_is_ignored() {
        let cache = temp_cache("partial");
        fs::write(cache.path(), "crane\nslate\npri").unwrap();
        assert_eq!(cache.line_count(), 2);
        assert_eq!(cache.words().len(), 2);
        fs::remove_file(cache.path()).unwrap();
    }

    #[test]
    fn unusable_lines_are_skipped() {
        let cache = temp_cache("unusable");
        fs::write(cache.path(), "crane\ncranes\n12345\n\nslate\n").unwrap();
        assert_eq!(cache.words().len(), 2);
        fs::remove_file(cache.path()).unwrap();
    }

    #[test]
    fn prune_drops_unconfirmed_entries() {
        let cache = temp_cache("prune");
        fs::write(cache.path(), "aaaaa\nbbbbb\n\nccccc\n").unwrap();
        let removed = cache.prune(&PickyDictionary).unwrap();
        assert_eq!(removed, vec!["bbbbb"]);
        let kept: Vec<String> = cache.words().iter().map(Word::to_string).collect();
        assert_eq!(kept, vec!["aaaaa", "ccccc"]);
        fs::remove_file(cache.path()).unwrap();
    }

    #[test]
    fn prune_of_missing_file_is_a_no_op() {
        let cache = temp_cache("prune_missing");
        assert!(cache.prune(&PickyDictionary).unwrap().is_empty());
        assert!(!cache.path().exists());
    }

    #[test]
    fn small_cache_is_not_used() {
        let cache = temp_cache("small");
        cache.append(&words(&["crane", "slate", "pride"])).unwrap();
        assert!(cache.pick(&mut StdRng::seed_from_u64(7)).is_none());
        fs::remove_file(cache.path()).unwrap();
    }

    #[test]
    fn pick_returns_a_cached_word() {
        let cache = temp_cache("pick");
        let stored = words(&[
            "about", "above", "actor", "adult", "after", "again", "agent", "agree", "ahead",
            "alarm", "album", "alert",
        ]);
        cache.append(&stored).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            let word = cache.pick(&mut rng).unwrap();
            assert!(stored.contains(&word));
        }
        fs::remove_file(cache.path()).unwrap();
    }

    #[test]
    fn fill_stops_at_target() {
        let cache = temp_cache("fill_target");
        let source = CountingSource {
            calls: AtomicUsize::new(0),
        };
        let settings = FillSettings {
            target_lines: 12,
            batch_size: 5,
        };
        let stop = AtomicBool::new(false);
        let appended = fill_cache(&cache, &source, &PickyDictionary, settings, &stop);
        // Three batches of five, minus the one rejected "bbbbb".
        assert_eq!(appended, 14);
        assert_eq!(cache.line_count(), 14);
        assert!(!cache.words().iter().any(|w| w.as_str() == "bbbbb"));
        fs::remove_file(cache.path()).unwrap();
    }

    #[test]
    fn fill_gives_up_after_repeated_failures() {
        let cache = temp_cache("fill_fail");
        let settings = FillSettings::default();
        let stop = AtomicBool::new(false);
        let appended = fill_cache(&cache, &FailingSource, &PickyDictionary, settings, &stop);
        assert_eq!(appended, 0);
        assert_eq!(cache.line_count(), 0);
    }

    /// Every lookup fails, as when the dictionary service is unreachable.
    struct UnreachableDictionary;

    impl DictionaryValidator for UnreachableDictionary {
        fn check(&self, _word: &str) -> Result<Lookup, GameError> {
            Err(GameError::UnexpectedStatus {
                service: "dictionary",
                status: 503,
            })
        }
    }

    #[test]
    fn fill_gives_up_when_nothing_is_confirmed() {
        let cache = temp_cache("fill_unconfirmed");
        let source = CountingSource {
            calls: AtomicUsize::new(0),
        };
        let settings = FillSettings {
            target_lines: 250,
            batch_size: 5,
        };
        let stop = AtomicBool::new(false);
        let appended = fill_cache(&cache, &source, &UnreachableDictionary, settings, &stop);
        assert_eq!(appended, 0);
        assert_eq!(cache.line_count(), 0);
        // One batch per failed round.
        assert_eq!(
            source.calls.load(Ordering::Relaxed),
            MAX_FILL_FAILURES * settings.batch_size
        );
    }

    #[test]
    fn fill_honours_stop_flag() {
        let cache = temp_cache("fill_stop");
        let source = CountingSource {
            calls: AtomicUsize::new(0),
        };
        let stop = AtomicBool::new(true);
        let appended = fill_cache(&cache, &source, &PickyDictionary, FillSettings::default(), &stop);
        assert_eq!(appended, 0);
        assert_eq!(source.calls.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn background_filler_can_be_stopped() {
        let cache = temp_cache("filler_thread");
        let source: Arc<dyn WordSource> = Arc::new(CountingSource {
            calls: AtomicUsize::new(0),
        });
        let settings = FillSettings {
            target_lines: 20,
            batch_size: 10,
        };
        let dictionary: Arc<dyn DictionaryValidator> = Arc::new(PickyDictionary);
        let filler = CacheFiller::spawn(cache.clone(), source, dictionary, settings);
        let appended = filler.stop();
        assert_eq!(cache.line_count(), appended);
        let _ = fs::remove_file(cache.path());
    }
}
