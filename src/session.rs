//! The game state machine.
//!
//! A session is created from a dictionary-confirmed target word and changes only through
//! [`GameSession::submit_guess`] and [`GameSession::restart`]. Rejected guesses never touch
//! its state.

use crate::dictionary::DictionaryValidator;
use crate::error::GameError;
use crate::evaluator::{GuessResult, evaluate};
use crate::selector::WordSelector;
use crate::word::Word;
use log::{debug, info};
use std::collections::BTreeSet;
use std::fmt;

pub const MAX_ATTEMPTS: usize = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameState {
    InProgress,
    Won,
    Lost,
}

impl GameState {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

/// Why a guess was turned away.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rejection {
    GameOver,
    NotAlphabetic,
    WrongLength { expected: usize },
    RepeatedGuess,
    BannedLetters,
    NotAWord,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GameOver => f.write_str("The game is over. Start a new game to keep playing."),
            Self::NotAlphabetic => f.write_str("Only letters are allowed."),
            Self::WrongLength { expected } => {
                write!(f, "Your guess must contain {expected} letters.")
            }
            Self::RepeatedGuess => f.write_str("Don't reuse the same guess twice in a row."),
            Self::BannedLetters => f.write_str("Your guess contains banned letters."),
            Self::NotAWord => f.write_str("Input an actual word this time."),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuessOutcome {
    Rejected(Rejection),
    /// Accepted, game continues.
    Continue(GuessResult),
    Won {
        result: GuessResult,
        target: Word,
        attempts: usize,
    },
    Lost {
        result: GuessResult,
        target: Word,
    },
}

impl GuessOutcome {
    /// The evaluation of an accepted guess.
    #[must_use]
    pub fn result(&self) -> Option<&GuessResult> {
        match self {
            Self::Rejected(_) => None,
            Self::Continue(result) | Self::Won { result, .. } | Self::Lost { result, .. } => {
                Some(result)
            }
        }
    }

    /// The status line shown to the player, if the outcome has one.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Rejected(reason) => Some(reason.to_string()),
            Self::Continue(_) => None,
            Self::Won {
                target,
                attempts: 1,
                ..
            } => Some(format!(
                "Wow! You managed to guess \"{target}\" in a single attempt!"
            )),
            Self::Won {
                target, attempts, ..
            } => Some(format!(
                "Correct! You managed to guess \"{target}\" in {attempts} attempts!"
            )),
            Self::Lost { target, .. } => Some(format!("You failed to guess \"{target}\".")),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RestartOutcome {
    Restarted,
    /// Nothing to restart: no guess has been made yet.
    NothingToRestart,
}

impl RestartOutcome {
    #[must_use]
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Self::Restarted => None,
            Self::NothingToRestart => Some("You haven't made a guess yet, so why restart?"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GameSession {
    target: Word,
    attempt: usize,
    max_attempts: usize,
    banned: BTreeSet<char>,
    previous_guess: Option<Word>,
    state: GameState,
}

impl GameSession {
    fn new(target: Word) -> Self {
        Self {
            target,
            attempt: 0,
            max_attempts: MAX_ATTEMPTS,
            banned: BTreeSet::new(),
            previous_guess: None,
            state: GameState::InProgress,
        }
    }

    /// Start a session on a freshly selected target word.
    ///
    /// # Errors
    /// Returns `WordUnavailable` if no confirmed target word could be selected.
    pub fn start(selector: &WordSelector) -> Result<Self, GameError> {
        let target = selector.select_target()?;
        info!("new game started with a {}-letter word", target.len());
        Ok(Self::new(target))
    }

    /// Start a session on a known target, which must be a dictionary word.
    ///
    /// # Errors
    /// Returns `InvalidWord` if `target` is not a word and `WordUnavailable` if the
    /// dictionary does not confirm it.
    pub fn with_target<D>(target: &str, dictionary: &D) -> Result<Self, GameError>
    where
        D: DictionaryValidator + ?Sized,
    {
        let target = Word::parse(target)?;
        if !dictionary.is_word(target.as_str()) {
            return Err(GameError::WordUnavailable { attempts: 1 });
        }
        Ok(Self::new(target))
    }

    #[must_use]
    pub fn target(&self) -> &Word {
        &self.target
    }

    #[must_use]
    pub fn word_length(&self) -> usize {
        self.target.len()
    }

    #[must_use]
    pub fn attempt(&self) -> usize {
        self.attempt
    }

    #[must_use]
    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    #[must_use]
    pub fn banned_letters(&self) -> &BTreeSet<char> {
        &self.banned
    }

    #[must_use]
    pub fn previous_guess(&self) -> Option<&Word> {
        self.previous_guess.as_ref()
    }

    #[must_use]
    pub fn state(&self) -> GameState {
        self.state
    }

    /// Check a raw guess and, if it is acceptable, play it.
    pub fn submit_guess<D>(&mut self, raw: &str, dictionary: &D) -> GuessOutcome
    where
        D: DictionaryValidator + ?Sized,
    {
        let guess = match self.screen_guess(raw, dictionary) {
            Ok(guess) => guess,
            Err(reason) => {
                debug!("guess '{}' rejected: {reason:?}", raw.trim());
                return GuessOutcome::Rejected(reason);
            }
        };

        let result = evaluate(&self.target, &guess);
        self.banned.extend(result.banned().iter().copied());
        self.attempt += 1;
        self.previous_guess = Some(guess);

        if result.is_win() {
            self.state = GameState::Won;
            info!("game won in {} attempt(s)", self.attempt);
            GuessOutcome::Won {
                result,
                target: self.target.clone(),
                attempts: self.attempt,
            }
        } else if self.attempt >= self.max_attempts {
            self.state = GameState::Lost;
            info!("game lost after {} attempts", self.attempt);
            GuessOutcome::Lost {
                result,
                target: self.target.clone(),
            }
        } else {
            GuessOutcome::Continue(result)
        }
    }

    /// Replace this session with a fresh one, unless no guess has been made yet.
    ///
    /// # Errors
    /// Returns `WordUnavailable` if no new target could be selected; the current session is
    /// left as it was.
    pub fn restart(&mut self, selector: &WordSelector) -> Result<RestartOutcome, GameError> {
        if self.attempt == 0 {
            return Ok(RestartOutcome::NothingToRestart);
        }
        *self = Self::start(selector)?;
        Ok(RestartOutcome::Restarted)
    }

    fn screen_guess<D>(&self, raw: &str, dictionary: &D) -> Result<Word, Rejection>
    where
        D: DictionaryValidator + ?Sized,
    {
        if self.state.is_terminal() {
            return Err(Rejection::GameOver);
        }
        let normalized = raw.trim().to_ascii_lowercase();
        if !normalized.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(Rejection::NotAlphabetic);
        }
        if normalized.len() != self.target.len() {
            return Err(Rejection::WrongLength {
                expected: self.target.len(),
            });
        }
        let guess = Word::parse(&normalized).map_err(|_| Rejection::NotAlphabetic)?;
        if self.previous_guess.as_ref() == Some(&guess) {
            return Err(Rejection::RepeatedGuess);
        }
        if guess.as_str().chars().any(|c| self.banned.contains(&c)) {
            return Err(Rejection::BannedLetters);
        }
        // The target is already dictionary-confirmed.
        if guess != self.target && !dictionary.is_word(guess.as_str()) {
            return Err(Rejection::NotAWord);
        }
        Ok(guess)
    }
}
