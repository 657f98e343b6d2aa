// Library interface for wordle-clone
// This allows integration tests to access internal modules

pub mod cache;
pub mod cli;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod evaluator;
pub mod game_state;
pub mod logging;
pub mod selector;
pub mod session;
pub mod tui;
pub mod word;
pub mod word_source;
pub mod wordbank;

// Re-export commonly used items for easier testing
pub use error::GameError;
pub use evaluator::{GuessResult, LetterClass, evaluate};
pub use game_state::{GameInterface, GameSummary, UserAction, game_loop};
pub use session::{GameSession, GameState, GuessOutcome, Rejection};
pub use word::Word;
pub use wordbank::{WordBank, load_wordbank_from_file, load_wordbank_from_str};
