//! Glue between a user interface and the game session.
//!
//! Interfaces only translate input into [`UserAction`]s and render what they are given; every
//! rule lives in [`GameSession`].

use crate::error::GameError;
use crate::selector::WordSelector;
use crate::session::{GameSession, GuessOutcome, RestartOutcome};
use log::info;

/// Shown while a target word is being selected, which may involve network requests.
pub const SELECTING_MESSAGE: &str = "Choosing a word...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    Guess(String),
    Restart,
    Exit,
}

/// A front end the game loop can drive.
pub trait GameInterface {
    /// A fresh session has started (at launch or after a restart).
    fn display_new_game(&mut self, session: &GameSession);

    /// Next user action, or `None` if the input produced nothing to act on.
    fn read_action(&mut self) -> Option<UserAction>;

    /// Result of submitting `guess`; `session` already reflects the outcome.
    fn display_outcome(&mut self, session: &GameSession, guess: &str, outcome: &GuessOutcome);

    /// A status message replacing whatever was shown before.
    fn display_notice(&mut self, message: &str);

    fn display_error(&mut self, error: &GameError);

    fn display_exit_message(&mut self);
}

/// Tally of finished games over one run of the loop.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GameSummary {
    pub won: usize,
    pub lost: usize,
}

/// Run games until the user exits.
///
/// # Errors
/// Returns `WordUnavailable` if the first target word cannot be selected. Later selection
/// failures (on restart) are shown to the user and the current game continues.
pub fn game_loop<I>(selector: &WordSelector, interface: &mut I) -> Result<GameSummary, GameError>
where
    I: GameInterface + ?Sized,
{
    interface.display_notice(SELECTING_MESSAGE);
    let mut session = match GameSession::start(selector) {
        Ok(session) => session,
        Err(e) => {
            interface.display_error(&e);
            return Err(e);
        }
    };
    interface.display_new_game(&session);

    let mut summary = GameSummary::default();
    loop {
        let Some(action) = interface.read_action() else {
            continue;
        };
        match action {
            UserAction::Exit => {
                interface.display_exit_message();
                break;
            }
            UserAction::Guess(raw) => {
                let outcome = session.submit_guess(&raw, selector.dictionary());
                match outcome {
                    GuessOutcome::Won { .. } => summary.won += 1,
                    GuessOutcome::Lost { .. } => summary.lost += 1,
                    GuessOutcome::Rejected(_) | GuessOutcome::Continue(_) => {}
                }
                interface.display_outcome(&session, &raw, &outcome);
            }
            UserAction::Restart => {
                if session.attempt() > 0 {
                    interface.display_notice(SELECTING_MESSAGE);
                }
                match session.restart(selector) {
                    Ok(RestartOutcome::Restarted) => interface.display_new_game(&session),
                    Ok(outcome) => {
                        if let Some(message) = outcome.message() {
                            interface.display_notice(message);
                        }
                    }
                    Err(e) => interface.display_error(&e),
                }
            }
        }
    }

    info!(
        "leaving game loop: {} won, {} lost",
        summary.won, summary.lost
    );
    Ok(summary)
}
