use crate::word::WordError;
use thiserror::Error;

/// Errors raised by the word collaborators and session construction.
#[derive(Debug, Error)]
pub enum GameError {
    /// No dictionary-confirmed word could be produced within the retry budget.
    #[error("could not find a valid word after {attempts} attempts")]
    WordUnavailable { attempts: usize },

    #[error("request failed")]
    Http(#[from] reqwest::Error),

    #[error("{service} answered with status {status}")]
    UnexpectedStatus { service: &'static str, status: u16 },

    #[error("malformed response from {service}: {detail}")]
    MalformedResponse {
        service: &'static str,
        detail: String,
    },

    #[error("word cache I/O error")]
    Io(#[from] std::io::Error),

    #[error("invalid word")]
    InvalidWord(#[from] WordError),
}
