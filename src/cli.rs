use crate::cache::DEFAULT_TARGET_LINES;
use crate::config::DEFAULT_TIMEOUT_SECS;
use crate::dictionary::DEFAULT_DICTIONARY_URL;
use crate::error::GameError;
use crate::evaluator::GuessResult;
use crate::game_state::{GameInterface, UserAction};
use crate::selector::DEFAULT_MAX_RETRIES;
use crate::session::{GameSession, GuessOutcome};
use crate::word_source::DEFAULT_WORD_API_URL;
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Wordle in the terminal
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Play without network access, using a local word list
    #[arg(long)]
    pub offline: bool,

    /// Word list for offline play, one word per line (defaults to the built-in list)
    #[arg(long, value_name = "PATH", requires = "offline")]
    pub wordbank: Option<PathBuf>,

    /// Remove entries the dictionary does not confirm from the word cache, then exit
    #[arg(long, conflicts_with_all = ["offline", "no_cache"])]
    pub prune_cache: bool,

    /// Plain line-based interface instead of the full-screen one
    #[arg(long)]
    pub simple: bool,

    /// Path of the word cache file
    #[arg(long = "cache", value_name = "PATH")]
    pub cache_path: Option<PathBuf>,

    /// Do not read or fill the word cache
    #[arg(long, conflicts_with = "cache_path")]
    pub no_cache: bool,

    /// Number of words the background task keeps in the cache
    #[arg(long, value_name = "N", default_value_t = DEFAULT_TARGET_LINES)]
    pub cache_lines: usize,

    /// Timeout for each word list or dictionary request, in seconds
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Attempts at finding a valid target word before giving up
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_RETRIES)]
    pub retries: usize,

    /// Random word service URL
    #[arg(long, value_name = "URL", default_value = DEFAULT_WORD_API_URL)]
    pub word_api: String,

    /// Dictionary service URL; the word is appended to it
    #[arg(long, value_name = "URL", default_value = DEFAULT_DICTIONARY_URL)]
    pub dictionary_api: String,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Write log output to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[must_use]
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Parse one line of player input.
#[must_use]
pub fn parse_input(line: &str) -> UserAction {
    let input = line.trim();
    match input.to_ascii_lowercase().as_str() {
        "exit" | "quit" => UserAction::Exit,
        "new" | "next" | "restart" => UserAction::Restart,
        _ => UserAction::Guess(input.to_string()),
    }
}

/// Two lines: the guessed letters and, beneath each, the color painted on its box.
///
/// `G` correct position, `Y` present elsewhere, `X` absent, `-` left unpainted.
#[must_use]
pub fn format_result(result: &GuessResult) -> String {
    let letters: Vec<String> = result
        .letters()
        .iter()
        .map(|c| c.to_ascii_uppercase().to_string())
        .collect();
    let marks: Vec<String> = result
        .colors()
        .into_iter()
        .map(|color| color.map_or('-', |class| class.marker()).to_string())
        .collect();
    format!("{}\n{}", letters.join(" "), marks.join(" "))
}

/// Line-mode implementation of the `GameInterface` trait.
///
/// Reads commands from any `BufRead` and writes to any `Write`, stdout by default.
pub struct CliInterface<R: BufRead, W: Write = io::Stdout> {
    reader: R,
    writer: W,
}

impl<R: BufRead> CliInterface<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            writer: io::stdout(),
        }
    }
}

impl<R: BufRead, W: Write> CliInterface<R, W> {
    pub fn with_writer(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    // Output is best effort: a closed stdout should not abort the game.
    fn say(&mut self, text: &str) {
        let _ = writeln!(self.writer, "{text}");
    }
}

impl<R: BufRead, W: Write> GameInterface for CliInterface<R, W> {
    fn display_new_game(&mut self, session: &GameSession) {
        self.say(&format!(
            "New game! Guess the {}-letter word in {} attempts.",
            session.word_length(),
            session.max_attempts()
        ));
        self.say("Type 'new' to start over or 'exit' to quit.");
    }

    fn read_action(&mut self) -> Option<UserAction> {
        self.say("\nEnter your guess:");
        let _ = self.writer.flush();
        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) | Err(_) => Some(UserAction::Exit),
            Ok(_) => Some(parse_input(&line)),
        }
    }

    fn display_outcome(&mut self, session: &GameSession, _guess: &str, outcome: &GuessOutcome) {
        if let Some(result) = outcome.result() {
            self.say(&format_result(result));
            if !session.state().is_terminal() {
                let banned: String = session.banned_letters().iter().collect();
                self.say(&format!(
                    "Attempt {}/{}. Banned letters: {}",
                    session.attempt() + 1,
                    session.max_attempts(),
                    if banned.is_empty() { "none" } else { banned.as_str() }
                ));
            }
        }
        if let Some(message) = outcome.message() {
            self.say(&message);
        }
    }

    fn display_notice(&mut self, message: &str) {
        self.say(message);
    }

    fn display_error(&mut self, error: &GameError) {
        self.say(&format!("Error: {error}"));
    }

    fn display_exit_message(&mut self) {
        self.say("Exiting.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::evaluate;
    use crate::word::Word;
    use std::io::Cursor;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("wordle-clone").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_parse_cli_no_args() {
        let cli = cli(&[]);
        assert!(!cli.offline);
        assert!(!cli.simple);
        assert_eq!(cli.cache_path, None);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_parse_cli_flags() {
        let cli = cli(&["--offline", "--simple", "-vv", "--log-file", "game.log"]);
        assert!(cli.offline);
        assert!(cli.simple);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.log_file, Some(PathBuf::from("game.log")));
    }

    #[test]
    fn test_cache_and_no_cache_conflict() {
        let parsed = Cli::try_parse_from(["wordle-clone", "--cache", "words.txt", "--no-cache"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_wordbank_requires_offline() {
        assert!(Cli::try_parse_from(["wordle-clone", "--wordbank", "words.txt"]).is_err());
        let cli = cli(&["--offline", "--wordbank", "words.txt"]);
        assert_eq!(cli.wordbank, Some(PathBuf::from("words.txt")));
    }

    #[test]
    fn test_prune_cache_needs_the_network_cache() {
        assert!(cli(&["--prune-cache"]).prune_cache);
        assert!(Cli::try_parse_from(["wordle-clone", "--prune-cache", "--offline"]).is_err());
        assert!(Cli::try_parse_from(["wordle-clone", "--prune-cache", "--no-cache"]).is_err());
    }

    #[test]
    fn test_parse_input_commands() {
        assert_eq!(parse_input("exit\n"), UserAction::Exit);
        assert_eq!(parse_input("  QUIT "), UserAction::Exit);
        assert_eq!(parse_input("new"), UserAction::Restart);
        assert_eq!(parse_input("Next"), UserAction::Restart);
        assert_eq!(parse_input("restart"), UserAction::Restart);
    }

    #[test]
    fn test_parse_input_guess_is_trimmed() {
        assert_eq!(
            parse_input("  Crane \n"),
            UserAction::Guess("Crane".to_string())
        );
        assert_eq!(parse_input(""), UserAction::Guess(String::new()));
    }

    #[test]
    fn test_format_result_marks() {
        let target = Word::parse("crane").unwrap();
        let guess = Word::parse("crate").unwrap();
        assert_eq!(
            format_result(&evaluate(&target, &guess)),
            "C R A T E\nG G G X G"
        );
    }

    #[test]
    fn test_format_result_unpainted_boxes() {
        let target = Word::parse("aabcc").unwrap();
        let guess = Word::parse("aabaa").unwrap();
        assert_eq!(
            format_result(&evaluate(&target, &guess)),
            "A A B A A\nY G G - -"
        );
    }

    #[test]
    fn test_read_action_eof_exits() {
        let mut interface = CliInterface::with_writer(Cursor::new(""), Vec::new());
        assert_eq!(interface.read_action(), Some(UserAction::Exit));
    }

    #[test]
    fn test_read_action_sequence() {
        let input = "crane\nnew\nexit\n";
        let mut interface = CliInterface::with_writer(Cursor::new(input), Vec::new());
        assert_eq!(
            interface.read_action(),
            Some(UserAction::Guess("crane".to_string()))
        );
        assert_eq!(interface.read_action(), Some(UserAction::Restart));
        assert_eq!(interface.read_action(), Some(UserAction::Exit));
        let output = String::from_utf8(interface.writer().clone()).unwrap();
        assert_eq!(output.matches("Enter your guess:").count(), 3);
    }
}
