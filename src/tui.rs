//! Full-screen terminal interface built on Ratatui.
//!
//! # Architecture
//! - `TuiModel`: everything shown on screen plus key handling, free of any terminal
//! - `TuiInterface`: owns the terminal, draws the model and feeds it key events
//!
//! # State Machine
//! - `EnteringGuess` → `GameOver` once the session is won or lost
//! - `GameOver` → `EnteringGuess` when a new game starts

use crate::error::GameError;
use crate::evaluator::{GuessResult, LetterClass};
use crate::game_state::{GameInterface, UserAction};
use crate::session::{GameSession, GuessOutcome};
use crate::{debug_log, info_log};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::collections::BTreeSet;
use std::io;
use std::time::Duration;

const EVENT_POLL_TIMEOUT_MS: u64 = 100;
const ROW_SPACING: u16 = 2;

// Style constants for consistent UI
const HEADER_STYLE: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);
const ERROR_STYLE: Style = Style::new().fg(Color::Red);
const SUCCESS_STYLE: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);
const INFO_STYLE: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);
const MESSAGE_STYLE: Style = Style::new().fg(Color::Cyan);
const BANNED_STYLE: Style = Style::new()
    .fg(Color::DarkGray)
    .add_modifier(Modifier::CROSSED_OUT);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum LetterState {
    /// Typed, or part of an evaluated guess but never painted.
    Entered,
    Match,        // Green
    PartialMatch, // Yellow
    NoMatch,      // Gray
}

impl LetterState {
    fn colors(self) -> (Color, Color) {
        match self {
            Self::Entered => (Color::DarkGray, Color::White),
            Self::Match => (Color::Green, Color::Black),
            Self::PartialMatch => (Color::Yellow, Color::Black),
            Self::NoMatch => (Color::Gray, Color::White),
        }
    }
}

impl From<Option<LetterClass>> for LetterState {
    fn from(color: Option<LetterClass>) -> Self {
        match color {
            Some(LetterClass::CorrectPosition) => Self::Match,
            Some(LetterClass::PresentElsewhere) => Self::PartialMatch,
            Some(LetterClass::Absent) => Self::NoMatch,
            None => Self::Entered,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct GuessRow {
    letters: Vec<char>,
    states: Vec<LetterState>,
}

impl GuessRow {
    fn from_result(result: &GuessResult) -> Self {
        Self {
            letters: result
                .letters()
                .iter()
                .map(char::to_ascii_uppercase)
                .collect(),
            states: result.colors().into_iter().map(LetterState::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TuiState {
    EnteringGuess,
    /// Session won or lost; the outcome is in `message`.
    GameOver,
}

/// Screen contents and input handling, independent of the terminal.
#[derive(Debug)]
struct TuiModel {
    word_length: usize,
    max_attempts: usize,
    rows: Vec<GuessRow>,
    current_input: String,
    banned: BTreeSet<char>,
    state: TuiState,
    message: String,
    message_style: Style,
    error_message: String,
    status: String,
}

impl TuiModel {
    fn new() -> Self {
        Self {
            word_length: crate::config::WORD_LENGTH,
            max_attempts: crate::session::MAX_ATTEMPTS,
            rows: Vec::new(),
            current_input: String::new(),
            banned: BTreeSet::new(),
            state: TuiState::EnteringGuess,
            message: String::new(),
            message_style: MESSAGE_STYLE,
            error_message: String::new(),
            status: "Ready".to_string(),
        }
    }

    fn reset(&mut self, session: &GameSession) {
        self.word_length = session.word_length();
        self.max_attempts = session.max_attempts();
        self.rows.clear();
        self.current_input.clear();
        self.banned.clear();
        self.state = TuiState::EnteringGuess;
        self.set_message(
            format!("New game! Guess the {}-letter word.", self.word_length),
            MESSAGE_STYLE,
        );
        self.update_status(session);
    }

    /// Show `text` as the one status message, replacing any error.
    fn set_message(&mut self, text: String, style: Style) {
        self.message = text;
        self.message_style = style;
        self.error_message.clear();
    }

    /// Show `text` as the one status message, in the error style.
    fn set_error(&mut self, text: String) {
        self.error_message = text;
        self.message.clear();
    }

    fn clear_messages(&mut self) {
        self.message.clear();
        self.error_message.clear();
    }

    fn update_status(&mut self, session: &GameSession) {
        self.status = match self.state {
            TuiState::EnteringGuess => format!(
                "Attempt {}/{}",
                session.attempt() + 1,
                session.max_attempts()
            ),
            TuiState::GameOver => "Game over".to_string(),
        };
    }

    fn apply_outcome(&mut self, session: &GameSession, outcome: &GuessOutcome) {
        match outcome {
            GuessOutcome::Rejected(reason) => {
                // The input stays so the player can fix it.
                self.set_error(reason.to_string());
            }
            GuessOutcome::Continue(result) => {
                self.rows.push(GuessRow::from_result(result));
                self.current_input.clear();
                self.clear_messages();
            }
            GuessOutcome::Won { result, .. } | GuessOutcome::Lost { result, .. } => {
                self.rows.push(GuessRow::from_result(result));
                self.current_input.clear();
                self.state = TuiState::GameOver;
                let style = if matches!(outcome, GuessOutcome::Won { .. }) {
                    SUCCESS_STYLE
                } else {
                    INFO_STYLE
                };
                self.set_message(outcome.message().unwrap_or_default(), style);
            }
        }
        self.banned.clone_from(session.banned_letters());
        self.update_status(session);
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<UserAction> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return Some(UserAction::Exit),
            KeyCode::F(5) => return Some(UserAction::Restart),
            KeyCode::Char('r' | 'R') if ctrl => return Some(UserAction::Restart),
            _ => {}
        }
        match self.state {
            TuiState::EnteringGuess => self.handle_guess_input(key),
            TuiState::GameOver => Self::handle_game_over_input(key),
        }
    }

    fn handle_guess_input(&mut self, key: KeyEvent) -> Option<UserAction> {
        if key
            .modifiers
            .intersects(KeyModifiers::ALT | KeyModifiers::CONTROL)
        {
            debug_log!("Ignoring key with modifier: {:?}", key.modifiers);
            return None;
        }
        match key.code {
            KeyCode::Char(c) if c.is_ascii_alphabetic() => {
                if self.current_input.len() < self.word_length {
                    self.current_input.push(c.to_ascii_uppercase());
                    self.error_message.clear();
                }
            }
            KeyCode::Char(c) => {
                self.set_error(format!("Only letters are allowed! ('{c}' is not a letter)"));
            }
            KeyCode::Backspace => {
                self.current_input.pop();
                self.error_message.clear();
            }
            KeyCode::Enter => {
                info_log!("Submitting guess '{}'", self.current_input);
                return Some(UserAction::Guess(self.current_input.to_ascii_lowercase()));
            }
            _ => {
                debug_log!("Ignoring key: {:?}", key.code);
            }
        }
        None
    }

    fn handle_game_over_input(key: KeyEvent) -> Option<UserAction> {
        match key.code {
            KeyCode::Char('n' | 'N') => Some(UserAction::Restart),
            _ => None,
        }
    }

    fn showing_current_input(&self) -> bool {
        self.state == TuiState::EnteringGuess && self.rows.len() < self.max_attempts
    }

    fn instructions(&self) -> &'static str {
        match self.state {
            TuiState::EnteringGuess => "Type your guess | ENTER: Submit | F5/Ctrl-R: New game | ESC: Quit",
            TuiState::GameOver => "N: New Game | ESC: Quit",
        }
    }
}

/// Full-screen implementation of the `GameInterface` trait.
pub struct TuiInterface {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    model: TuiModel,
}

impl TuiInterface {
    /// # Errors
    /// Returns an error if the terminal cannot be switched to raw mode or the alternate screen.
    pub fn new() -> Result<Self, io::Error> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        info_log!("Terminal setup complete");

        Ok(Self {
            terminal,
            model: TuiModel::new(),
        })
    }

    /// Restore the terminal.
    ///
    /// # Errors
    /// Returns an error if the terminal refuses to leave raw mode or the alternate screen.
    pub fn cleanup(&mut self) -> Result<(), io::Error> {
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            cursor::Show
        )?;
        Ok(())
    }

    fn draw(&mut self) -> Result<(), io::Error> {
        let model = &self.model;
        self.terminal.draw(|f| render(f, model))?;
        Ok(())
    }

    fn draw_or_log(&mut self) {
        if let Err(e) = self.draw() {
            debug_log!("Draw error: {}", e);
        }
    }

    fn handle_input(&mut self) -> Result<Option<UserAction>, io::Error> {
        if !event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            return Ok(None);
        }
        match event::read()? {
            // Only Press, so Release and Repeat do not double the input
            Event::Key(key) if key.kind == event::KeyEventKind::Press => {
                Ok(self.model.handle_key(key))
            }
            other => {
                debug_log!("Ignoring event: {:?}", other);
                Ok(None)
            }
        }
    }
}

fn render(f: &mut Frame, model: &TuiModel) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Title
            Constraint::Length(14), // Game board
            Constraint::Min(8),     // Letters and messages
            Constraint::Length(3),  // Status line
            Constraint::Length(3),  // Instructions
        ])
        .split(f.area());

    render_title(f, chunks[0]);
    render_board(f, chunks[1], model);
    render_info(f, chunks[2], model);
    render_status(f, chunks[3], &model.status);
    render_instructions(f, chunks[4], model.instructions());
}

fn render_title(f: &mut Frame, area: Rect) {
    let title = Paragraph::new("WORDLE")
        .style(HEADER_STYLE)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, area);
}

fn render_board(f: &mut Frame, area: Rect, model: &TuiModel) {
    let block = Block::default().title("Guesses").borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let available_rows = (inner.height / ROW_SPACING) as usize;
    let rows_needed = model.rows.len() + usize::from(model.showing_current_input());
    // Keep the most recent rows visible
    let skip_count = rows_needed.saturating_sub(available_rows);

    let visible = &model.rows[skip_count.min(model.rows.len())..];
    for (display_index, row) in visible.iter().enumerate() {
        render_guess_row(f, inner, display_index, &row.letters, &row.states);
    }

    if model.showing_current_input() {
        let letters: Vec<char> = (0..model.word_length)
            .map(|i| model.current_input.chars().nth(i).unwrap_or(' '))
            .collect();
        let states = vec![LetterState::Entered; model.word_length];
        render_guess_row(f, inner, visible.len(), &letters, &states);
    }
}

#[allow(clippy::cast_possible_truncation)]
fn render_guess_row(
    f: &mut Frame,
    area: Rect,
    row_index: usize,
    letters: &[char],
    states: &[LetterState],
) {
    let y = area.y + (row_index as u16 * ROW_SPACING);
    if y >= area.y + area.height {
        return;
    }

    let mut spans = vec![Span::raw("  ")];
    for (letter, state) in letters.iter().zip(states) {
        let (bg_color, fg_color) = state.colors();
        spans.push(Span::styled(
            format!(" {letter} "),
            Style::default().fg(fg_color).bg(bg_color),
        ));
        spans.push(Span::raw(" "));
    }
    render_line(f, area, y, spans);
}

fn render_line(f: &mut Frame, area: Rect, y: u16, spans: Vec<Span>) {
    let paragraph = Paragraph::new(Line::from(spans));
    f.render_widget(
        paragraph,
        Rect {
            x: area.x,
            y,
            width: area.width,
            height: 1,
        },
    );
}

fn alphabet_line(banned: &BTreeSet<char>) -> Line<'static> {
    let spans: Vec<Span> = ('a'..='z')
        .map(|c| {
            let style = if banned.contains(&c) {
                BANNED_STYLE
            } else {
                Style::default().fg(Color::White)
            };
            Span::styled(format!("{} ", c.to_ascii_uppercase()), style)
        })
        .collect();
    Line::from(spans)
}

fn render_info(f: &mut Frame, area: Rect, model: &TuiModel) {
    let mut lines = vec![
        Line::from(vec![Span::styled("Letters:", HEADER_STYLE)]),
        alphabet_line(&model.banned),
        Line::from(""),
    ];

    if !model.message.is_empty() {
        lines.push(Line::from(vec![Span::styled(
            model.message.as_str(),
            model.message_style,
        )]));
    }
    if !model.error_message.is_empty() {
        lines.push(Line::from(vec![Span::styled(
            model.error_message.as_str(),
            ERROR_STYLE,
        )]));
    }

    let paragraph = Paragraph::new(lines)
        .block(Block::default().title("Information").borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_status(f: &mut Frame, area: Rect, status: &str) {
    let paragraph = Paragraph::new(status)
        .style(HEADER_STYLE)
        .block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(paragraph, area);
}

fn render_instructions(f: &mut Frame, area: Rect, text: &str) {
    let paragraph = Paragraph::new(text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(paragraph, area);
}

impl GameInterface for TuiInterface {
    fn display_new_game(&mut self, session: &GameSession) {
        self.model.reset(session);
        self.draw_or_log();
    }

    fn read_action(&mut self) -> Option<UserAction> {
        loop {
            if self.draw().is_err() {
                return Some(UserAction::Exit);
            }
            match self.handle_input() {
                Ok(Some(action)) => return Some(action),
                Ok(None) => {}
                Err(e) => {
                    debug_log!("Input error: {}", e);
                    return Some(UserAction::Exit);
                }
            }
        }
    }

    fn display_outcome(&mut self, session: &GameSession, _guess: &str, outcome: &GuessOutcome) {
        self.model.apply_outcome(session, outcome);
        self.draw_or_log();
    }

    fn display_notice(&mut self, message: &str) {
        self.model.set_message(message.to_string(), MESSAGE_STYLE);
        self.draw_or_log();
    }

    fn display_error(&mut self, error: &GameError) {
        self.model.set_error(error.to_string());
        self.draw_or_log();
    }

    fn display_exit_message(&mut self) {
        self.model.status = "Exiting...".to_string();
        self.draw_or_log();
    }
}

impl Drop for TuiInterface {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
