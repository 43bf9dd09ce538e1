//! The session is a line-oriented text front end for a [`GameState`]: it sets
//! up positions, applies checked moves, takes them back and reports the game
//! outcome.
//!
//! [`Session::run`] is the "main loop" which reads commands from the input
//! stream and writes replies to the output stream. Diagnostics are reported as
//! `info string` lines; verbose ones only appear in debug mode.

use std::fmt;
use std::io::{BufRead, Write};

use itertools::Itertools;

use crate::chess::core::Move;
use crate::chess::game::{GameState, Outcome};
use crate::chess::perft::perft;
use crate::session::command::Command;

mod command;

/// Connects a game with the I/O streams and handles commands sent through
/// them.
pub struct Session<'a, R: BufRead, W: Write> {
    game: GameState,
    input: &'a mut R,
    output: &'a mut W,
    debug: bool,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    /// Creates a session that starts from the given position.
    #[must_use]
    pub fn new(game: GameState, input: &'a mut R, output: &'a mut W) -> Self {
        Self {
            game,
            input,
            output,
            debug: false,
        }
    }

    /// Enables or disables verbose diagnostics.
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Continuously reads the input stream and executes commands until "quit"
    /// is sent or the input is exhausted.
    ///
    /// Malformed commands, positions and illegal moves are reported and
    /// skipped without changing the game.
    ///
    /// # Errors
    ///
    /// If reading the input or writing the output fails.
    pub fn run(&mut self) -> anyhow::Result<()> {
        self.refresh()?;
        loop {
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                break;
            }
            match Command::parse(&line) {
                Command::SetPosition { fen, moves } => {
                    self.handle_position(fen.as_deref(), &moves)?;
                },
                Command::Move(notation) => {
                    if self.apply(&notation)? {
                        self.refresh()?;
                    }
                },
                Command::Undo => self.handle_undo()?,
                Command::Moves => self.handle_moves()?,
                Command::Display => write!(self.output, "{:?}", self.game)?,
                Command::History => {
                    let line = std::iter::once("history".to_string())
                        .chain(self.game.history().iter().map(Move::to_string))
                        .join(" ");
                    writeln!(self.output, "{line}")?;
                },
                Command::Perft { depth } => {
                    let nodes = perft(&mut self.game, depth);
                    writeln!(self.output, "nodes {nodes}")?;
                },
                Command::Debug { on } => {
                    self.debug = on;
                    self.trace(format_args!("debug mode enabled"))?;
                },
                Command::IsReady => writeln!(self.output, "readyok")?,
                Command::Id => self.handle_id()?,
                Command::Quit => break,
                Command::Empty => {},
                Command::Unknown(command) => {
                    self.report(format_args!("unsupported command: {command}"))?;
                },
            }
        }
        Ok(())
    }

    /// Replaces the game with the given position and plays the moves on top of
    /// it. An invalid position keeps the current game; the first rejected move
    /// stops the sequence.
    fn handle_position(&mut self, fen: Option<&str>, moves: &[String]) -> anyhow::Result<()> {
        self.game = match fen {
            None => GameState::starting(),
            Some(fen) => match GameState::from_fen(fen) {
                Ok(game) => game,
                Err(e) => {
                    self.report(format_args!("invalid position: {e:#}"))?;
                    return Ok(());
                },
            },
        };
        for notation in moves {
            if !self.apply(notation)? {
                break;
            }
        }
        self.refresh()
    }

    /// Plays a move given in rank/file notation if it is legal. Returns
    /// whether the move was applied.
    fn apply(&mut self, notation: &str) -> anyhow::Result<bool> {
        let played = Move::from_notation(notation, self.game.board())
            .and_then(|next_move| self.game.play(next_move.start(), next_move.end()));
        match played {
            Ok(played) => {
                self.trace(format_args!("applied {played}"))?;
                Ok(true)
            },
            Err(e) => {
                self.report(format_args!("{e:#}"))?;
                Ok(false)
            },
        }
    }

    fn handle_undo(&mut self) -> anyhow::Result<()> {
        match self.game.undo_move() {
            Some(undone) => {
                self.trace(format_args!("undone {undone}"))?;
                self.refresh()
            },
            None => self.trace(format_args!("nothing to undo")),
        }
    }

    fn handle_moves(&mut self) -> anyhow::Result<()> {
        let line = std::iter::once("moves".to_string())
            .chain(self.game.valid_moves().iter().map(Move::to_string))
            .join(" ");
        writeln!(self.output, "{line}")?;
        Ok(())
    }

    fn handle_id(&mut self) -> anyhow::Result<()> {
        writeln!(
            self.output,
            "id name {} {}",
            env!("CARGO_PKG_NAME"),
            crate::engine_version()
        )?;
        writeln!(self.output, "id author {}", env!("CARGO_PKG_AUTHORS"))?;
        Ok(())
    }

    /// Recomputes the legal moves after a state change and announces the end
    /// of the game.
    fn refresh(&mut self) -> anyhow::Result<()> {
        let replies = self.game.valid_moves().len();
        let side = self.game.side_to_move();
        self.trace(format_args!("{replies} legal moves for {}", side.name()))?;
        match self.game.outcome() {
            Some(Outcome::Checkmate) => {
                writeln!(self.output, "checkmate {} wins", side.opponent().name())?;
            },
            Some(Outcome::Stalemate) => writeln!(self.output, "stalemate")?,
            None => {},
        }
        Ok(())
    }

    /// Reports a problem to the client.
    fn report(&mut self, message: fmt::Arguments<'_>) -> anyhow::Result<()> {
        writeln!(self.output, "info string {message}")?;
        Ok(())
    }

    /// Reports verbose diagnostics in debug mode only.
    fn trace(&mut self, message: fmt::Arguments<'_>) -> anyhow::Result<()> {
        if self.debug {
            self.report(message)?;
        }
        Ok(())
    }
}
