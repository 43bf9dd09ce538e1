use std::io;

use anyhow::Context;
use clap::Parser;
use rookery::chess::game::GameState;
use rookery::Session;

/// Plays chess by the rules: reads commands from standard input and replies
/// on standard output.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Config {
    /// Initial position in Forsyth-Edwards Notation instead of the standard
    /// starting position.
    #[arg(long)]
    fen: Option<String>,
    /// Report verbose diagnostics from the start.
    #[arg(long)]
    debug: bool,
}

fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    rookery::print_engine_info();
    if config.debug {
        rookery::print_binary_info();
    }
    let game = match config.fen.as_deref() {
        Some(fen) => GameState::try_from(fen).context("invalid --fen position")?,
        None => GameState::starting(),
    };
    let mut input = io::stdin().lock();
    let mut output = io::stdout().lock();
    Session::new(game, &mut input, &mut output)
        .with_debug(config.debug)
        .run()
}
