//! Implementation of chess rules: board representation, move generation,
//! check detection and game state with move history.

pub mod board;
pub mod core;
pub mod game;
pub mod history;
pub mod movegen;
pub mod perft;
