//! [Perft] (*per*formance *t*esting) is a technique for checking correctness of
//! move generation (tested functions are generate move, make move and undo
//! move).
//!
//! [Perft]: https://www.chessprogramming.org/Perft

use crate::chess::game::GameState;

/// Counts the leaves of the legal move tree of the given depth. The game is
/// returned to its original state, outcome included.
///
/// ```
/// use rookery::chess::game::GameState;
/// use rookery::chess::perft::perft;
///
/// let mut game = GameState::starting();
/// assert_eq!(perft(&mut game, 2), 400);
/// assert!(game.history().is_empty());
/// ```
pub fn perft(game: &mut GameState, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = game.legal_moves();
    if depth == 1 {
        return moves.len() as u64;
    }
    let mut nodes = 0;
    for next_move in moves {
        game.make_move(next_move);
        nodes += perft(game, depth - 1);
        let _ = game.undo_move();
    }
    nodes
}

/// Node counts below each legal move of the root, in generation order.
#[must_use]
pub fn divide(game: &mut GameState, depth: u8) -> Vec<(String, u64)> {
    let moves = game.legal_moves();
    let mut result = Vec::with_capacity(moves.len());
    for next_move in moves {
        game.make_move(next_move);
        result.push((next_move.to_string(), perft(game, depth.saturating_sub(1))));
        let _ = game.undo_move();
    }
    result
}
