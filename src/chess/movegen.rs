//! Pseudo-legal move generation: moves that follow piece geometry and board
//! occupancy but may leave the mover's own king attacked. Legality filtering
//! lives in [`crate::chess::game`].
//!
//! Generators are pure functions of a [`Board`] snapshot. Their output order
//! is deterministic: squares are scanned row by row starting from a8, and each
//! piece emits its moves in the order of its direction table below.

use crate::chess::board::Board;
use crate::chess::core::{Move, Piece, PieceKind, Player, Rank, Square};

/// (row, column) steps: down, up, right, left.
const ROOK_DIRECTIONS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (-1, 1), (1, -1), (-1, -1)];
/// Diagonals first, then orthogonal directions.
const QUEEN_DIRECTIONS: [(i8, i8); 8] = [
    (1, 1),
    (-1, 1),
    (1, -1),
    (-1, -1),
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
];
const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, 1),
    (-2, -1),
    (2, 1),
    (2, -1),
    (-1, 2),
    (1, 2),
    (-1, -2),
    (1, -2),
];
const KING_OFFSETS: [(i8, i8); 8] = QUEEN_DIRECTIONS;

/// Generates all pseudo-legal moves of the player's pieces.
#[must_use]
pub fn generate_pseudo_legal(board: &Board, player: Player) -> Vec<Move> {
    // Average branching factor of chess is ~35.
    let mut moves = Vec::with_capacity(64);
    for (from, piece) in board.iter() {
        match piece {
            Some(piece) if piece.owner == player => piece_moves(board, from, piece, &mut moves),
            _ => continue,
        }
    }
    moves
}

/// Returns true if any pseudo-legal move of the attacker ends on the square.
///
/// The definition follows move generation exactly: for an empty square a
/// pawn push counts, while an empty square diagonal to a pawn does not. For
/// an occupied square (e.g. a king) this is the usual notion of attack.
#[must_use]
pub fn is_attacked(board: &Board, square: Square, attacker: Player) -> bool {
    let mut moves = Vec::with_capacity(32);
    board.iter().any(|(from, piece)| match piece {
        Some(piece) if piece.owner == attacker => {
            moves.clear();
            piece_moves(board, from, piece, &mut moves);
            moves.iter().any(|candidate| candidate.end() == square)
        },
        _ => false,
    })
}

/// Appends pseudo-legal moves of a single piece standing on `from`.
pub fn piece_moves(board: &Board, from: Square, piece: Piece, moves: &mut Vec<Move>) {
    match piece.kind {
        PieceKind::Pawn => pawn_moves(board, from, piece.owner, moves),
        PieceKind::Rook => sliding_moves(board, from, piece.owner, &ROOK_DIRECTIONS, moves),
        PieceKind::Bishop => sliding_moves(board, from, piece.owner, &BISHOP_DIRECTIONS, moves),
        PieceKind::Queen => sliding_moves(board, from, piece.owner, &QUEEN_DIRECTIONS, moves),
        PieceKind::Knight => stepping_moves(board, from, piece.owner, &KNIGHT_OFFSETS, moves),
        PieceKind::King => stepping_moves(board, from, piece.owner, &KING_OFFSETS, moves),
    }
}

/// Pushes come before captures. There is no en passant and no promotion: a
/// pawn on the last row has nowhere to go.
fn pawn_moves(board: &Board, from: Square, player: Player, moves: &mut Vec<Move>) {
    let push = player.pawn_push();
    if let Some(single) = from.offset(push, 0) {
        if board.at(single).is_none() {
            moves.push(Move::new(from, single, board));
            if from.rank() == Rank::pawns_starting(player) {
                if let Some(double) = single.offset(push, 0) {
                    if board.at(double).is_none() {
                        moves.push(Move::new(from, double, board));
                    }
                }
            }
        }
    }
    for side in [-1, 1] {
        let Some(target) = from.offset(push, side) else {
            continue;
        };
        if board.at(target).is_some_and(|piece| piece.owner != player) {
            moves.push(Move::new(from, target, board));
        }
    }
}

/// Rays stop right after a capture and right before a piece of our own.
fn sliding_moves(
    board: &Board,
    from: Square,
    player: Player,
    directions: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    for &(rows, columns) in directions {
        let mut current = from;
        while let Some(to) = current.offset(rows, columns) {
            match board.at(to) {
                None => moves.push(Move::new(from, to, board)),
                Some(piece) => {
                    if piece.owner != player {
                        moves.push(Move::new(from, to, board));
                    }
                    break;
                },
            }
            current = to;
        }
    }
}

fn stepping_moves(
    board: &Board,
    from: Square,
    player: Player,
    offsets: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    for &(rows, columns) in offsets {
        let Some(to) = from.offset(rows, columns) else {
            continue;
        };
        if board.at(to).map_or(true, |piece| piece.owner != player) {
            moves.push(Move::new(from, to, board));
        }
    }
}
