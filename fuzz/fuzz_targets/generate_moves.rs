#![no_main]
use itertools::Itertools;
use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;
use rookery::chess::core::{Move, PieceKind, Player};
use rookery::chess::game::GameState;
use shakmaty::{CastlingMode, Chess, Position};

/// Castling, en passant and promotion are not supported: skip the positions
/// where they could happen.
fn comparable(input: &str, game: &GameState) -> bool {
    let mut fields = input.split_ascii_whitespace().skip(2);
    let no_castling = fields.next().map_or(true, |castling| castling == "-");
    let no_en_passant = fields.next().map_or(true, |square| square == "-");
    let no_promotion = game.pseudo_legal_moves().iter().all(|m| {
        let last_row = match game.side_to_move() {
            Player::White => 0,
            Player::Black => 7,
        };
        !(m.moved().is_some_and(|piece| piece.kind == PieceKind::Pawn) && m.end().row() == last_row)
    });
    no_castling && no_en_passant && no_promotion
}

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(game) = GameState::from_fen(input) else {
        return;
    };
    if !comparable(input, &game) {
        return;
    }
    let Ok(shakmaty_setup) = input.parse::<shakmaty::fen::Fen>() else {
        return;
    };
    let Ok(shakmaty_position) = shakmaty_setup.into_position::<Chess>(CastlingMode::Standard)
    else {
        return;
    };
    assert_eq!(
        game.legal_moves()
            .iter()
            .map(Move::to_string)
            .sorted()
            .collect::<Vec<_>>(),
        shakmaty_position
            .legal_moves()
            .iter()
            .map(|m| m.to_uci(CastlingMode::Standard).to_string())
            .sorted()
            .collect::<Vec<_>>()
    );
});
