//! [`GameState`] ties the board, the side to move and the move history
//! together: it applies and takes back moves and filters pseudo-legal moves
//! down to the legal ones.

use std::fmt;

use anyhow::{bail, Context};

use crate::chess::board::Board;
use crate::chess::core::{Move, Piece, PieceKind, Player, Square};
use crate::chess::history::History;
use crate::chess::movegen;

/// How the game ended. Only the side to move can be checkmated or
/// stalemated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Side to move is in check and has no legal moves.
    Checkmate,
    /// Side to move is not in check and has no legal moves.
    Stalemate,
}

/// Full state of a game in progress.
///
/// Between public calls there is exactly one king of each color, the cached
/// king squares point at them and the side to move alternates with every
/// applied or undone move. The outcome reflects the most recent
/// [`GameState::valid_moves`] call.
#[derive(Clone, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    side_to_move: Player,
    white_king: Square,
    black_king: Square,
    history: History,
    outcome: Option<Outcome>,
}

impl GameState {
    /// Standard starting position, White to move.
    ///
    /// ```
    /// use rookery::chess::game::GameState;
    ///
    /// let mut game = GameState::starting();
    /// assert_eq!(game.valid_moves().len(), 20);
    /// assert_eq!(
    ///     game.to_string(),
    ///     "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w"
    /// );
    /// ```
    #[must_use]
    pub fn starting() -> Self {
        let board = Board::starting();
        Self {
            board,
            side_to_move: Player::White,
            white_king: Square::E1,
            black_king: Square::E8,
            history: History::default(),
            outcome: None,
        }
    }

    /// Sets up a position from Forsyth-Edwards Notation.
    ///
    /// Piece placement and side to move are required. Castling rights, en
    /// passant square and move counters may follow: they are validated but
    /// do not affect the rules (castling and en passant are not supported).
    ///
    /// # Errors
    ///
    /// If the input is malformed, either side does not have exactly one king
    /// or the side that has just moved is left in check.
    pub fn from_fen(input: &str) -> anyhow::Result<Self> {
        let mut parts = input.split_ascii_whitespace();
        let board = match parts.next() {
            Some(placement) => Board::from_placement(placement)?,
            None => bail!("incorrect FEN: missing pieces placement"),
        };
        let side_to_move: Player = match parts.next() {
            Some(side) => side.try_into()?,
            None => bail!("incorrect FEN: missing side to move"),
        };
        if let Some(castling) = parts.next() {
            validate_castling(castling)?;
        }
        if let Some(en_passant) = parts.next() {
            if en_passant != "-" {
                let _ = Square::try_from(en_passant)
                    .with_context(|| format!("incorrect FEN: en passant square {en_passant}"))?;
            }
        }
        for counter in ["halfmove clock", "fullmove counter"] {
            if let Some(value) = parts.next() {
                if !value.bytes().all(|c| c.is_ascii_digit()) {
                    bail!("incorrect FEN: {counter} can only contain digits, got {value}");
                }
            }
        }
        if parts.next().is_some() {
            bail!("trailing symbols are not allowed in FEN");
        }

        let game = Self {
            white_king: board.king(Player::White)?,
            black_king: board.king(Player::Black)?,
            board,
            side_to_move,
            history: History::default(),
            outcome: None,
        };
        let waiting = side_to_move.opponent();
        if movegen::is_attacked(&game.board, game.king_square(waiting), side_to_move) {
            bail!("the side not to move can not be in check");
        }
        Ok(game)
    }

    /// Current piece placement.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn side_to_move(&self) -> Player {
        self.side_to_move
    }

    /// Square of the player's king.
    #[must_use]
    pub const fn king_square(&self, player: Player) -> Square {
        match player {
            Player::White => self.white_king,
            Player::Black => self.black_king,
        }
    }

    /// Moves played since the position was set up.
    #[must_use]
    pub const fn history(&self) -> &History {
        &self.history
    }

    /// Result computed by the last [`GameState::valid_moves`] call, if the
    /// game is over.
    #[must_use]
    pub const fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn is_checkmate(&self) -> bool {
        self.outcome == Some(Outcome::Checkmate)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn is_stalemate(&self) -> bool {
        self.outcome == Some(Outcome::Stalemate)
    }

    /// Applies the move without checking its legality: the piece leaves the
    /// start square and replaces whatever stood on the end square. Only
    /// moves built from the current board are supported.
    pub fn make_move(&mut self, next_move: Move) {
        self.board.apply(&next_move);
        if let Some(Piece {
            owner,
            kind: PieceKind::King,
        }) = next_move.moved()
        {
            self.set_king(owner, next_move.end());
        }
        self.history.push(next_move);
        self.side_to_move = self.side_to_move.opponent();
    }

    /// Takes back the most recent move and returns it. Does nothing if no
    /// moves were played.
    pub fn undo_move(&mut self) -> Option<Move> {
        let last_move = self.history.pop()?;
        self.board.revert(&last_move);
        if let Some(Piece {
            owner,
            kind: PieceKind::King,
        }) = last_move.moved()
        {
            self.set_king(owner, last_move.start());
        }
        self.side_to_move = self.side_to_move.opponent();
        Some(last_move)
    }

    /// Checked counterpart of [`GameState::make_move`]: builds the move from
    /// the current board and applies it only if it is legal.
    ///
    /// # Errors
    ///
    /// If the move is not legal. The state is left untouched.
    pub fn play(&mut self, start: Square, end: Square) -> anyhow::Result<Move> {
        let next_move = Move::new(start, end, &self.board);
        if !self.legal_moves().contains(&next_move) {
            bail!("illegal move: {next_move}");
        }
        self.make_move(next_move);
        Ok(next_move)
    }

    /// Moves of the side to move that follow piece movement rules, including
    /// those that leave its own king attacked.
    #[must_use]
    pub fn pseudo_legal_moves(&self) -> Vec<Move> {
        movegen::generate_pseudo_legal(&self.board, self.side_to_move)
    }

    /// Legal moves in generation order. Unlike [`GameState::valid_moves`]
    /// this does not update the outcome.
    #[must_use]
    pub fn legal_moves(&self) -> Vec<Move> {
        let us = self.side_to_move;
        let king = self.king_square(us);
        let mut scratch = self.board;
        let mut moves = self.pseudo_legal_moves();
        moves.retain(|candidate| {
            scratch.apply(candidate);
            let king = match candidate.moved() {
                Some(Piece {
                    kind: PieceKind::King,
                    ..
                }) => candidate.end(),
                _ => king,
            };
            let safe = !movegen::is_attacked(&scratch, king, us.opponent());
            scratch.revert(candidate);
            safe
        });
        moves
    }

    /// Legal moves of the side to move. Records checkmate or stalemate when
    /// there are none and clears the outcome otherwise.
    pub fn valid_moves(&mut self) -> Vec<Move> {
        let moves = self.legal_moves();
        self.outcome = match (moves.is_empty(), self.in_check()) {
            (false, _) => None,
            (true, true) => Some(Outcome::Checkmate),
            (true, false) => Some(Outcome::Stalemate),
        };
        moves
    }

    /// Returns true if the king of the side to move is attacked.
    #[must_use]
    pub fn in_check(&self) -> bool {
        self.is_attacked(self.king_square(self.side_to_move))
    }

    /// Returns true if the side not to move attacks the square.
    #[must_use]
    pub fn is_attacked(&self, square: Square) -> bool {
        movegen::is_attacked(&self.board, square, self.side_to_move.opponent())
    }

    fn set_king(&mut self, player: Player, square: Square) {
        match player {
            Player::White => self.white_king = square,
            Player::Black => self.black_king = square,
        }
    }
}

/// Castling rights are either "-" or a non-empty subset of "KQkq" in this
/// order.
fn validate_castling(castling: &str) -> anyhow::Result<()> {
    if castling == "-" {
        return Ok(());
    }
    let mut rest = "KQkq";
    for symbol in castling.chars() {
        match rest.find(symbol) {
            Some(position) => rest = &rest[position + 1..],
            None => bail!("incorrect FEN: unexpected castling rights {castling}"),
        }
    }
    Ok(())
}

impl TryFrom<&str> for GameState {
    type Error = anyhow::Error;

    /// Trims the input and strips an optional "fen " prefix before parsing.
    fn try_from(input: &str) -> anyhow::Result<Self> {
        let input = input.trim();
        Self::from_fen(input.strip_prefix("fen ").unwrap_or(input))
    }
}

impl fmt::Display for GameState {
    /// Prints piece placement and side to move.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.board, self.side_to_move)
    }
}

impl fmt::Debug for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:?}", self.board)?;
        writeln!(f, "Player to move: {}", self.side_to_move.name())?;
        writeln!(f, "Moves played: {}", self.history.len())?;
        writeln!(f, "FEN: {self}")?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use itertools::Itertools;
    use pretty_assertions::assert_eq;

    use super::*;

    fn setup(fen: &str) -> GameState {
        let game = GameState::try_from(fen);
        assert!(game.is_ok(), "input: {fen}");
        game.unwrap()
    }

    fn play_all(game: &mut GameState, moves: &[&str]) {
        for notation in moves {
            let next_move = Move::from_notation(notation, game.board()).unwrap();
            let _ = game.play(next_move.start(), next_move.end()).unwrap();
        }
    }

    #[test]
    fn starting_position() {
        let mut game = GameState::starting();
        assert_eq!(game.side_to_move(), Player::White);
        assert_eq!(game.king_square(Player::White), Square::E1);
        assert_eq!(game.king_square(Player::Black), Square::E8);
        assert!(!game.in_check());
        assert_eq!(game.valid_moves().len(), 20);
        assert_eq!(game.outcome(), None);
        assert!(game.history().is_empty());
        assert_eq!(
            setup("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            game
        );
    }

    #[test]
    fn fools_mate() {
        let mut game = GameState::starting();
        play_all(&mut game, &["f2f3", "e7e5", "g2g4", "d8h4"]);
        assert!(game.in_check());
        assert!(game.valid_moves().is_empty());
        assert!(game.is_checkmate());
        assert!(!game.is_stalemate());
        assert_eq!(game.outcome(), Some(Outcome::Checkmate));
        assert_eq!(game.side_to_move(), Player::White);

        // Taking the mating move back keeps the outcome until the legal moves
        // are computed again.
        let _ = game.undo_move();
        assert!(game.is_checkmate());
        assert!(!game.valid_moves().is_empty());
        assert_eq!(game.outcome(), None);
    }

    #[test]
    fn stalemate() {
        let mut game = setup("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
        assert!(!game.in_check());
        assert!(game.valid_moves().is_empty());
        assert!(game.is_stalemate());
        assert!(!game.is_checkmate());
    }

    #[test]
    fn checkmate() {
        let mut game = setup("7k/6Q1/6K1/8/8/8/8/8 b - - 0 1");
        assert!(game.in_check());
        assert!(game.valid_moves().is_empty());
        assert_eq!(game.outcome(), Some(Outcome::Checkmate));
    }

    #[test]
    fn check_evasions() {
        // Rook check along the e-file: the king steps aside, the bishop
        // blocks or the knight captures.
        let mut game = setup("4k3/8/8/8/4r3/8/3B1N2/4K3 w - - 0 1");
        assert!(game.in_check());
        assert_eq!(
            game.valid_moves().iter().map(Move::to_string).sorted().collect::<Vec<_>>(),
            ["d2e3", "e1d1", "e1f1", "f2e4"]
        );
    }

    #[test]
    fn pinned_piece() {
        // The knight on e2 shields its king from the rook and can not move.
        let mut game = setup("4r2k/8/8/8/8/8/4N3/4K3 w - - 0 1");
        assert!(game
            .valid_moves()
            .iter()
            .all(|candidate| candidate.start() != Square::E2));
        assert_eq!(game.pseudo_legal_moves().len(), 4 + 6);
    }

    #[test]
    fn king_can_not_approach_king() {
        let mut game = setup("8/8/8/8/3k4/8/3K4/8 w - - 0 1");
        assert_eq!(
            game.valid_moves().iter().map(Move::to_string).sorted().collect::<Vec<_>>(),
            ["d2c1", "d2c2", "d2d1", "d2e1", "d2e2"]
        );
    }

    #[test]
    fn pawn_capture_records_captured_piece() {
        let mut game = GameState::starting();
        play_all(&mut game, &["e2e4", "d7d5"]);
        let before = game.clone();
        let capture = game.play(Square::E4, Square::D5).unwrap();
        assert_eq!(
            capture.captured(),
            Some(Piece::new(Player::Black, PieceKind::Pawn))
        );
        assert_eq!(
            game.board().at(Square::D5),
            Some(Piece::new(Player::White, PieceKind::Pawn))
        );
        assert_eq!(game.board().at(Square::E4), None);
        assert_eq!(game.undo_move(), Some(capture));
        assert_eq!(game, before);
        assert_eq!(
            game.board().at(Square::D5),
            Some(Piece::new(Player::Black, PieceKind::Pawn))
        );
    }

    #[test]
    fn illegal_move_leaves_state_untouched() {
        let mut game = GameState::starting();
        let before = game.clone();
        let error = game.play(Square::E2, Square::E5).unwrap_err();
        assert_eq!(error.to_string(), "illegal move: e2e5");
        assert_eq!(game, before);
        // Moving the opponent's piece is illegal too.
        assert!(game.play(Square::E7, Square::E5).is_err());
        assert!(game.play(Square::E4, Square::E5).is_err());
        assert_eq!(game, before);
    }

    #[test]
    fn undo_on_empty_history() {
        let mut game = GameState::starting();
        assert_eq!(game.undo_move(), None);
        assert_eq!(game, GameState::starting());
    }

    #[test]
    fn king_tracking() {
        let mut game = GameState::starting();
        play_all(&mut game, &["e2e4", "e7e5", "e1e2", "e8e7"]);
        assert_eq!(game.king_square(Player::White), Square::E2);
        assert_eq!(game.king_square(Player::Black), Square::E7);
        assert_eq!(game.history().len(), 4);
        assert_eq!(
            game.history().iter().join(" "),
            "e2e4 e7e5 e1e2 e8e7"
        );

        let _ = game.undo_move();
        assert_eq!(game.king_square(Player::Black), Square::E8);
        assert_eq!(game.side_to_move(), Player::Black);
        let _ = game.undo_move();
        assert_eq!(game.king_square(Player::White), Square::E1);
        assert_eq!(game.side_to_move(), Player::White);
    }

    #[test]
    fn make_and_undo_round_trip() {
        for fen in [
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "2r3r1/p3k3/1p3pp1/1B5p/5P2/2P1p1P1/PP4KP/3R4 w - - 0 34",
            "4k3/8/8/8/4r3/8/3B1N2/4K3 w - - 0 1",
        ] {
            let mut game = setup(fen);
            let original = game.clone();
            for candidate in game.pseudo_legal_moves() {
                game.make_move(candidate);
                assert_ne!(game.side_to_move(), original.side_to_move());
                assert_eq!(game.history().last(), Some(&candidate));
                assert_eq!(game.undo_move(), Some(candidate));
                assert_eq!(game, original, "{fen}: {candidate}");
            }
        }
    }

    #[test]
    fn legal_moves_do_not_leave_king_in_check() {
        let mut game = setup("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w - - 0 1");
        let us = game.side_to_move();
        for candidate in game.valid_moves() {
            game.make_move(candidate);
            assert!(
                !movegen::is_attacked(game.board(), game.king_square(us), us.opponent()),
                "{candidate}"
            );
            let _ = game.undo_move();
        }
    }

    #[test]
    fn formatting() {
        let game = setup("fen 7k/5Q2/6K1/8/8/8/8/8 b - - 0 1  ");
        assert_eq!(game.to_string(), "7k/5Q2/6K1/8/8/8/8/8 b");
        assert_eq!(
            format!("{game:?}"),
            ". . . . . . . k\n\
             . . . . . Q . .\n\
             . . . . . . K .\n\
             . . . . . . . .\n\
             . . . . . . . .\n\
             . . . . . . . .\n\
             . . . . . . . .\n\
             . . . . . . . .\n\
             Player to move: black\n\
             Moves played: 0\n\
             FEN: 7k/5Q2/6K1/8/8/8/8/8 b\n"
        );
    }

    #[test]
    fn optional_fen_fields() {
        for fen in [
            "4k3/8/8/8/8/8/8/4K3 w",
            "4k3/8/8/8/8/8/8/4K3 w -",
            "4k3/8/8/8/8/8/8/4K3 w KQkq",
            "4k3/8/8/8/8/8/8/4K3 b Kq e3",
            "4k3/8/8/8/8/8/8/4K3 w - - 12",
            "4k3/8/8/8/8/8/8/4K3 w - - 0 1",
        ] {
            let _ = setup(fen);
        }
    }

    #[test]
    fn incorrect_fen() {
        for fen in [
            "",
            "4k3/8/8/8/8/8/8/4K3",
            "4k3/8/8/8/8/8/8/4K3 x",
            "4k3/8/8/8/8/8/8/4K3 w X",
            "4k3/8/8/8/8/8/8/4K3 w qk",
            "4k3/8/8/8/8/8/8/4K3 w KK",
            "4k3/8/8/8/8/8/8/4K3 w - e9",
            "4k3/8/8/8/8/8/8/4K3 w - - x",
            "4k3/8/8/8/8/8/8/4K3 w - - 0 -1",
            "4k3/8/8/8/8/8/8/4K3 w - - 0 1 extra",
            "4k3/8/8/8/8/8/8/4K3/8 w",
        ] {
            assert!(GameState::try_from(fen).is_err(), "input: {fen}");
        }
    }

    #[test]
    fn kings_are_validated() {
        assert_eq!(
            GameState::from_fen("8/8/8/8/8/8/8/8 w")
                .unwrap_err()
                .to_string(),
            "expected 1 white king, got 0"
        );
        assert_eq!(
            GameState::from_fen("kk6/8/8/8/8/8/8/4K3 w")
                .unwrap_err()
                .to_string(),
            "expected 1 black king, got 2"
        );
        assert_eq!(
            GameState::from_fen("4k3/8/8/8/8/8/8/4R1K1 w")
                .unwrap_err()
                .to_string(),
            "the side not to move can not be in check"
        );
        let _ = setup("4k3/8/8/8/8/8/8/4R1K1 b");
    }
}
