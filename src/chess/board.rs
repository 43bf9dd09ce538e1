//! Square-centric board representation: a fixed 8×8 grid where every square
//! holds either a [`Piece`] or nothing.

use std::fmt::{self, Write};

use anyhow::bail;
use strum::IntoEnumIterator;

use crate::chess::core::{
    File,
    Move,
    Piece,
    PieceKind,
    Player,
    Rank,
    Square,
    BOARD_SIZE,
    BOARD_WIDTH,
};

/// Pieces placed on the board by file, from the a-file to the h-file.
const BACKRANK: [PieceKind; BOARD_WIDTH as usize] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Piece placement on all 64 squares, indexed in [`Square`] order (row-major,
/// row 0 is Black's back rank).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Board {
    squares: [Option<Piece>; BOARD_SIZE as usize],
}

impl Board {
    /// Board with no pieces at all.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            squares: [None; BOARD_SIZE as usize],
        }
    }

    /// Standard starting placement.
    ///
    /// ```
    /// use rookery::chess::board::Board;
    ///
    /// assert_eq!(
    ///     Board::starting().to_string(),
    ///     "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"
    /// );
    /// ```
    #[must_use]
    pub fn starting() -> Self {
        let mut board = Self::empty();
        for player in [Player::White, Player::Black] {
            for (file, kind) in File::iter().zip(BACKRANK) {
                board.set(
                    Square::new(file, Rank::backrank(player)),
                    Some(Piece::new(player, kind)),
                );
                board.set(
                    Square::new(file, Rank::pawns_starting(player)),
                    Some(Piece::new(player, PieceKind::Pawn)),
                );
            }
        }
        board
    }

    /// Parses the piece placement part of Forsyth-Edwards Notation: eight
    /// ranks separated by '/', starting from the eighth one.
    ///
    /// # Errors
    ///
    /// If the placement does not describe exactly 8 ranks of 8 squares or
    /// contains unknown symbols.
    pub fn from_placement(placement: &str) -> anyhow::Result<Self> {
        let mut board = Self::empty();
        let mut rows = 0;
        for rank_fen in placement.split('/') {
            if rows == BOARD_WIDTH {
                bail!("incorrect FEN: expected 8 ranks, got {placement}");
            }
            let mut column: u8 = 0;
            for symbol in rank_fen.chars() {
                if column >= BOARD_WIDTH {
                    bail!("incorrect FEN: rank {rank_fen} exceeds {BOARD_WIDTH} squares");
                }
                match symbol {
                    '0' => bail!("increment can not be 0"),
                    '1'..='8' => {
                        column += symbol as u8 - b'0';
                        continue;
                    },
                    _ => (),
                }
                let piece = Piece::try_from(symbol)?;
                board.set(Square::from_coordinates(rows, column)?, Some(piece));
                column += 1;
            }
            if column != BOARD_WIDTH {
                bail!(
                    "incorrect FEN: rank size should be exactly {BOARD_WIDTH}, got {rank_fen} of \
                     length {column}"
                );
            }
            rows += 1;
        }
        if rows != BOARD_WIDTH {
            bail!("incorrect FEN: there should be 8 ranks, got {placement}");
        }
        Ok(board)
    }

    /// Returns the piece standing on the square, if any.
    #[must_use]
    pub const fn at(&self, square: Square) -> Option<Piece> {
        self.squares[square as usize]
    }

    pub(super) fn set(&mut self, square: Square, piece: Option<Piece>) {
        self.squares[square as usize] = piece;
    }

    /// Visits every square in row-major order together with its contents.
    pub fn iter(&self) -> impl Iterator<Item = (Square, Option<Piece>)> + '_ {
        Square::iter().map(|square| (square, self.at(square)))
    }

    /// Grid view for rendering: eight rows of eight squares, row 0 first.
    pub fn rows(&self) -> impl Iterator<Item = &[Option<Piece>]> + '_ {
        self.squares.chunks_exact(BOARD_WIDTH as usize)
    }

    /// Squares occupied by the given piece.
    pub(super) fn find(&self, piece: Piece) -> impl Iterator<Item = Square> + '_ {
        self.iter()
            .filter(move |(_, occupant)| *occupant == Some(piece))
            .map(|(square, _)| square)
    }

    /// Locates the only king of the player.
    ///
    /// # Errors
    ///
    /// If the player has no king or more than one.
    pub(super) fn king(&self, player: Player) -> anyhow::Result<Square> {
        let kings = self
            .find(Piece::new(player, PieceKind::King))
            .collect::<Vec<_>>();
        match kings.as_slice() {
            [king] => Ok(*king),
            _ => bail!("expected 1 {} king, got {}", player.name(), kings.len()),
        }
    }

    /// Moves the piece from the start square to the end square, overwriting
    /// the previous occupant of the end square.
    pub(super) fn apply(&mut self, next_move: &Move) {
        self.set(next_move.start(), None);
        self.set(next_move.end(), next_move.moved());
    }

    /// Exact inverse of [`Board::apply`]: puts both recorded pieces back.
    pub(super) fn revert(&mut self, last_move: &Move) {
        self.set(last_move.start(), last_move.moved());
        self.set(last_move.end(), last_move.captured());
    }
}

impl fmt::Display for Board {
    /// Prints board representation in FEN format.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, squares) in self.rows().enumerate() {
            let mut empty_squares = 0;
            for square in squares {
                if let Some(piece) = square {
                    if empty_squares != 0 {
                        write!(f, "{empty_squares}")?;
                        empty_squares = 0;
                    }
                    write!(f, "{piece}")?;
                } else {
                    empty_squares += 1;
                }
            }
            if empty_squares != 0 {
                write!(f, "{empty_squares}")?;
            }
            if row + 1 != BOARD_WIDTH as usize {
                const RANK_SEPARATOR: char = '/';
                f.write_char(RANK_SEPARATOR)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    /// Dumps the board in a simple format ('.' for empty square, FEN algebraic
    /// symbol for piece) a-la Stockfish "debug" command in UCI mode.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, squares) in self.rows().enumerate() {
            for (column, square) in squares.iter().enumerate() {
                match square {
                    Some(piece) => write!(f, "{piece}"),
                    None => f.write_char('.'),
                }?;
                if column + 1 != BOARD_WIDTH as usize {
                    write!(f, "{SQUARE_SEPARATOR}")?;
                }
            }
            if row + 1 != BOARD_WIDTH as usize {
                write!(f, "{LINE_SEPARATOR}")?;
            }
        }
        Ok(())
    }
}

const LINE_SEPARATOR: &str = "\n";
const SQUARE_SEPARATOR: &str = " ";
