//! Chess primitives commonly used within [`crate::chess`].

use std::fmt::{self, Write};
use std::hash::{Hash, Hasher};

use anyhow::{bail, Context};
use itertools::Itertools;

use crate::chess::board::Board;

#[allow(missing_docs)]
pub const BOARD_WIDTH: u8 = 8;
#[allow(missing_docs)]
pub const BOARD_SIZE: u8 = BOARD_WIDTH * BOARD_WIDTH;

/// Board squares in row-major order: row 0 is the eighth rank (Black's side),
/// row 7 is the first rank (White's side).
///
/// ```
/// use rookery::chess::core::Square;
///
/// assert_eq!(Square::A8 as u8, 0);
/// assert_eq!(Square::H8 as u8, 7);
/// assert_eq!(Square::E2.row(), 6);
/// assert_eq!(Square::E2.column(), 4);
/// assert_eq!(Square::H1 as u8, 63);
/// ```
///
/// Iterating over squares visits them in the same order:
///
/// ```
/// use rookery::chess::core::Square;
/// use strum::IntoEnumIterator;
///
/// assert_eq!(Square::iter().nth(8), Some(Square::A7));
/// ```
#[repr(u8)]
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::EnumIter,
    strum::FromRepr,
)]
#[rustfmt::skip]
#[allow(missing_docs)]
pub enum Square {
    A8, B8, C8, D8, E8, F8, G8, H8,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A1, B1, C1, D1, E1, F1, G1, H1,
}

impl Square {
    /// Connects file (column) and rank to form a full square.
    #[must_use]
    pub fn new(file: File, rank: Rank) -> Self {
        let row = BOARD_WIDTH - 1 - rank as u8;
        Self::from_repr(row * BOARD_WIDTH + file as u8)
            .unwrap_or_else(|| unreachable!("any file and rank form a square"))
    }

    /// Creates a square from its zero-based row and column.
    ///
    /// # Errors
    ///
    /// If either coordinate is outside `0..BOARD_WIDTH`.
    pub fn from_coordinates(row: u8, column: u8) -> anyhow::Result<Self> {
        if row >= BOARD_WIDTH || column >= BOARD_WIDTH {
            bail!("square coordinates should be within 0..BOARD_WIDTH, got ({row}, {column})");
        }
        Self::from_repr(row * BOARD_WIDTH + column)
            .with_context(|| format!("no square at ({row}, {column})"))
    }

    /// Row index: 0 for the eighth rank, 7 for the first one.
    #[must_use]
    pub const fn row(self) -> u8 {
        self as u8 / BOARD_WIDTH
    }

    /// Column index: 0 for the a-file, 7 for the h-file.
    #[must_use]
    pub const fn column(self) -> u8 {
        self as u8 % BOARD_WIDTH
    }

    /// Returns file (column) on which the square is located.
    #[must_use]
    pub fn file(self) -> File {
        File::from_repr(self.column()).unwrap_or_else(|| unreachable!("column is always < 8"))
    }

    /// Returns rank on which the square is located.
    #[must_use]
    pub fn rank(self) -> Rank {
        Rank::from_repr(BOARD_WIDTH - 1 - self.row())
            .unwrap_or_else(|| unreachable!("row is always < 8"))
    }

    /// Moves the square by given number of rows and columns. Returns [`None`]
    /// if the destination falls off the board.
    #[must_use]
    pub fn offset(self, rows: i8, columns: i8) -> Option<Self> {
        let row = self.row().checked_add_signed(rows)?;
        let column = self.column().checked_add_signed(columns)?;
        if row >= BOARD_WIDTH || column >= BOARD_WIDTH {
            return None;
        }
        Self::from_repr(row * BOARD_WIDTH + column)
    }
}

impl TryFrom<&str> for Square {
    type Error = anyhow::Error;

    fn try_from(square: &str) -> anyhow::Result<Self> {
        let Some((file, rank)) = square.chars().collect_tuple() else {
            bail!(
                "square should be two-char, got {square} with {} chars",
                square.chars().count()
            )
        };
        Ok(Self::new(file.try_into()?, rank.try_into()?))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

/// Represents a column of the chessboard. In chess notation, it is normally
/// represented with a lowercase letter.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, strum::EnumIter, strum::FromRepr)]
#[allow(missing_docs)]
pub enum File {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
    F = 5,
    G = 6,
    H = 7,
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char((b'a' + *self as u8) as char)
    }
}

impl TryFrom<char> for File {
    type Error = anyhow::Error;

    fn try_from(file: char) -> anyhow::Result<Self> {
        match file {
            'a'..='h' => Self::from_repr(file as u8 - b'a')
                .with_context(|| format!("no file for '{file}'")),
            _ => bail!("file should be within 'a'..='h', got '{file}'"),
        }
    }
}

/// Represents a horizontal row of the chessboard. In chess notation, it is
/// represented with a number. The implementation assumes zero-based values
/// (i.e. rank 1 would be 0), so the rank and the board row run in opposite
/// directions.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, strum::EnumIter, strum::FromRepr)]
#[allow(missing_docs)]
pub enum Rank {
    One = 0,
    Two = 1,
    Three = 2,
    Four = 3,
    Five = 4,
    Six = 5,
    Seven = 6,
    Eight = 7,
}

impl Rank {
    pub(super) const fn backrank(player: Player) -> Self {
        match player {
            Player::White => Self::One,
            Player::Black => Self::Eight,
        }
    }

    pub(super) const fn pawns_starting(player: Player) -> Self {
        match player {
            Player::White => Self::Two,
            Player::Black => Self::Seven,
        }
    }
}

impl TryFrom<char> for Rank {
    type Error = anyhow::Error;

    fn try_from(rank: char) -> anyhow::Result<Self> {
        match rank {
            '1'..='8' => Self::from_repr(rank as u8 - b'1')
                .with_context(|| format!("no rank for '{rank}'")),
            _ => bail!("rank should be within '1'..='8', got '{rank}'"),
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self as u8 + 1)
    }
}

/// A standard game of chess is played between two players: White (having the
/// advantage of the first turn) and Black.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    White,
    Black,
}

impl Player {
    /// "Flips" the color.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Human-readable color name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }

    /// Row delta of a pawn push: White advances towards row 0.
    pub(super) const fn pawn_push(self) -> i8 {
        match self {
            Self::White => -1,
            Self::Black => 1,
        }
    }
}

impl TryFrom<&str> for Player {
    type Error = anyhow::Error;

    fn try_from(player: &str) -> anyhow::Result<Self> {
        match player {
            "w" => Ok(Self::White),
            "b" => Ok(Self::Black),
            _ => bail!("player should be 'w' or 'b', got '{player}'"),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(match &self {
            Self::White => 'w',
            Self::Black => 'b',
        })
    }
}

/// Standard [chess pieces].
///
/// [chess pieces]: https://en.wikipedia.org/wiki/Chess_piece
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

impl PieceKind {
    const fn symbol(self) -> char {
        match self {
            Self::King => 'k',
            Self::Queen => 'q',
            Self::Rook => 'r',
            Self::Bishop => 'b',
            Self::Knight => 'n',
            Self::Pawn => 'p',
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(self.symbol())
    }
}

/// Represents a specific piece owned by a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    #[allow(missing_docs)]
    pub owner: Player,
    #[allow(missing_docs)]
    pub kind: PieceKind,
}

impl Piece {
    #[allow(missing_docs)]
    #[must_use]
    pub const fn new(owner: Player, kind: PieceKind) -> Self {
        Self { owner, kind }
    }
}

impl TryFrom<char> for Piece {
    type Error = anyhow::Error;

    /// Parses the FEN symbol: uppercase for White, lowercase for Black.
    fn try_from(symbol: char) -> anyhow::Result<Self> {
        let kind = match symbol.to_ascii_lowercase() {
            'k' => PieceKind::King,
            'q' => PieceKind::Queen,
            'r' => PieceKind::Rook,
            'b' => PieceKind::Bishop,
            'n' => PieceKind::Knight,
            'p' => PieceKind::Pawn,
            _ => bail!("piece symbol should be within \"KQRBNPkqrbnp\", got '{symbol}'"),
        };
        let owner = if symbol.is_ascii_uppercase() {
            Player::White
        } else {
            Player::Black
        };
        Ok(Self { owner, kind })
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = self.kind.symbol();
        f.write_char(match self.owner {
            // White player: uppercase symbols.
            Player::White => symbol.to_ascii_uppercase(),
            // Black player: lowercase symbols.
            Player::Black => symbol,
        })
    }
}

/// A single board transition: the piece standing on `start` goes to `end`,
/// replacing whatever stood there.
///
/// A move is a snapshot: the moved and captured pieces are read from the board
/// it was created from and no legality check is performed at construction.
/// Move identity only depends on the squares, so two moves created from
/// different boards compare equal as long as they connect the same squares.
///
/// ```
/// use rookery::chess::board::Board;
/// use rookery::chess::core::{Move, Square};
///
/// let board = Board::starting();
/// let next_move = Move::new(Square::E2, Square::E4, &board);
/// assert_eq!(next_move.to_string(), "e2e4");
/// assert_eq!(next_move.id(), 6444);
/// assert!(next_move.captured().is_none());
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Move {
    start: Square,
    end: Square,
    moved: Option<Piece>,
    captured: Option<Piece>,
}

impl Move {
    /// Creates a move between two squares of the given board.
    #[must_use]
    pub fn new(start: Square, end: Square, board: &Board) -> Self {
        Self {
            start,
            end,
            moved: board.at(start),
            captured: board.at(end),
        }
    }

    /// Parses the rank/file notation (e.g. "e2e4") and captures the pieces
    /// from the given board.
    ///
    /// # Errors
    ///
    /// If the notation is not exactly two valid squares.
    pub fn from_notation(notation: &str, board: &Board) -> anyhow::Result<Self> {
        if notation.len() != 4 || !notation.is_ascii() {
            bail!("move should consist of two squares (e.g. \"e2e4\"), got \"{notation}\"");
        }
        let (start, end) = notation.split_at(2);
        Ok(Self::new(
            start
                .try_into()
                .with_context(|| format!("invalid start square in \"{notation}\""))?,
            end.try_into()
                .with_context(|| format!("invalid end square in \"{notation}\""))?,
            board,
        ))
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn start(&self) -> Square {
        self.start
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn end(&self) -> Square {
        self.end
    }

    /// The piece that stood on the start square when the move was created.
    #[must_use]
    pub const fn moved(&self) -> Option<Piece> {
        self.moved
    }

    /// The piece that stood on the end square when the move was created.
    #[must_use]
    pub const fn captured(&self) -> Option<Piece> {
        self.captured
    }

    /// Unique number encoding start and end coordinates as four decimal
    /// digits: start row, start column, end row, end column.
    #[must_use]
    pub fn id(&self) -> u16 {
        u16::from(self.start.row()) * 1000
            + u16::from(self.start.column()) * 100
            + u16::from(self.end.row()) * 10
            + u16::from(self.end.column())
    }
}

impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Move {}

impl Hash for Move {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Display for Move {
    /// Serializes a move as start and end squares.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.start, self.end)
    }
}
