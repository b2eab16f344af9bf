//! Board square representation.

use std::fmt;

/// Number of rows and columns on the board.
pub const BOARD_SIZE: u8 = 8;

/// A square on the 8x8 board, indexed 0-63.
///
/// Squares are indexed row-major from the top-left corner as rendered:
/// - row 0 is the top edge (Black's home row), row 7 the bottom edge
/// - index = row * 8 + col
///
/// Algebraic names use `file = 'a' + col` and `rank = 8 - row`, so the
/// bottom-left square (row 7, col 0) is `a1`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(u8);

impl Square {
    /// Creates a square from row and column, or `None` when off the board.
    #[inline]
    pub const fn new(row: u8, col: u8) -> Option<Self> {
        if row < BOARD_SIZE && col < BOARD_SIZE {
            Some(Square(row * BOARD_SIZE + col))
        } else {
            None
        }
    }

    /// Creates a square from row and column.
    ///
    /// # Panics
    /// Panics if either coordinate is 8 or more. Intended for constants.
    #[inline]
    pub const fn at(row: u8, col: u8) -> Self {
        assert!(row < BOARD_SIZE && col < BOARD_SIZE, "square out of range");
        Square(row * BOARD_SIZE + col)
    }

    /// Creates a square from index (0-63).
    #[inline]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 64 {
            Some(Square(index))
        } else {
            None
        }
    }

    /// Parses a square from algebraic notation (e.g., "e4").
    pub const fn from_algebraic(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let file = bytes[0].to_ascii_lowercase();
        let rank = bytes[1];
        if file < b'a' || file > b'h' || rank < b'1' || rank > b'8' {
            return None;
        }
        Some(Square((b'8' - rank) * BOARD_SIZE + (file - b'a')))
    }

    /// Iterates over all 64 squares, row by row from the top.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..64u8).map(Square)
    }

    /// Returns the index (0-63).
    #[inline]
    pub const fn index(self) -> u8 {
        self.0
    }

    /// Returns the row (0 = top).
    #[inline]
    pub const fn row(self) -> u8 {
        self.0 / BOARD_SIZE
    }

    /// Returns the column (0 = left, file a).
    #[inline]
    pub const fn col(self) -> u8 {
        self.0 % BOARD_SIZE
    }

    /// Returns the square displaced by the given row and column deltas.
    #[inline]
    pub const fn offset(self, d_row: i8, d_col: i8) -> Option<Square> {
        let row = self.row() as i8 + d_row;
        let col = self.col() as i8 + d_col;
        if row < 0 || col < 0 {
            return None;
        }
        Square::new(row as u8, col as u8)
    }

    /// Returns true for the dark squares that checkers is played on.
    #[inline]
    pub const fn is_dark(self) -> bool {
        (self.row() + self.col()) % 2 == 1
    }

    /// Manhattan distance from the board centre (3.5, 3.5); 1.0 for the
    /// four central squares, 7.0 for the corners.
    pub fn center_distance(self) -> f64 {
        (3.5 - self.row() as f64).abs() + (3.5 - self.col() as f64).abs()
    }

    /// Returns true if the square lies on the outer ring of the board.
    #[inline]
    pub const fn is_edge(self) -> bool {
        let (row, col) = (self.row(), self.col());
        row == 0 || row == BOARD_SIZE - 1 || col == 0 || col == BOARD_SIZE - 1
    }

    /// Returns the algebraic notation for this square.
    pub fn to_algebraic(self) -> String {
        let file = (b'a' + self.col()) as char;
        let rank = (b'8' - self.row()) as char;
        format!("{}{}", file, rank)
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({})", self.to_algebraic())
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_algebraic())
    }
}
