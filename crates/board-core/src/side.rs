//! Player side representation.

/// The two players of a board game.
///
/// `White` sits at the bottom of the board (rows 6-7 at the start) and moves
/// first. `Black` sits at the top. Checkers front-ends label `White` as red.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Side {
    White = 0,
    Black = 1,
}

impl Side {
    /// Both sides, in turn order.
    pub const BOTH: [Side; 2] = [Side::White, Side::Black];

    /// Returns the opposite side.
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    /// Returns the index (0 for White, 1 for Black).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the row delta of a forward step (-1 for White, +1 for Black).
    #[inline]
    pub const fn forward(self) -> i8 {
        match self {
            Side::White => -1,
            Side::Black => 1,
        }
    }

    /// Returns the back row for this side (7 for White, 0 for Black).
    #[inline]
    pub const fn home_row(self) -> u8 {
        match self {
            Side::White => 7,
            Side::Black => 0,
        }
    }

    /// Returns the far row, where pawns and men promote.
    #[inline]
    pub const fn promotion_row(self) -> u8 {
        self.opposite().home_row()
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::White => write!(f, "White"),
            Side::Black => write!(f, "Black"),
        }
    }
}
