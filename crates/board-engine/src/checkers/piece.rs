//! Checkers piece representation.

use board_core::{BoardPiece, PieceKind, Side};

/// A man moves forward only; a king moves in all four diagonals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckersKind {
    Man,
    King,
}

impl PieceKind for CheckersKind {
    fn symbol(self) -> char {
        match self {
            CheckersKind::Man => 'm',
            CheckersKind::King => 'k',
        }
    }
}

/// A checkers piece.
///
/// Placement characters are `r`/`R` for the first player's (red, [`Side::White`])
/// men and kings and `b`/`B` for the second player's (black).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CheckersPiece {
    pub kind: CheckersKind,
    pub side: Side,
}

impl CheckersPiece {
    #[inline]
    pub const fn man(side: Side) -> Self {
        CheckersPiece {
            kind: CheckersKind::Man,
            side,
        }
    }

    #[inline]
    pub const fn king(side: Side) -> Self {
        CheckersPiece {
            kind: CheckersKind::King,
            side,
        }
    }

    #[inline]
    pub const fn is_king(self) -> bool {
        matches!(self.kind, CheckersKind::King)
    }

    /// Diagonal directions this piece may move and capture in.
    pub fn directions(self) -> &'static [(i8, i8)] {
        static ALL: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
        match (self.kind, self.side) {
            (CheckersKind::King, _) => &ALL,
            (CheckersKind::Man, Side::White) => &ALL[..2],
            (CheckersKind::Man, Side::Black) => &ALL[2..],
        }
    }
}

impl BoardPiece for CheckersPiece {
    type Kind = CheckersKind;

    fn kind(&self) -> CheckersKind {
        self.kind
    }

    fn owner(&self) -> Side {
        self.side
    }

    fn to_char(&self) -> char {
        match (self.side, self.kind) {
            (Side::White, CheckersKind::Man) => 'r',
            (Side::White, CheckersKind::King) => 'R',
            (Side::Black, CheckersKind::Man) => 'b',
            (Side::Black, CheckersKind::King) => 'B',
        }
    }

    fn from_char(c: char) -> Option<Self> {
        match c {
            'r' => Some(CheckersPiece::man(Side::White)),
            'R' => Some(CheckersPiece::king(Side::White)),
            'b' => Some(CheckersPiece::man(Side::Black)),
            'B' => Some(CheckersPiece::king(Side::Black)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn men_move_towards_the_opponent() {
        let red = CheckersPiece::man(Side::White);
        assert!(red.directions().iter().all(|&(dr, _)| dr == -1));
        let black = CheckersPiece::man(Side::Black);
        assert!(black.directions().iter().all(|&(dr, _)| dr == 1));
        assert_eq!(CheckersPiece::king(Side::Black).directions().len(), 4);
    }

    #[test]
    fn chars_roundtrip() {
        for c in ['r', 'R', 'b', 'B'] {
            assert_eq!(CheckersPiece::from_char(c).map(|p| p.to_char()), Some(c));
        }
        assert_eq!(CheckersPiece::from_char('k'), None);
        assert!(CheckersPiece::from_char('R').unwrap().is_king());
    }
}
