//! Chess piece representation.

use board_core::{BoardPiece, PieceKind, Side, Square};

/// The six types of chess pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ChessKind {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl ChessKind {
    /// All piece types in order.
    pub const ALL: [ChessKind; 6] = [
        ChessKind::Pawn,
        ChessKind::Knight,
        ChessKind::Bishop,
        ChessKind::Rook,
        ChessKind::Queen,
        ChessKind::King,
    ];

    /// Kinds a pawn may promote to, in the order moves are generated.
    pub const PROMOTIONS: [ChessKind; 4] = [
        ChessKind::Queen,
        ChessKind::Rook,
        ChessKind::Bishop,
        ChessKind::Knight,
    ];

    /// Returns the index of this piece type (0-5).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns true if this piece is a sliding piece (bishop, rook, or queen).
    #[inline]
    pub const fn is_slider(self) -> bool {
        matches!(self, ChessKind::Bishop | ChessKind::Rook | ChessKind::Queen)
    }

    /// Returns true for knights and bishops.
    #[inline]
    pub const fn is_minor(self) -> bool {
        matches!(self, ChessKind::Knight | ChessKind::Bishop)
    }

    /// Parses a promotion letter (`q`, `r`, `b`, `n`, either case).
    pub fn from_promotion_char(c: char) -> Option<ChessKind> {
        match c.to_ascii_lowercase() {
            'q' => Some(ChessKind::Queen),
            'r' => Some(ChessKind::Rook),
            'b' => Some(ChessKind::Bishop),
            'n' => Some(ChessKind::Knight),
            _ => None,
        }
    }
}

impl PieceKind for ChessKind {
    fn symbol(self) -> char {
        match self {
            ChessKind::Pawn => 'p',
            ChessKind::Knight => 'n',
            ChessKind::Bishop => 'b',
            ChessKind::Rook => 'r',
            ChessKind::Queen => 'q',
            ChessKind::King => 'k',
        }
    }
}

impl std::fmt::Display for ChessKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ChessKind::Pawn => "Pawn",
            ChessKind::Knight => "Knight",
            ChessKind::Bishop => "Bishop",
            ChessKind::Rook => "Rook",
            ChessKind::Queen => "Queen",
            ChessKind::King => "King",
        };
        write!(f, "{}", name)
    }
}

/// A chess piece on the board.
///
/// `has_moved` gates castling and pawn double steps. It is set by the
/// executor and never cleared except by restoring an earlier position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChessPiece {
    pub kind: ChessKind,
    pub side: Side,
    pub has_moved: bool,
}

impl ChessPiece {
    /// Creates a piece that has not moved yet.
    #[inline]
    pub const fn new(kind: ChessKind, side: Side) -> Self {
        ChessPiece {
            kind,
            side,
            has_moved: false,
        }
    }

    /// Returns true if `sq` is one of this piece's squares in the standard
    /// starting array.
    pub fn starts_on(&self, sq: Square) -> bool {
        let home = self.side.home_row();
        match self.kind {
            ChessKind::Pawn => sq.row() as i8 == home as i8 + self.side.forward(),
            ChessKind::Knight => sq.row() == home && matches!(sq.col(), 1 | 6),
            ChessKind::Bishop => sq.row() == home && matches!(sq.col(), 2 | 5),
            ChessKind::Rook => sq.row() == home && matches!(sq.col(), 0 | 7),
            ChessKind::Queen => sq == Square::at(home, 3),
            ChessKind::King => sq == Square::at(home, 4),
        }
    }
}

impl BoardPiece for ChessPiece {
    type Kind = ChessKind;

    fn kind(&self) -> ChessKind {
        self.kind
    }

    fn owner(&self) -> Side {
        self.side
    }

    fn to_char(&self) -> char {
        let c = self.kind.symbol();
        match self.side {
            Side::White => c.to_ascii_uppercase(),
            Side::Black => c,
        }
    }

    fn from_char(c: char) -> Option<Self> {
        let side = if c.is_ascii_uppercase() {
            Side::White
        } else {
            Side::Black
        };
        let kind = match c.to_ascii_lowercase() {
            'p' => ChessKind::Pawn,
            'n' => ChessKind::Knight,
            'b' => ChessKind::Bishop,
            'r' => ChessKind::Rook,
            'q' => ChessKind::Queen,
            'k' => ChessKind::King,
            _ => return None,
        };
        Some(ChessPiece::new(kind, side))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn piece_chars() {
        let white_pawn = ChessPiece::new(ChessKind::Pawn, Side::White);
        assert_eq!(white_pawn.to_char(), 'P');
        assert_eq!(ChessPiece::new(ChessKind::Knight, Side::Black).to_char(), 'n');
        assert_eq!(ChessPiece::from_char('P'), Some(white_pawn));
        assert_eq!(
            ChessPiece::from_char('k'),
            Some(ChessPiece::new(ChessKind::King, Side::Black))
        );
        assert_eq!(ChessPiece::from_char('x'), None);
    }

    #[test]
    fn starting_squares() {
        let white_pawn = ChessPiece::new(ChessKind::Pawn, Side::White);
        assert!(white_pawn.starts_on(Square::from_algebraic("e2").unwrap()));
        assert!(!white_pawn.starts_on(Square::from_algebraic("e3").unwrap()));

        let black_king = ChessPiece::new(ChessKind::King, Side::Black);
        assert!(black_king.starts_on(Square::from_algebraic("e8").unwrap()));
        assert!(!black_king.starts_on(Square::from_algebraic("e1").unwrap()));

        let white_rook = ChessPiece::new(ChessKind::Rook, Side::White);
        assert!(white_rook.starts_on(Square::from_algebraic("h1").unwrap()));
        assert!(white_rook.starts_on(Square::from_algebraic("a1").unwrap()));
    }

    #[test]
    fn promotion_chars() {
        assert_eq!(ChessKind::from_promotion_char('Q'), Some(ChessKind::Queen));
        assert_eq!(ChessKind::from_promotion_char('n'), Some(ChessKind::Knight));
        assert_eq!(ChessKind::from_promotion_char('k'), None);
        assert_eq!(ChessKind::from_promotion_char('p'), None);
    }

    #[test]
    fn kind_classes() {
        assert!(ChessKind::Queen.is_slider());
        assert!(!ChessKind::Knight.is_slider());
        assert!(ChessKind::Knight.is_minor());
        assert!(ChessKind::Bishop.is_minor());
        assert!(!ChessKind::Rook.is_minor());
    }
}
