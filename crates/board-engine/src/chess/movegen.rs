//! Chess move generation and execution.
//!
//! Moves are generated pseudo-legally per piece, then each one is applied to
//! a copy of the position and discarded if it leaves the mover's king
//! attacked. Pins and check evasion fall out of that filter.

use super::attacks::{
    is_square_attacked, BISHOP_DIRECTIONS, KING_OFFSETS, KNIGHT_OFFSETS, ROOK_DIRECTIONS,
};
use super::piece::{ChessKind, ChessPiece};
use super::position::ChessPosition;
use board_core::{Move, MoveFlag, MoveList, Side, Square};

/// A chess move.
pub type ChessMove = Move<ChessKind>;

/// Generates all legal moves for the given position.
pub fn generate_moves(position: &ChessPosition) -> MoveList<ChessKind> {
    let mut moves = MoveList::new();
    for from in position.board.squares_occupied_by(position.side_to_move) {
        generate_piece_moves(position, from, &mut moves);
    }
    retain_legal(position, &mut moves);
    moves
}

/// Generates the legal moves of the piece on `from`.
pub fn legal_moves_from(position: &ChessPosition, from: Square) -> MoveList<ChessKind> {
    let mut moves = MoveList::new();
    if position.board.is_occupied_by(from, position.side_to_move) {
        generate_piece_moves(position, from, &mut moves);
        retain_legal(position, &mut moves);
    }
    moves
}

fn retain_legal(position: &ChessPosition, moves: &mut MoveList<ChessKind>) {
    let us = position.side_to_move;
    moves.retain(|m| {
        let new_pos = make_move(position, m);
        !is_king_attacked(&new_pos, us)
    });
}

/// Returns true if the king of the given side is attacked.
pub fn is_king_attacked(position: &ChessPosition, side: Side) -> bool {
    match position.king_square(side) {
        Some(sq) => is_square_attacked(&position.board, sq, side.opposite()),
        None => false,
    }
}

/// Generates pseudo-legal moves for the piece on `from`.
fn generate_piece_moves(position: &ChessPosition, from: Square, moves: &mut MoveList<ChessKind>) {
    let Some(piece) = position.board.piece_at(from) else {
        return;
    };
    match piece.kind {
        ChessKind::Pawn => generate_pawn_moves(position, from, piece.side, moves),
        ChessKind::Knight => generate_steps(position, from, &KNIGHT_OFFSETS, moves),
        ChessKind::Bishop => generate_slides(position, from, &BISHOP_DIRECTIONS, moves),
        ChessKind::Rook => generate_slides(position, from, &ROOK_DIRECTIONS, moves),
        ChessKind::Queen => {
            generate_slides(position, from, &ROOK_DIRECTIONS, moves);
            generate_slides(position, from, &BISHOP_DIRECTIONS, moves);
        }
        ChessKind::King => {
            generate_steps(position, from, &KING_OFFSETS, moves);
            generate_castling_moves(position, from, piece, moves);
        }
    }
}

fn generate_pawn_moves(
    position: &ChessPosition,
    from: Square,
    us: Side,
    moves: &mut MoveList<ChessKind>,
) {
    let board = &position.board;
    let forward = us.forward();
    let start_row = (us.home_row() as i8 + forward) as u8;

    if let Some(one) = from.offset(forward, 0) {
        if board.is_empty(one) {
            push_pawn_move(us, from, one, None, moves);

            if from.row() == start_row {
                if let Some(two) = from.offset(2 * forward, 0) {
                    if board.is_empty(two) {
                        moves.push(Move::new(from, two, MoveFlag::DoublePush));
                    }
                }
            }
        }
    }

    for d_col in [-1, 1] {
        let Some(to) = from.offset(forward, d_col) else {
            continue;
        };
        if board.is_occupied_by(to, us.opposite()) {
            push_pawn_move(us, from, to, Some(to), moves);
        } else if position.en_passant == Some(to) {
            let victim = Square::at(from.row(), to.col());
            let is_enemy_pawn = board
                .piece_at(victim)
                .is_some_and(|p| p.kind == ChessKind::Pawn && p.side != us);
            if is_enemy_pawn {
                moves.push(Move::new(from, to, MoveFlag::EnPassant).with_capture(victim));
            }
        }
    }
}

/// Pushes a pawn move, expanding it into one move per promotion kind on the
/// last row.
fn push_pawn_move(
    us: Side,
    from: Square,
    to: Square,
    captured: Option<Square>,
    moves: &mut MoveList<ChessKind>,
) {
    if to.row() == us.promotion_row() {
        for kind in ChessKind::PROMOTIONS {
            let mut m = Move::promotion(from, to, kind);
            m.captures.extend(captured);
            moves.push(m);
        }
    } else {
        match captured {
            Some(sq) => moves.push(Move::capture(from, to, sq)),
            None => moves.push(Move::normal(from, to)),
        }
    }
}

fn generate_steps(
    position: &ChessPosition,
    from: Square,
    offsets: &[(i8, i8)],
    moves: &mut MoveList<ChessKind>,
) {
    let us = position.side_to_move;
    for &(d_row, d_col) in offsets {
        let Some(to) = from.offset(d_row, d_col) else {
            continue;
        };
        match position.board.piece_at(to) {
            None => moves.push(Move::normal(from, to)),
            Some(p) if p.side != us => moves.push(Move::capture(from, to, to)),
            Some(_) => {}
        }
    }
}

fn generate_slides(
    position: &ChessPosition,
    from: Square,
    directions: &[(i8, i8)],
    moves: &mut MoveList<ChessKind>,
) {
    let us = position.side_to_move;
    for &(d_row, d_col) in directions {
        let mut current = from.offset(d_row, d_col);
        while let Some(to) = current {
            match position.board.piece_at(to) {
                None => moves.push(Move::normal(from, to)),
                Some(p) => {
                    if p.side != us {
                        moves.push(Move::capture(from, to, to));
                    }
                    break;
                }
            }
            current = to.offset(d_row, d_col);
        }
    }
}

fn generate_castling_moves(
    position: &ChessPosition,
    from: Square,
    king: ChessPiece,
    moves: &mut MoveList<ChessKind>,
) {
    let us = king.side;
    let them = us.opposite();
    let home = us.home_row();
    let board = &position.board;

    if king.has_moved || from != Square::at(home, 4) {
        return;
    }
    if is_square_attacked(board, from, them) {
        return;
    }

    let rook_ready = |col: u8| {
        board
            .piece_at(Square::at(home, col))
            .is_some_and(|p| p.kind == ChessKind::Rook && p.side == us && !p.has_moved)
    };
    let empty = |cols: &[u8]| cols.iter().all(|&c| board.is_empty(Square::at(home, c)));
    let safe = |cols: &[u8]| {
        cols.iter()
            .all(|&c| !is_square_attacked(board, Square::at(home, c), them))
    };

    if position.castling.can_castle_kingside(us) && rook_ready(7) && empty(&[5, 6]) && safe(&[5, 6])
    {
        moves.push(Move::new(from, Square::at(home, 6), MoveFlag::CastleKingside));
    }

    if position.castling.can_castle_queenside(us)
        && rook_ready(0)
        && empty(&[1, 2, 3])
        && safe(&[2, 3])
    {
        moves.push(Move::new(from, Square::at(home, 2), MoveFlag::CastleQueenside));
    }
}

/// Makes a move and returns the new position.
///
/// The move must have been generated for this position.
pub fn make_move(position: &ChessPosition, m: &ChessMove) -> ChessPosition {
    let mut new_pos = position.clone();
    let us = position.side_to_move;
    let home = us.home_row();

    let Some(mut piece) = new_pos.board.remove(m.from) else {
        debug_assert!(false, "no piece on {}", m.from);
        return new_pos;
    };
    let moved_kind = piece.kind;

    // Captured squares include the en passant victim beside the destination.
    for &sq in &m.captures {
        new_pos.board.remove(sq);
        new_pos.castling.remove_for_square(sq);
    }

    piece.has_moved = true;
    if let Some(kind) = m.promotion {
        piece.kind = kind;
    }
    new_pos.board.place(m.to, piece);

    let rook_hop = match m.flag {
        MoveFlag::CastleKingside => Some((7, 5)),
        MoveFlag::CastleQueenside => Some((0, 3)),
        _ => None,
    };
    if let Some((rook_from, rook_to)) = rook_hop {
        if let Some(mut rook) = new_pos.board.remove(Square::at(home, rook_from)) {
            rook.has_moved = true;
            new_pos.board.place(Square::at(home, rook_to), rook);
        }
    }

    if moved_kind == ChessKind::King {
        new_pos.kings[us.index()] = Some(m.to);
        new_pos.castling.remove_side(us);
    }
    new_pos.castling.remove_for_square(m.from);

    new_pos.en_passant = if m.flag == MoveFlag::DoublePush {
        m.from.offset(us.forward(), 0)
    } else {
        None
    };

    if moved_kind == ChessKind::Pawn || m.is_capture() {
        new_pos.halfmove_clock = 0;
    } else {
        new_pos.halfmove_clock += 1;
    }
    if us == Side::Black {
        new_pos.fullmove_number += 1;
    }

    new_pos.side_to_move = us.opposite();
    new_pos
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn find(moves: &MoveList<ChessKind>, from: &str, to: &str) -> Option<ChessMove> {
        moves.find(sq(from), sq(to)).cloned()
    }

    #[test]
    fn startpos_has_twenty_moves() {
        let pos = ChessPosition::startpos();
        let moves = generate_moves(&pos);
        assert_eq!(moves.len(), 20);
        assert!(!moves.has_capture());
    }

    #[test]
    fn legal_moves_from_knight() {
        let pos = ChessPosition::startpos();
        let moves = legal_moves_from(&pos, sq("g1"));
        assert_eq!(moves.destinations(), vec![sq("f3"), sq("h3")]);
        assert!(legal_moves_from(&pos, sq("e4")).is_empty());
        assert!(legal_moves_from(&pos, sq("e7")).is_empty());
    }

    #[test]
    fn double_push_sets_en_passant_target() {
        let pos = ChessPosition::startpos();
        let moves = generate_moves(&pos);
        let m = find(&moves, "e2", "e4").unwrap();
        assert_eq!(m.flag, MoveFlag::DoublePush);

        let next = make_move(&pos, &m);
        assert_eq!(next.en_passant, Some(sq("e3")));
        assert_eq!(next.side_to_move, Side::Black);
        assert_eq!(
            next.to_fen(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );
    }

    #[test]
    fn en_passant_capture() {
        let pos = ChessPosition::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2").unwrap();
        let moves = generate_moves(&pos);
        let ep = find(&moves, "e5", "d6").unwrap();
        assert_eq!(ep.flag, MoveFlag::EnPassant);
        assert_eq!(ep.captures, vec![sq("d5")]);

        let next = make_move(&pos, &ep);
        assert!(next.board.is_empty(sq("d5")));
        assert_eq!(next.piece_at(sq("d6")).map(|p| p.kind), Some(ChessKind::Pawn));
    }

    #[test]
    fn en_passant_only_right_after_double_step() {
        let pos = ChessPosition::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - - 0 2").unwrap();
        let moves = generate_moves(&pos);
        assert!(find(&moves, "e5", "d6").is_none());
    }

    #[test]
    fn pinned_piece_cannot_leave_line() {
        // The e2 knight is pinned against the king by the e8 rook.
        let pos = ChessPosition::from_fen("k3r3/8/8/8/8/8/4N3/4K3 w - - 0 1").unwrap();
        assert!(legal_moves_from(&pos, sq("e2")).is_empty());
    }

    #[test]
    fn castling_both_wings() {
        let pos = ChessPosition::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let moves = legal_moves_from(&pos, sq("e1"));
        let short = find(&moves, "e1", "g1").unwrap();
        let long = find(&moves, "e1", "c1").unwrap();
        assert_eq!(short.flag, MoveFlag::CastleKingside);
        assert_eq!(long.flag, MoveFlag::CastleQueenside);

        let next = make_move(&pos, &short);
        assert_eq!(next.piece_at(sq("f1")).map(|p| p.kind), Some(ChessKind::Rook));
        assert!(next.board.is_empty(sq("h1")));
        assert_eq!(next.king_square(Side::White), Some(sq("g1")));
        assert!(!next.castling.can_castle_kingside(Side::White));
        assert!(!next.castling.can_castle_queenside(Side::White));
        assert!(next.castling.can_castle_kingside(Side::Black));

        let next = make_move(&pos, &long);
        assert_eq!(next.piece_at(sq("d1")).map(|p| p.kind), Some(ChessKind::Rook));
        assert!(next.board.is_empty(sq("a1")));
    }

    #[test]
    fn no_castling_through_attacked_square() {
        // The f8 rook covers f1.
        let pos = ChessPosition::from_fen("4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        let moves = legal_moves_from(&pos, sq("e1"));
        assert!(find(&moves, "e1", "g1").is_none());
        assert!(find(&moves, "e1", "c1").is_some());
    }

    #[test]
    fn no_castling_out_of_check() {
        let pos = ChessPosition::from_fen("4r1k1/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        let moves = legal_moves_from(&pos, sq("e1"));
        assert!(moves.iter().all(|m| !m.flag.is_castling()));
    }

    #[test]
    fn no_castling_after_rook_moved() {
        let pos = ChessPosition::from_fen("4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        let rook_move = find(&generate_moves(&pos), "h1", "h2").unwrap();
        let pos = make_move(&pos, &rook_move);
        assert!(!pos.castling.can_castle_kingside(Side::White));
        assert!(pos.castling.can_castle_queenside(Side::White));
    }

    #[test]
    fn promotion_generates_four_choices() {
        let pos = ChessPosition::from_fen("1r2k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let moves = legal_moves_from(&pos, sq("a7"));
        let pushes: Vec<_> = moves.iter().filter(|m| m.to == sq("a8")).collect();
        let captures: Vec<_> = moves.iter().filter(|m| m.to == sq("b8")).collect();
        assert_eq!(pushes.len(), 4);
        assert_eq!(captures.len(), 4);
        assert!(captures.iter().all(|m| m.captures == vec![sq("b8")]));

        let queen = pushes
            .iter()
            .find(|m| m.promotion == Some(ChessKind::Queen))
            .unwrap();
        let next = make_move(&pos, queen);
        assert_eq!(
            next.piece_at(sq("a8")).map(|p| p.kind),
            Some(ChessKind::Queen)
        );
    }

    #[test]
    fn capture_updates_clocks() {
        let pos = ChessPosition::from_fen("4k3/8/8/3p4/8/8/8/3RK3 w - - 7 10").unwrap();
        let quiet = find(&generate_moves(&pos), "d1", "d2").unwrap();
        assert_eq!(make_move(&pos, &quiet).halfmove_clock, 8);

        let capture = find(&generate_moves(&pos), "d1", "d5").unwrap();
        assert!(capture.is_capture());
        let next = make_move(&pos, &capture);
        assert_eq!(next.halfmove_clock, 0);
        assert_eq!(next.fullmove_number, 10);
        assert_eq!(next.board.count(Side::Black), 1);
    }

    #[test]
    fn king_cannot_step_into_check() {
        let pos = ChessPosition::from_fen("4k3/8/8/8/8/8/3r4/4K3 w - - 0 1").unwrap();
        let moves = legal_moves_from(&pos, sq("e1"));
        assert_eq!(moves.destinations(), vec![sq("d2"), sq("f1")]);
    }
}
