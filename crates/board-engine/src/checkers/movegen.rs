//! Checkers move generation and execution.
//!
//! Every generated capture is a single jump. A multi-capture is played as a
//! sequence of jumps by the same piece: after a jump that can be followed by
//! another, the executor records the landing square as the continuation and
//! keeps the side to move.

use super::piece::{CheckersKind, CheckersPiece};
use super::position::CheckersPosition;
use board_core::{Board, Move, MoveList, Square};

/// A checkers move.
pub type CheckersMove = Move<CheckersKind>;

/// Generates all legal moves for the side to move.
///
/// Captures are mandatory: when any piece can jump, only jumps are returned.
/// During a continuation only the continuing piece's jumps are returned.
pub fn generate_moves(position: &CheckersPosition) -> MoveList<CheckersKind> {
    let mut moves = MoveList::new();

    if let Some(sq) = position.continuation {
        add_jumps(&position.board, sq, &mut moves);
        return moves;
    }

    let ours = position.board.squares_occupied_by(position.side_to_move);
    for &from in &ours {
        add_jumps(&position.board, from, &mut moves);
    }
    if moves.is_empty() {
        for &from in &ours {
            add_steps(&position.board, from, &mut moves);
        }
    }
    moves
}

/// Generates the legal moves of the piece on `from`.
pub fn legal_moves_from(position: &CheckersPosition, from: Square) -> MoveList<CheckersKind> {
    let mut moves = generate_moves(position);
    moves.retain(|m| m.from == from);
    moves
}

/// Returns true if the piece on `from` has a jump available.
pub fn can_jump(board: &Board<CheckersPiece>, from: Square) -> bool {
    let mut moves = MoveList::new();
    add_jumps(board, from, &mut moves);
    !moves.is_empty()
}

fn add_jumps(board: &Board<CheckersPiece>, from: Square, moves: &mut MoveList<CheckersKind>) {
    let Some(piece) = board.piece_at(from) else {
        return;
    };
    for &(d_row, d_col) in piece.directions() {
        let (Some(over), Some(to)) = (from.offset(d_row, d_col), from.offset(2 * d_row, 2 * d_col))
        else {
            continue;
        };
        if board.is_occupied_by(over, piece.side.opposite()) && board.is_empty(to) {
            moves.push(Move::capture(from, to, over));
        }
    }
}

fn add_steps(board: &Board<CheckersPiece>, from: Square, moves: &mut MoveList<CheckersKind>) {
    let Some(piece) = board.piece_at(from) else {
        return;
    };
    for &(d_row, d_col) in piece.directions() {
        if let Some(to) = from.offset(d_row, d_col) {
            if board.is_empty(to) {
                moves.push(Move::normal(from, to));
            }
        }
    }
}

/// Makes a move and returns the new position.
///
/// A man reaching the far row is crowned. A jump that can be followed by
/// another jump from the landing square, crowned or not, leaves the same
/// side to move with the continuation set.
pub fn make_move(position: &CheckersPosition, m: &CheckersMove) -> CheckersPosition {
    let mut new_pos = position.clone();
    let us = position.side_to_move;

    let Some(mut piece) = new_pos.board.remove(m.from) else {
        debug_assert!(false, "no piece on {}", m.from);
        return new_pos;
    };
    for &sq in &m.captures {
        new_pos.board.remove(sq);
    }
    if piece.kind == CheckersKind::Man && m.to.row() == us.promotion_row() {
        piece.kind = CheckersKind::King;
    }
    new_pos.board.place(m.to, piece);

    if m.is_capture() && can_jump(&new_pos.board, m.to) {
        new_pos.continuation = Some(m.to);
    } else {
        new_pos.continuation = None;
        new_pos.side_to_move = us.opposite();
    }
    new_pos
}

#[cfg(test)]
mod tests {
    use super::*;
    use board_core::Side;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn pos(text: &str) -> CheckersPosition {
        CheckersPosition::from_notation(text).unwrap()
    }

    #[test]
    fn opening_moves() {
        let start = CheckersPosition::startpos();
        let moves = generate_moves(&start);
        // Only the four front men (row 5) can step, seven squares in total.
        assert_eq!(moves.len(), 7);
        assert!(moves.iter().all(|m| m.from.row() == 5 && m.to.row() == 4));
        assert!(!moves.has_capture());
    }

    #[test]
    fn captures_are_mandatory() {
        // Red man on c3 can jump the black man on d4; red man on g3 could step.
        let p = pos("8/8/8/8/3b4/2r3r1/8/8 r");
        let moves = generate_moves(&p);
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].from, sq("c3"));
        assert_eq!(moves[0].to, sq("e5"));
        assert_eq!(moves[0].captures, vec![sq("d4")]);
        assert!(legal_moves_from(&p, sq("g3")).is_empty());
    }

    #[test]
    fn men_do_not_capture_backwards() {
        // The black man on d4 sits behind the red man on e5.
        let p = pos("8/8/8/4r3/3b4/8/8/8 r");
        let moves = generate_moves(&p);
        assert!(!moves.has_capture());
    }

    #[test]
    fn kings_capture_backwards() {
        let p = pos("8/8/8/4R3/3b4/8/8/8 r");
        let moves = generate_moves(&p);
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].to, sq("c3"));
    }

    #[test]
    fn double_jump_keeps_the_turn() {
        // c1 jumps d2 to e3, then f4 to g5.
        let p = pos("8/8/8/8/5b2/8/3b4/2r5 r");
        let first = generate_moves(&p);
        assert_eq!(first.len(), 1);

        let mid = make_move(&p, &first[0]);
        assert_eq!(mid.side_to_move, Side::White);
        assert_eq!(mid.continuation, Some(sq("e3")));
        assert_eq!(mid.board.count(Side::Black), 1);

        let second = generate_moves(&mid);
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].from, sq("e3"));
        assert_eq!(second[0].to, sq("g5"));

        let end = make_move(&mid, &second[0]);
        assert_eq!(end.side_to_move, Side::Black);
        assert_eq!(end.continuation, None);
        assert_eq!(end.board.count(Side::Black), 0);
    }

    #[test]
    fn continuation_locks_other_pieces() {
        let p = pos("8/8/8/8/5b2/4r3/8/r7 r e3");
        let moves = generate_moves(&p);
        assert!(moves.iter().all(|m| m.from == sq("e3")));
        assert!(legal_moves_from(&p, sq("a1")).is_empty());
    }

    #[test]
    fn man_is_crowned_on_far_row() {
        let p = pos("8/2r5/8/8/8/8/8/8 r");
        let m = legal_moves_from(&p, sq("c7"))[0].clone();
        let next = make_move(&p, &m);
        assert!(next.piece_at(m.to).unwrap().is_king());
        assert_eq!(next.side_to_move, Side::Black);
    }

    #[test]
    fn crowning_jump_continues_when_king_can_jump() {
        // Red man on b6 jumps c7 to d8, is crowned and can jump e7 next.
        let p = pos("8/2b1b3/1r6/8/8/8/8/8 r");
        let m = legal_moves_from(&p, sq("b6"))[0].clone();
        assert_eq!(m.to, sq("d8"));
        let next = make_move(&p, &m);
        assert!(next.piece_at(sq("d8")).unwrap().is_king());
        assert_eq!(next.continuation, Some(sq("d8")));
        assert_eq!(next.side_to_move, Side::White);
    }
}
