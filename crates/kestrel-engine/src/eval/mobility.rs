//! Piece mobility.
//!
//! Each knight, bishop, rook and queen earns a per-kind bonus for every
//! pseudo-legal destination: empty squares it reaches plus enemy pieces it
//! attacks.

use kestrel_core::attacks::{bishop_attacks, knight_attacks, queen_attacks, rook_attacks};
use kestrel_core::{Color, PieceKind, Position};

use crate::eval::score::{S, Score};

const KNIGHT_MOBILITY: Score = S(4, 4);
const BISHOP_MOBILITY: Score = S(3, 5);
const ROOK_MOBILITY: Score = S(2, 3);
const QUEEN_MOBILITY: Score = S(1, 2);

fn mobility_for_side(pos: &Position, color: Color) -> Score {
    let occupied = pos.occupied();
    let targets = !pos.side(color);
    let mut score = Score::ZERO;

    for &sq in pos.piece_list(color, PieceKind::Knight) {
        score += KNIGHT_MOBILITY * (knight_attacks(sq) & targets).count() as i16;
    }
    for &sq in pos.piece_list(color, PieceKind::Bishop) {
        score += BISHOP_MOBILITY * (bishop_attacks(sq, occupied) & targets).count() as i16;
    }
    for &sq in pos.piece_list(color, PieceKind::Rook) {
        score += ROOK_MOBILITY * (rook_attacks(sq, occupied) & targets).count() as i16;
    }
    for &sq in pos.piece_list(color, PieceKind::Queen) {
        score += QUEEN_MOBILITY * (queen_attacks(sq, occupied) & targets).count() as i16;
    }
    score
}

/// Mobility balance from White's perspective.
pub fn evaluate_mobility(pos: &Position) -> Score {
    mobility_for_side(pos, Color::White) - mobility_for_side(pos, Color::Black)
}

#[cfg(test)]
mod tests {
    use kestrel_core::Position;

    use super::{KNIGHT_MOBILITY, ROOK_MOBILITY, evaluate_mobility};
    use crate::eval::score::Score;

    #[test]
    fn starting_position_is_balanced() {
        assert_eq!(evaluate_mobility(&Position::starting()), Score::ZERO);
    }

    #[test]
    fn centre_knight_counts_eight_squares() {
        let pos: Position = "4k3/8/8/8/3N4/8/8/4K3 w - - 0 1".parse().unwrap();
        assert_eq!(evaluate_mobility(&pos), KNIGHT_MOBILITY * 8);
    }

    #[test]
    fn captures_count_but_own_pieces_do_not() {
        // Rook on a1: a2 own pawn blocks the file, b1..d1 empty, e1 enemy rook.
        let pos: Position = "k7/8/8/8/8/8/P7/R3r2K w - - 0 1".parse().unwrap();
        let white_rook = ROOK_MOBILITY * 4;
        // Black rook on e1: d1..b1 then a1 (capture), f1, g1, h1 (capture), e2..e8 (7).
        let black_rook = ROOK_MOBILITY * (4 + 3 + 7);
        assert_eq!(evaluate_mobility(&pos), white_rook - black_rook);
    }
}
