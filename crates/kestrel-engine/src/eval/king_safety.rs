//! King safety: pawn shield and rooks boxed in by an uncastled king.
//!
//! Middlegame-only terms; the caller skips this module in the endgame.

use kestrel_core::{Color, Piece, PieceKind, Position, Square};

use crate::eval::score::{S, Score};

/// Per missing pawn on the three squares in front of the king.
const MISSING_SHIELD_PAWN: Score = S(-30, 0);

/// Rook stuck between the king and the corner.
const TRAPPED_ROOK: Score = S(-40, 0);

fn shield_penalty(pos: &Position, color: Color) -> Score {
    let king = pos.king_square(color);
    let pawn = Piece::new(PieceKind::Pawn, color);
    let mut missing = 0i16;
    for side in [-1, 0, 1] {
        if let Some(sq) = king.offset(color.forward() + side)
            && pos.piece_on(sq) != Some(pawn)
        {
            missing += 1;
        }
    }
    MISSING_SHIELD_PAWN * missing
}

/// A king that walked to the wing without castling traps its own rook in
/// the corner: king on f/g file with a rook on g/h, or on b/c with a rook
/// on a/b.
fn trapped_rook_penalty(pos: &Position, color: Color) -> Score {
    let king = pos.king_square(color);
    if king.rank() != color.back_rank() {
        return Score::ZERO;
    }
    let corner = match king.file() {
        5 | 6 => king.file() + 1..8,
        1 | 2 => 0..king.file(),
        _ => return Score::ZERO,
    };
    let rook = Piece::new(PieceKind::Rook, color);
    let trapped = corner.into_iter().any(|file| pos.piece_on(Square::new(king.rank(), file)) == Some(rook));
    if trapped { TRAPPED_ROOK } else { Score::ZERO }
}

/// King safety balance from White's perspective.
pub fn evaluate_king_safety(pos: &Position) -> Score {
    let side = |color| shield_penalty(pos, color) + trapped_rook_penalty(pos, color);
    side(Color::White) - side(Color::Black)
}
