//! Piece-square placement.
//!
//! The tables themselves live in [`kestrel_core::piece_square`] so move
//! ordering can share them; this sums them per side into a [`Score`].

use kestrel_core::piece_square;
use kestrel_core::{Color, Piece, PieceKind, Position};

use crate::eval::score::Score;

/// Placement score for one piece on its square.
#[inline]
pub fn pst_value(piece: Piece, sq: kestrel_core::Square) -> Score {
    Score::new(piece_square::midgame(piece, sq) as i16, piece_square::endgame(piece, sq) as i16)
}

fn placement_for_side(pos: &Position, color: Color) -> Score {
    let mut score = Score::ZERO;
    for kind in PieceKind::ALL {
        let piece = Piece::new(kind, color);
        for &sq in pos.piece_list(color, kind) {
            score += pst_value(piece, sq);
        }
    }
    score
}

/// Placement balance from White's perspective.
pub fn evaluate_pst(pos: &Position) -> Score {
    placement_for_side(pos, Color::White) - placement_for_side(pos, Color::Black)
}
