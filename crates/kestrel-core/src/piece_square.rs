//! Piece-square tables.
//!
//! Tables are written from White's point of view with the eighth rank on
//! the first line, the way a diagram reads. A White piece on compact index
//! `i` reads entry `i ^ 56`; a Black piece reads entry `i`, which mirrors
//! the board vertically. Both evaluation and quiet-move ordering use them.

use crate::color::Color;
use crate::piece::Piece;
use crate::piece_kind::PieceKind;
use crate::square::Square;

#[rustfmt::skip]
const PAWN_MG: [i16; 64] = [
     0,   0,   0,   0,   0,   0,   0,   0,
    50,  50,  50,  50,  50,  50,  50,  50,
    10,  10,  20,  30,  30,  20,  10,  10,
     5,   5,  10,  25,  25,  10,   5,   5,
     0,   0,   0,  20,  20,   0,   0,   0,
     5,  -5, -10,   0,   0, -10,  -5,   5,
     5,  10,  10, -20, -20,  10,  10,   5,
     0,   0,   0,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
const PAWN_EG: [i16; 64] = [
     0,   0,   0,   0,   0,   0,   0,   0,
    80,  80,  80,  80,  80,  80,  80,  80,
    50,  50,  50,  50,  50,  50,  50,  50,
    30,  30,  30,  30,  30,  30,  30,  30,
    15,  15,  15,  15,  15,  15,  15,  15,
     5,   5,   5,   5,   5,   5,   5,   5,
     0,   0,   0,   0,   0,   0,   0,   0,
     0,   0,   0,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
const KNIGHT: [i16; 64] = [
   -50, -40, -30, -30, -30, -30, -40, -50,
   -40, -20,   0,   0,   0,   0, -20, -40,
   -30,   0,  10,  15,  15,  10,   0, -30,
   -30,   5,  15,  20,  20,  15,   5, -30,
   -30,   0,  15,  20,  20,  15,   0, -30,
   -30,   5,  10,  15,  15,  10,   5, -30,
   -40, -20,   0,   5,   5,   0, -20, -40,
   -50, -40, -30, -30, -30, -30, -40, -50,
];

#[rustfmt::skip]
const BISHOP: [i16; 64] = [
   -20, -10, -10, -10, -10, -10, -10, -20,
   -10,   0,   0,   0,   0,   0,   0, -10,
   -10,   0,   5,  10,  10,   5,   0, -10,
   -10,   5,   5,  10,  10,   5,   5, -10,
   -10,   0,  10,  10,  10,  10,   0, -10,
   -10,  10,  10,  10,  10,  10,  10, -10,
   -10,   5,   0,   0,   0,   0,   5, -10,
   -20, -10, -10, -10, -10, -10, -10, -20,
];

#[rustfmt::skip]
const ROOK_MG: [i16; 64] = [
     0,   0,   0,   0,   0,   0,   0,   0,
     5,  10,  10,  10,  10,  10,  10,   5,
    -5,   0,   0,   0,   0,   0,   0,  -5,
    -5,   0,   0,   0,   0,   0,   0,  -5,
    -5,   0,   0,   0,   0,   0,   0,  -5,
    -5,   0,   0,   0,   0,   0,   0,  -5,
    -5,   0,   0,   0,   0,   0,   0,  -5,
     0,   0,   0,   5,   5,   0,   0,   0,
];

#[rustfmt::skip]
const ROOK_EG: [i16; 64] = [
    10,  10,  10,  10,  10,  10,  10,  10,
    15,  15,  15,  15,  15,  15,  15,  15,
     5,   5,   5,   5,   5,   5,   5,   5,
     0,   0,   0,   0,   0,   0,   0,   0,
     0,   0,   0,   0,   0,   0,   0,   0,
     0,   0,   0,   0,   0,   0,   0,   0,
     0,   0,   0,   0,   0,   0,   0,   0,
     0,   0,   0,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
const QUEEN: [i16; 64] = [
   -20, -10, -10,  -5,  -5, -10, -10, -20,
   -10,   0,   0,   0,   0,   0,   0, -10,
   -10,   0,   5,   5,   5,   5,   0, -10,
    -5,   0,   5,   5,   5,   5,   0,  -5,
     0,   0,   5,   5,   5,   5,   0,  -5,
   -10,   5,   5,   5,   5,   5,   0, -10,
   -10,   0,   5,   0,   0,   0,   0, -10,
   -20, -10, -10,  -5,  -5, -10, -10, -20,
];

#[rustfmt::skip]
const KING_MG: [i16; 64] = [
   -30, -40, -40, -50, -50, -40, -40, -30,
   -30, -40, -40, -50, -50, -40, -40, -30,
   -30, -40, -40, -50, -50, -40, -40, -30,
   -30, -40, -40, -50, -50, -40, -40, -30,
   -20, -30, -30, -40, -40, -30, -30, -20,
   -10, -20, -20, -20, -20, -20, -20, -10,
    20,  20,   0,   0,   0,   0,  20,  20,
    20,  30,  10,   0,   0,  10,  30,  20,
];

#[rustfmt::skip]
const KING_EG: [i16; 64] = [
   -50, -40, -30, -20, -20, -30, -40, -50,
   -30, -20, -10,   0,   0, -10, -20, -30,
   -30, -10,  20,  30,  30,  20, -10, -30,
   -30, -10,  30,  40,  40,  30, -10, -30,
   -30, -10,  30,  40,  40,  30, -10, -30,
   -30, -10,  20,  30,  30,  20, -10, -30,
   -30, -30,   0,   0,   0,   0, -30, -30,
   -50, -30, -30, -30, -30, -30, -30, -50,
];

/// Midgame tables by [`PieceKind::index`].
const MIDGAME: [&[i16; 64]; PieceKind::COUNT] = [&PAWN_MG, &KNIGHT, &BISHOP, &ROOK_MG, &QUEEN, &KING_MG];

/// Endgame tables by [`PieceKind::index`].
const ENDGAME: [&[i16; 64]; PieceKind::COUNT] = [&PAWN_EG, &KNIGHT, &BISHOP, &ROOK_EG, &QUEEN, &KING_EG];

#[inline]
const fn table_index(color: Color, sq: Square) -> usize {
    match color {
        Color::White => sq.index() ^ 56,
        Color::Black => sq.index(),
    }
}

/// Midgame bonus for `piece` standing on `sq`, from its owner's view.
#[inline]
pub fn midgame(piece: Piece, sq: Square) -> i32 {
    MIDGAME[piece.kind().index()][table_index(piece.color(), sq)] as i32
}

/// Endgame bonus for `piece` standing on `sq`, from its owner's view.
#[inline]
pub fn endgame(piece: Piece, sq: Square) -> i32 {
    ENDGAME[piece.kind().index()][table_index(piece.color(), sq)] as i32
}

#[cfg(test)]
mod tests {
    use super::{endgame, midgame};
    use crate::piece::Piece;
    use crate::square::Square;

    #[test]
    fn tables_mirror_between_colors() {
        for sq in Square::all() {
            for (white, black) in [
                (Piece::WHITE_PAWN, Piece::BLACK_PAWN),
                (Piece::WHITE_KNIGHT, Piece::BLACK_KNIGHT),
                (Piece::WHITE_KING, Piece::BLACK_KING),
                (Piece::WHITE_ROOK, Piece::BLACK_ROOK),
            ] {
                assert_eq!(midgame(white, sq), midgame(black, sq.flip_rank()));
                assert_eq!(endgame(white, sq), endgame(black, sq.flip_rank()));
            }
        }
    }

    #[test]
    fn central_pawns_prefer_advancing() {
        assert!(midgame(Piece::WHITE_PAWN, Square::E4) > midgame(Piece::WHITE_PAWN, Square::E2));
        assert!(midgame(Piece::BLACK_PAWN, Square::D5) > midgame(Piece::BLACK_PAWN, Square::D7));
        assert!(endgame(Piece::WHITE_PAWN, Square::A7) > endgame(Piece::WHITE_PAWN, Square::A3));
    }

    #[test]
    fn king_shelters_in_midgame_and_centralizes_in_endgame() {
        assert!(midgame(Piece::WHITE_KING, Square::G1) > midgame(Piece::WHITE_KING, Square::E4));
        assert!(endgame(Piece::WHITE_KING, Square::E4) > endgame(Piece::WHITE_KING, Square::G1));
    }
}
