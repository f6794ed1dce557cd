//! Attack sets.
//!
//! Leapers are direct table lookups. Sliders walk one precomputed ray per
//! direction, mask it with the occupancy and cut it at the first blocker
//! found by a bit scan toward the origin.

use crate::bitboard::Bitboard;
use crate::color::Color;
use crate::geometry::{self, Direction, RAYS};
use crate::piece_kind::PieceKind;
use crate::square::Square;

#[inline]
pub fn knight_attacks(sq: Square) -> Bitboard {
    geometry::KNIGHT_ATTACKS[sq.index()]
}

#[inline]
pub fn king_attacks(sq: Square) -> Bitboard {
    geometry::KING_ATTACKS[sq.index()]
}

/// Squares a pawn of `color` on `sq` captures on.
#[inline]
pub fn pawn_attacks(color: Color, sq: Square) -> Bitboard {
    geometry::PAWN_ATTACKS[color.index()][sq.index()]
}

/// Squares reachable along `dir` from `sq`, up to and including the first blocker.
#[inline]
pub fn ray_attacks(sq: Square, dir: Direction, occupied: Bitboard) -> Bitboard {
    let ray = RAYS[dir.index()][sq.index()];
    let blockers = ray & occupied;
    let first = if dir.is_positive() { blockers.lsb() } else { blockers.msb() };
    match first {
        Some(blocker) => ray ^ RAYS[dir.index()][blocker.index()],
        None => ray,
    }
}

#[inline]
pub fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    Direction::ORTHOGONAL
        .iter()
        .fold(Bitboard::EMPTY, |acc, &dir| acc | ray_attacks(sq, dir, occupied))
}

#[inline]
pub fn bishop_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    Direction::DIAGONAL
        .iter()
        .fold(Bitboard::EMPTY, |acc, &dir| acc | ray_attacks(sq, dir, occupied))
}

#[inline]
pub fn queen_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    rook_attacks(sq, occupied) | bishop_attacks(sq, occupied)
}

/// Attack set of a piece of `kind` and `color` standing on `sq`.
pub fn piece_attacks(kind: PieceKind, color: Color, sq: Square, occupied: Bitboard) -> Bitboard {
    match kind {
        PieceKind::Pawn => pawn_attacks(color, sq),
        PieceKind::Knight => knight_attacks(sq),
        PieceKind::Bishop => bishop_attacks(sq, occupied),
        PieceKind::Rook => rook_attacks(sq, occupied),
        PieceKind::Queen => queen_attacks(sq, occupied),
        PieceKind::King => king_attacks(sq),
    }
}
