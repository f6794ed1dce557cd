//! Pseudo-legal generation by stepping over the 0x88 board.
//!
//! Every piece list is walked and each destination is reached with
//! [`Square::offset`], whose off-board test is a single mask against `0x88`.
//! Moves may leave the mover's king in check; callers filter.

use super::list::MoveList;
use crate::castle_rights::CastleSide;
use crate::chess_move::{Move, MoveKind};
use crate::color::Color;
use crate::geometry::{Direction, KNIGHT_DELTAS};
use crate::piece::Piece;
use crate::piece_kind::PieceKind;
use crate::position::Position;
use crate::square::Square;

/// Append every capture, including capturing promotions and en passant.
pub(crate) fn generate_captures(pos: &Position, list: &mut MoveList) {
    let us = pos.side_to_move();
    pawn_captures(pos, us, list);
    for kind in [PieceKind::Knight, PieceKind::Bishop, PieceKind::Rook, PieceKind::Queen, PieceKind::King] {
        let piece = Piece::new(kind, us);
        for &from in pos.piece_list(us, kind) {
            each_target(pos, from, kind, |to| {
                if let Some(victim) = pos.piece_on(to)
                    && victim.color() != us
                {
                    list.push(Move::normal(from, to, piece, Some(victim)));
                }
            });
        }
    }
}

/// Append every non-capture, including quiet promotions and castling.
pub(crate) fn generate_quiets(pos: &Position, list: &mut MoveList) {
    let us = pos.side_to_move();
    pawn_pushes(pos, us, list);
    for kind in [PieceKind::Knight, PieceKind::Bishop, PieceKind::Rook, PieceKind::Queen, PieceKind::King] {
        let piece = Piece::new(kind, us);
        for &from in pos.piece_list(us, kind) {
            each_target(pos, from, kind, |to| {
                if pos.is_empty(to) {
                    list.push(Move::normal(from, to, piece, None));
                }
            });
        }
    }
    castling(pos, us, list);
}

/// Call `visit` for every square a non-pawn piece on `from` attacks: empty
/// squares along its lines plus the first occupied square of each.
fn each_target(pos: &Position, from: Square, kind: PieceKind, mut visit: impl FnMut(Square)) {
    match kind {
        PieceKind::Knight => {
            for delta in KNIGHT_DELTAS {
                if let Some(to) = from.offset(delta) {
                    visit(to);
                }
            }
        }
        PieceKind::King => {
            for dir in Direction::ALL {
                if let Some(to) = from.offset(dir.delta()) {
                    visit(to);
                }
            }
        }
        PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => {
            let dirs: &[Direction] = match kind {
                PieceKind::Bishop => &Direction::DIAGONAL,
                PieceKind::Rook => &Direction::ORTHOGONAL,
                _ => &Direction::ALL,
            };
            for &dir in dirs {
                let mut cursor = from.offset(dir.delta());
                while let Some(to) = cursor {
                    visit(to);
                    if !pos.is_empty(to) {
                        break;
                    }
                    cursor = to.offset(dir.delta());
                }
            }
        }
        PieceKind::Pawn => {}
    }
}

fn push_promotions(list: &mut MoveList, from: Square, to: Square, pawn: Piece, captured: Option<Piece>) {
    for kind in PieceKind::PROMOTIONS {
        let promoted = Piece::new(kind, pawn.color());
        list.push(Move::new(MoveKind::Promotion, from, to, pawn, captured, Some(promoted)));
    }
}

fn pawn_captures(pos: &Position, us: Color, list: &mut MoveList) {
    let pawn = Piece::new(PieceKind::Pawn, us);
    let forward = us.forward();
    for &from in pos.piece_list(us, PieceKind::Pawn) {
        for side in [-1, 1] {
            let Some(to) = from.offset(forward + side) else {
                continue;
            };
            match pos.piece_on(to) {
                Some(victim) if victim.color() != us => {
                    if to.rank() == us.promotion_rank() {
                        push_promotions(list, from, to, pawn, Some(victim));
                    } else {
                        list.push(Move::normal(from, to, pawn, Some(victim)));
                    }
                }
                None if pos.en_passant() == Some(to) => {
                    let victim = Piece::new(PieceKind::Pawn, !us);
                    list.push(Move::new(MoveKind::EnPassant, from, to, pawn, Some(victim), None));
                }
                _ => {}
            }
        }
    }
}

fn pawn_pushes(pos: &Position, us: Color, list: &mut MoveList) {
    let pawn = Piece::new(PieceKind::Pawn, us);
    let forward = us.forward();
    for &from in pos.piece_list(us, PieceKind::Pawn) {
        let Some(to) = from.offset(forward) else {
            continue;
        };
        if !pos.is_empty(to) {
            continue;
        }
        if to.rank() == us.promotion_rank() {
            push_promotions(list, from, to, pawn, None);
            continue;
        }
        list.push(Move::normal(from, to, pawn, None));
        if from.rank() == us.pawn_rank()
            && let Some(double) = to.offset(forward)
            && pos.is_empty(double)
        {
            list.push(Move::new(MoveKind::DoublePawnPush, from, double, pawn, None, None));
        }
    }
}

fn castling(pos: &Position, us: Color, list: &mut MoveList) {
    let rights = pos.castling();
    if rights.is_empty() {
        return;
    }
    let king = pos.king_square(us);
    let home = Square::new(us.back_rank(), 4);
    if king != home || pos.in_check() {
        return;
    }
    let rook = Piece::new(PieceKind::Rook, us);
    for side in CastleSide::ALL {
        if !rights.has(us, side) || pos.piece_on(side.rook_from(us)) != Some(rook) {
            continue;
        }
        let rook_file = side.rook_from(us).file();
        let (low, high) = if rook_file > 4 { (5, rook_file) } else { (rook_file + 1, 4) };
        if (low..high).any(|file| !pos.is_empty(Square::new(us.back_rank(), file))) {
            continue;
        }
        let (transit, to) = (side.rook_to(us), side.king_to(us));
        if pos.is_attacked(!us, transit) || pos.is_attacked(!us, to) {
            continue;
        }
        list.push(Move::new(MoveKind::Castle, king, to, Piece::new(PieceKind::King, us), None, None));
    }
}
