//! Applying and undoing moves in place.

use super::{Checkpoint, Position};
use crate::castle_rights::CastleSide;
use crate::attacks::pawn_attacks;
use crate::chess_move::{Move, MoveKind};
use crate::color::Color;
use crate::piece_kind::PieceKind;
use crate::square::Square;
use crate::zobrist;

/// Square of the pawn removed by an en-passant capture landing on `to`.
#[inline]
fn en_passant_victim(from: Square, to: Square) -> Square {
    Square::new(from.rank(), to.file())
}

impl Position {
    /// Apply a pseudo-legal move generated for this position.
    ///
    /// Must be paired with exactly one [`Position::undo_move`] before the
    /// position is used at the caller's level again. Legality (own king left
    /// in check) is not verified here.
    pub fn make_move(&mut self, mv: Move) {
        debug_assert!(mv.is_valid(), "make_move with malformed {mv:?}");
        debug_assert_eq!(self.piece_on(mv.from()), Some(mv.piece()), "{mv:?} in {self:?}");
        debug_assert_eq!(mv.color(), self.side_to_move);

        let us = self.side_to_move;
        let (from, to) = (mv.from(), mv.to());
        let mut checkpoint = Checkpoint {
            mv,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            hash: self.hash,
            in_check: self.in_check.get(),
            captured_slot: 0,
            promoted_slot: 0,
        };

        self.hash ^= zobrist::en_passant(self.en_passant);
        self.en_passant = None;

        match mv.kind() {
            MoveKind::Normal => {
                if mv.is_capture() {
                    debug_assert_eq!(self.piece_on(to), mv.captured());
                    checkpoint.captured_slot = self.remove_piece(to);
                }
                self.move_piece(from, to);
            }
            MoveKind::DoublePawnPush => {
                self.move_piece(from, to);
                let target = Square::new((from.rank() + to.rank()) / 2, from.file());
                // Only a capturable target is part of the position.
                if (self.pieces(!us, PieceKind::Pawn) & pawn_attacks(us, target)).is_nonempty() {
                    self.en_passant = Some(target);
                    self.hash ^= zobrist::en_passant(self.en_passant);
                }
            }
            MoveKind::EnPassant => {
                self.move_piece(from, to);
                checkpoint.captured_slot = self.remove_piece(en_passant_victim(from, to));
            }
            MoveKind::Castle => {
                let side = CastleSide::from_king_to(to);
                self.move_piece(from, to);
                self.move_piece(side.rook_from(us), side.rook_to(us));
            }
            MoveKind::Promotion => {
                if mv.is_capture() {
                    checkpoint.captured_slot = self.remove_piece(to);
                }
                checkpoint.promoted_slot = self.remove_piece(from);
                if let Some(promoted) = mv.promotion() {
                    self.add_piece(to, promoted);
                }
            }
        }

        let castling = self.castling.after_move(from, to);
        if castling != self.castling {
            self.hash ^= zobrist::castling(self.castling) ^ zobrist::castling(castling);
            self.castling = castling;
        }

        if mv.is_capture() || mv.piece().kind() == PieceKind::Pawn {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }
        if us == Color::Black {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }

        self.side_to_move = !us;
        self.hash ^= zobrist::side(Color::Black);
        self.in_check.set(None);
        self.history.push(checkpoint);

        debug_assert_eq!(self.hash, self.compute_hash(), "hash drift after {mv:?}");
    }

    /// Take back the last move applied with [`Position::make_move`].
    pub fn undo_move(&mut self) {
        let Some(checkpoint) = self.history.pop() else {
            debug_assert!(false, "undo_move with empty history");
            return;
        };
        let mv = checkpoint.mv;
        debug_assert!(!mv.is_null(), "undo_move after a null move");

        let us = !self.side_to_move;
        self.side_to_move = us;
        let (from, to) = (mv.from(), mv.to());

        match mv.kind() {
            MoveKind::Normal => {
                self.move_piece(to, from);
                if let Some(captured) = mv.captured() {
                    self.restore_piece(to, captured, checkpoint.captured_slot);
                }
            }
            MoveKind::DoublePawnPush => self.move_piece(to, from),
            MoveKind::EnPassant => {
                if let Some(captured) = mv.captured() {
                    self.restore_piece(en_passant_victim(from, to), captured, checkpoint.captured_slot);
                }
                self.move_piece(to, from);
            }
            MoveKind::Castle => {
                let side = CastleSide::from_king_to(to);
                self.move_piece(side.rook_to(us), side.rook_from(us));
                self.move_piece(to, from);
            }
            MoveKind::Promotion => {
                self.remove_piece(to);
                self.restore_piece(from, mv.piece(), checkpoint.promoted_slot);
                if let Some(captured) = mv.captured() {
                    self.restore_piece(to, captured, checkpoint.captured_slot);
                }
            }
        }

        self.fullmove_number = checkpoint.fullmove_number;
        self.castling = checkpoint.castling;
        self.en_passant = checkpoint.en_passant;
        self.halfmove_clock = checkpoint.halfmove_clock;
        self.hash = checkpoint.hash;
        self.in_check.set(checkpoint.in_check);
    }

    /// Pass the turn: flip the side to move, clear en passant and bump the
    /// half-move clock. Only for null-move pruning; never call in check.
    pub fn make_null_move(&mut self) {
        debug_assert!(!self.in_check(), "null move while in check");
        self.history.push(Checkpoint {
            mv: Move::NULL,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            hash: self.hash,
            in_check: self.in_check.get(),
            captured_slot: 0,
            promoted_slot: 0,
        });
        self.hash ^= zobrist::en_passant(self.en_passant) ^ zobrist::side(Color::Black);
        self.en_passant = None;
        self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        self.side_to_move = !self.side_to_move;
        self.in_check.set(Some(false));
    }

    /// Take back a [`Position::make_null_move`].
    pub fn undo_null_move(&mut self) {
        let Some(checkpoint) = self.history.pop() else {
            debug_assert!(false, "undo_null_move with empty history");
            return;
        };
        debug_assert!(checkpoint.mv.is_null(), "undo_null_move after a real move");
        self.side_to_move = !self.side_to_move;
        self.en_passant = checkpoint.en_passant;
        self.halfmove_clock = checkpoint.halfmove_clock;
        self.hash = checkpoint.hash;
        self.in_check.set(checkpoint.in_check);
    }
}

#[cfg(test)]
mod tests {
    use crate::castle_rights::CastleSide;
    use crate::chess_move::{Move, MoveKind};
    use crate::color::Color;
    use crate::movegen::legal_moves;
    use crate::piece::Piece;
    use crate::position::Position;
    use crate::square::Square;

    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

    fn find(pos: &mut Position, text: &str) -> Move {
        legal_moves(pos)
            .iter()
            .copied()
            .find(|mv| mv.to_string() == text)
            .unwrap_or_else(|| panic!("{text} not legal in {pos:?}"))
    }

    /// Walk every legal move to `depth`, checking make/undo restores the
    /// position exactly and the hash never drifts.
    fn walk(pos: &mut Position, depth: u32) {
        if depth == 0 {
            return;
        }
        for mv in legal_moves(pos).iter().copied() {
            let before = pos.clone();
            pos.make_move(mv);
            assert!(pos.is_consistent(), "inconsistent after {mv:?}");
            walk(pos, depth - 1);
            pos.undo_move();
            assert_eq!(*pos, before, "undo of {mv:?} did not restore");
            assert!(pos.is_consistent());
        }
    }

    #[test]
    fn make_undo_roundtrip_kiwipete() {
        let mut pos: Position = KIWIPETE.parse().unwrap();
        walk(&mut pos, 2);
    }

    #[test]
    fn make_undo_roundtrip_promotions_and_en_passant() {
        let mut pos: Position = "r3k3/1P6/8/3pP3/8/8/6p1/4K2R w Kq d6 0 1".parse().unwrap();
        walk(&mut pos, 2);
    }

    #[test]
    fn double_push_without_a_capturer_leaves_no_target() {
        let mut pos = Position::starting();
        let mv = find(&mut pos, "e2e4");
        assert_eq!(mv.kind(), MoveKind::DoublePawnPush);
        pos.make_move(mv);
        assert_eq!(pos.en_passant(), None);
        assert_eq!(pos.side_to_move(), Color::Black);
        assert_eq!(pos.halfmove_clock(), 0);
        assert_eq!(pos.fullmove_number(), 1);
        assert_eq!(pos.hash(), pos.compute_hash());
        let reply = find(&mut pos, "g8f6");
        pos.make_move(reply);
        assert_eq!(pos.en_passant(), None);
        assert_eq!(pos.halfmove_clock(), 1);
        assert_eq!(pos.fullmove_number(), 2);
    }

    #[test]
    fn double_push_next_to_an_enemy_pawn_sets_en_passant() {
        let mut pos: Position = "4k3/8/8/8/3p4/8/4P3/4K3 w - - 0 1".parse().unwrap();
        let mv = find(&mut pos, "e2e4");
        pos.make_move(mv);
        assert_eq!(pos.en_passant(), Some(Square::E3));
        assert_eq!(pos.hash(), pos.compute_hash());
        let capture = find(&mut pos, "d4e3");
        assert_eq!(capture.kind(), MoveKind::EnPassant);
    }

    #[test]
    fn counters_saturate_instead_of_overflowing() {
        let mut pos: Position = "4k3/8/8/8/8/8/8/4K3 b - - 65535 65535".parse().unwrap();
        let before = pos.clone();
        let mv = find(&mut pos, "e8d8");
        pos.make_move(mv);
        assert_eq!(pos.fullmove_number(), u16::MAX);
        assert_eq!(pos.halfmove_clock(), u16::MAX);
        pos.make_null_move();
        assert_eq!(pos.halfmove_clock(), u16::MAX);
        pos.undo_null_move();
        pos.undo_move();
        assert_eq!(pos, before);
    }

    #[test]
    fn en_passant_removes_the_pawn() {
        let mut pos: Position = "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1".parse().unwrap();
        let mv = find(&mut pos, "e5d6");
        assert_eq!(mv.kind(), MoveKind::EnPassant);
        pos.make_move(mv);
        assert_eq!(pos.piece_on(Square::D5), None);
        assert_eq!(pos.piece_on(Square::D6), Some(Piece::WHITE_PAWN));
        pos.undo_move();
        assert_eq!(pos.piece_on(Square::D5), Some(Piece::BLACK_PAWN));
    }

    #[test]
    fn castling_moves_rook_and_clears_rights() {
        let mut pos: Position = KIWIPETE.parse().unwrap();
        let mv = find(&mut pos, "e1c1");
        assert!(mv.is_castle());
        pos.make_move(mv);
        assert_eq!(pos.piece_on(Square::D1), Some(Piece::WHITE_ROOK));
        assert_eq!(pos.piece_on(Square::A1), None);
        assert!(!pos.castling().has(Color::White, CastleSide::KingSide));
        assert!(!pos.castling().has(Color::White, CastleSide::QueenSide));
        assert!(pos.castling().has(Color::Black, CastleSide::QueenSide));
    }

    #[test]
    fn capturing_a_rook_revokes_its_right() {
        let mut pos: Position = "r3k2r/8/8/8/8/8/6B1/4K3 w kq - 0 1".parse().unwrap();
        let mv = find(&mut pos, "g2a8");
        pos.make_move(mv);
        assert!(!pos.castling().has(Color::Black, CastleSide::QueenSide));
        assert!(pos.castling().has(Color::Black, CastleSide::KingSide));
        assert_eq!(pos.hash(), pos.compute_hash());
    }

    #[test]
    fn null_move_roundtrip() {
        let mut pos: Position = "4k3/8/8/3pP3/8/8/8/4K3 w - d6 3 1".parse().unwrap();
        let before = pos.clone();
        pos.make_null_move();
        assert_eq!(pos.side_to_move(), Color::Black);
        assert_eq!(pos.en_passant(), None);
        assert_eq!(pos.halfmove_clock(), 4);
        assert_eq!(pos.hash(), pos.compute_hash());
        assert_eq!(pos.last_move(), Some(Move::NULL));
        pos.undo_null_move();
        assert_eq!(pos, before);
    }

    #[test]
    fn hash_stays_consistent_over_a_long_line() {
        let mut pos = Position::starting();
        let mut seed = 0x2545_f491_u64;
        for ply in 0..120 {
            let moves = legal_moves(&mut pos);
            if moves.is_empty() {
                break;
            }
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let mv = moves[(seed >> 33) as usize % moves.len()];
            pos.make_move(mv);
            assert_eq!(pos.hash(), pos.compute_hash(), "ply {ply}");
            if ply % 7 == 3 && !pos.in_check() {
                pos.make_null_move();
                assert_eq!(pos.hash(), pos.compute_hash());
                pos.undo_null_move();
            }
        }
        while pos.ply() > 0 {
            pos.undo_move();
            assert_eq!(pos.hash(), pos.compute_hash());
        }
        assert_eq!(pos, Position::starting());
    }
}
