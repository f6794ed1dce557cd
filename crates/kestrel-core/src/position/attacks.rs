//! Attack, check and exchange queries.

use super::Position;
use crate::attacks::{bishop_attacks, king_attacks, knight_attacks, pawn_attacks, piece_attacks, rook_attacks};
use crate::bitboard::Bitboard;
use crate::castle_rights::CastleSide;
use crate::chess_move::Move;
use crate::color::Color;
use crate::piece_kind::PieceKind;
use crate::square::Square;

impl Position {
    #[inline]
    fn orthogonal_sliders(&self, color: Color) -> Bitboard {
        self.pieces(color, PieceKind::Rook) | self.pieces(color, PieceKind::Queen)
    }

    #[inline]
    fn diagonal_sliders(&self, color: Color) -> Bitboard {
        self.pieces(color, PieceKind::Bishop) | self.pieces(color, PieceKind::Queen)
    }

    /// Whether any piece of `by` attacks `sq`.
    ///
    /// Attack patterns are cast from the target square and intersected with
    /// the attacker's pieces; a pawn of `by` attacks `sq` exactly when a pawn
    /// of the other color on `sq` would attack the pawn.
    pub fn is_attacked(&self, by: Color, sq: Square) -> bool {
        let occupied = self.occupied();
        (pawn_attacks(!by, sq) & self.pieces(by, PieceKind::Pawn)).is_nonempty()
            || (knight_attacks(sq) & self.pieces(by, PieceKind::Knight)).is_nonempty()
            || (king_attacks(sq) & self.pieces(by, PieceKind::King)).is_nonempty()
            || (rook_attacks(sq, occupied) & self.orthogonal_sliders(by)).is_nonempty()
            || (bishop_attacks(sq, occupied) & self.diagonal_sliders(by)).is_nonempty()
    }

    /// Pieces of both colors attacking `sq` given `occupied` as blockers.
    pub fn attackers_to(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        (pawn_attacks(Color::Black, sq) & self.pieces(Color::White, PieceKind::Pawn))
            | (pawn_attacks(Color::White, sq) & self.pieces(Color::Black, PieceKind::Pawn))
            | (knight_attacks(sq) & self.kind(PieceKind::Knight))
            | (king_attacks(sq) & self.kind(PieceKind::King))
            | (rook_attacks(sq, occupied) & (self.kind(PieceKind::Rook) | self.kind(PieceKind::Queen)))
            | (bishop_attacks(sq, occupied) & (self.kind(PieceKind::Bishop) | self.kind(PieceKind::Queen)))
    }

    /// Whether the side to move is in check. Cached until the next move.
    pub fn in_check(&self) -> bool {
        if let Some(cached) = self.in_check.get() {
            return cached;
        }
        let us = self.side_to_move;
        let check = self.is_attacked(!us, self.king_square(us));
        self.in_check.set(Some(check));
        check
    }

    /// Whether the side not to move is in check, i.e. the last move was illegal.
    #[inline]
    pub fn opponent_in_check(&self) -> bool {
        let them = !self.side_to_move;
        self.is_attacked(self.side_to_move, self.king_square(them))
    }

    /// Whether `mv` would give check, without applying it.
    ///
    /// Covers direct checks by the moved or promoted piece, discovered
    /// checks through the vacated square (or the captured en-passant pawn's
    /// square), and checks by the rook after castling.
    pub fn gives_check(&self, mv: Move) -> bool {
        let us = self.side_to_move;
        let king = self.king_square(!us);
        let (from, to) = (mv.from(), mv.to());

        if mv.is_castle() {
            let side = CastleSide::from_king_to(to);
            let (rook_from, rook_to) = (side.rook_from(us), side.rook_to(us));
            let occupied = self.occupied().without(from).without(rook_from).with(to).with(rook_to);
            let orthogonal = self.orthogonal_sliders(us).without(rook_from).with(rook_to);
            return (rook_attacks(king, occupied) & orthogonal).is_nonempty()
                || (bishop_attacks(king, occupied) & self.diagonal_sliders(us)).is_nonempty();
        }

        let mut occupied = self.occupied().without(from).with(to);
        if mv.is_en_passant() {
            occupied = occupied.without(Square::new(from.rank(), to.file()));
        }

        let kind = mv.promotion().map_or(mv.piece().kind(), |p| p.kind());
        if piece_attacks(kind, us, to, occupied).contains(king) {
            return true;
        }

        let movers = !from.bitboard();
        ((rook_attacks(king, occupied) & self.orthogonal_sliders(us) & movers)
            | (bishop_attacks(king, occupied) & self.diagonal_sliders(us) & movers))
            .is_nonempty()
    }

    fn least_valuable(&self, attackers: Bitboard, color: Color) -> Option<(Square, PieceKind)> {
        PieceKind::ALL
            .into_iter()
            .find_map(|kind| (attackers & self.pieces(color, kind)).lsb().map(|sq| (sq, kind)))
    }

    /// Static exchange evaluation of `mv`: the material balance, from the
    /// mover's side, of the best sequence of recaptures on the target square.
    pub fn see(&self, mv: Move) -> i32 {
        let (from, to) = (mv.from(), mv.to());
        let mut gain = [0i32; 32];
        let mut depth = 0;

        gain[0] = mv.captured().map_or(0, |p| p.kind().value());
        let mut on_square = mv.piece().kind().value();
        if let Some(promoted) = mv.promotion() {
            gain[0] += promoted.kind().value() - PieceKind::Pawn.value();
            on_square = promoted.kind().value();
        }

        let mut occupied = self.occupied();
        if mv.is_en_passant() {
            occupied = occupied.without(Square::new(from.rank(), to.file()));
        }
        let diagonal = self.diagonal_sliders(Color::White) | self.diagonal_sliders(Color::Black);
        let orthogonal = self.orthogonal_sliders(Color::White) | self.orthogonal_sliders(Color::Black);

        let mut attackers = self.attackers_to(to, occupied);
        let mut side = mv.color();
        let (mut attacker, mut attacker_kind) = (from, mv.piece().kind());

        while depth + 1 < gain.len() {
            depth += 1;
            gain[depth] = on_square - gain[depth - 1];

            occupied = occupied.without(attacker);
            if matches!(attacker_kind, PieceKind::Pawn | PieceKind::Bishop | PieceKind::Queen) {
                attackers |= bishop_attacks(to, occupied) & diagonal;
            }
            if matches!(attacker_kind, PieceKind::Rook | PieceKind::Queen) {
                attackers |= rook_attacks(to, occupied) & orthogonal;
            }
            attackers &= occupied;

            side = !side;
            let Some((sq, kind)) = self.least_valuable(attackers, side) else {
                break;
            };
            (attacker, attacker_kind) = (sq, kind);
            on_square = kind.value();
        }

        while depth > 1 {
            depth -= 1;
            gain[depth - 1] = -(-gain[depth - 1]).max(gain[depth]);
        }
        gain[0]
    }
}

#[cfg(test)]
mod tests {
    use crate::chess_move::Move;
    use crate::color::Color;
    use crate::movegen::legal_moves;
    use crate::position::Position;
    use crate::square::Square;

    fn find(pos: &mut Position, text: &str) -> Move {
        legal_moves(pos)
            .iter()
            .copied()
            .find(|mv| mv.to_string() == text)
            .unwrap_or_else(|| panic!("{text} not legal"))
    }

    #[test]
    fn attacks_in_starting_position() {
        let pos = Position::starting();
        assert!(pos.is_attacked(Color::White, Square::F3));
        assert!(pos.is_attacked(Color::White, Square::D2));
        assert!(!pos.is_attacked(Color::White, Square::E4));
        assert!(pos.is_attacked(Color::Black, Square::C6));
        assert!(!pos.is_attacked(Color::Black, Square::D4));
        assert!(!pos.in_check());
    }

    #[test]
    fn slider_attacks_respect_blockers() {
        let pos: Position = "4k3/8/8/8/8/8/4P3/R3K3 w - - 0 1".parse().unwrap();
        assert!(pos.is_attacked(Color::White, Square::A8));
        assert!(pos.is_attacked(Color::White, Square::D1));
        assert!(!pos.is_attacked(Color::White, Square::E3));
        assert!(!pos.is_attacked(Color::White, Square::G1));
        assert!(pos.is_attacked(Color::White, Square::F3));
    }

    #[test]
    fn detects_check() {
        let pos: Position = "4k3/8/8/8/8/8/8/4K2r w - - 0 1".parse().unwrap();
        assert!(pos.in_check());
        let pos: Position = "4k3/8/8/8/8/8/4P3/4K2r w - - 0 1".parse().unwrap();
        assert!(pos.in_check());
        let pos: Position = "4k3/8/8/8/8/8/8/4KN1r w - - 0 1".parse().unwrap();
        assert!(!pos.in_check());
    }

    #[test]
    fn gives_check_matches_make_move() {
        let fens = [
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
            "3k4/8/8/K1pP3r/8/8/8/8 w - c6 0 1",
            "5k2/8/8/8/8/8/8/4K2R w K - 0 1",
            "4k3/1P6/8/8/8/8/8/4K3 w - - 0 1",
        ];
        for fen in fens {
            let mut pos: Position = fen.parse().unwrap();
            for mv in legal_moves(&mut pos).iter().copied() {
                let predicted = pos.gives_check(mv);
                pos.make_move(mv);
                assert_eq!(predicted, pos.in_check(), "{fen}: {mv:?}");
                pos.undo_move();
            }
        }
    }

    #[test]
    fn castling_rook_gives_check() {
        let mut pos: Position = "5k2/8/8/8/8/8/8/4K2R w K - 0 1".parse().unwrap();
        let castle = find(&mut pos, "e1g1");
        assert!(pos.gives_check(castle));
    }

    #[test]
    fn en_passant_discovers_check() {
        let mut pos: Position = "8/8/8/k1pP3R/8/8/8/4K3 w - c6 0 1".parse().unwrap();
        let ep = find(&mut pos, "d5c6");
        assert!(pos.gives_check(ep));
    }

    #[test]
    fn exchange_evaluation() {
        // Pawn takes defended knight: wins knight, loses pawn.
        let mut pos: Position = "4k3/8/2p5/3n4/4P3/8/8/4K3 w - - 0 1".parse().unwrap();
        let mv = find(&mut pos, "e4d5");
        assert_eq!(pos.see(mv), 320 - 100);

        // Rook takes pawn defended by pawn: loses the exchange.
        let mut pos: Position = "4k3/8/2p5/3p4/8/8/8/3RK3 w - - 0 1".parse().unwrap();
        let mv = find(&mut pos, "d1d5");
        assert_eq!(pos.see(mv), 100 - 500);

        // Undefended piece.
        let mut pos: Position = "4k3/8/8/3q4/8/8/8/3RK3 w - - 0 1".parse().unwrap();
        let mv = find(&mut pos, "d1d5");
        assert_eq!(pos.see(mv), 900);

        // X-ray: doubled rooks win a pawn defended by one rook.
        let mut pos: Position = "3rk3/8/8/3p4/8/8/3R4/3RK3 w - - 0 1".parse().unwrap();
        let mv = find(&mut pos, "d2d5");
        assert_eq!(pos.see(mv), 100);
    }
}
