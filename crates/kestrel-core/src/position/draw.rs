//! Draw rules: fifty moves, repetition and insufficient material.

use super::Position;
use crate::bitboard::Bitboard;
use crate::piece_kind::PieceKind;

impl Position {
    /// The fifty-move rule: 100 plies without a capture or pawn move.
    #[inline]
    pub fn check_50_moves(&self) -> bool {
        self.halfmove_clock >= 100
    }

    /// Earlier occurrences of the current position.
    ///
    /// Only positions with the same side to move inside the current
    /// reversible run are compared, and the walk stops at a null move.
    pub fn count_repetitions(&self) -> usize {
        let len = self.history.len();
        let limit = (self.halfmove_clock as usize).min(len);
        let mut count = 0;
        let mut back = 2;
        while back <= limit {
            let checkpoint = &self.history[len - back];
            if checkpoint.mv.is_null() || self.history[len - back + 1].mv.is_null() {
                break;
            }
            if checkpoint.hash == self.hash {
                count += 1;
            }
            back += 2;
        }
        count
    }

    /// Whether the current position has now occurred at least `n` times.
    #[inline]
    pub fn check_repetitions(&self, n: usize) -> bool {
        self.count_repetitions() + 1 >= n
    }

    /// Neither side can mate: bare kings, a single minor piece, or only
    /// bishops that all stand on one square color.
    pub fn check_insufficient_material(&self) -> bool {
        if (self.kind(PieceKind::Pawn) | self.kind(PieceKind::Rook) | self.kind(PieceKind::Queen)).is_nonempty() {
            return false;
        }
        let knights = self.kind(PieceKind::Knight);
        let bishops = self.kind(PieceKind::Bishop);
        if (knights | bishops).count() <= 1 {
            return true;
        }
        knights.is_empty()
            && ((bishops & Bitboard::LIGHT_SQUARES).is_empty() || (bishops & Bitboard::DARK_SQUARES).is_empty())
    }

    /// Fifty moves, threefold repetition or insufficient material.
    pub fn is_draw(&self) -> bool {
        self.check_50_moves() || self.check_repetitions(3) || self.check_insufficient_material()
    }
}

#[cfg(test)]
mod tests {
    use crate::position::Position;

    fn shuffle(pos: &mut Position) {
        for text in ["g1f3", "g8f6", "f3g1", "f6g8"] {
            pos.play(text).unwrap();
        }
    }

    #[test]
    fn fifty_move_rule() {
        let pos: Position = "4k3/8/8/8/8/8/4P3/4K3 w - - 99 80".parse().unwrap();
        assert!(!pos.check_50_moves());
        let pos: Position = "4k3/8/8/8/8/8/4P3/4K3 w - - 100 80".parse().unwrap();
        assert!(pos.check_50_moves());
        assert!(pos.is_draw());
    }

    #[test]
    fn threefold_repetition() {
        let mut pos = Position::starting();
        assert_eq!(pos.count_repetitions(), 0);
        shuffle(&mut pos);
        assert_eq!(pos.count_repetitions(), 1);
        assert!(pos.check_repetitions(2));
        assert!(!pos.is_draw());
        shuffle(&mut pos);
        assert_eq!(pos.count_repetitions(), 2);
        assert!(pos.check_repetitions(3));
        assert!(pos.is_draw());
    }

    #[test]
    fn irreversible_move_resets_the_run() {
        let mut pos = Position::starting();
        shuffle(&mut pos);
        pos.play("e2e4").unwrap();
        pos.play("e7e5").unwrap();
        shuffle(&mut pos);
        assert_eq!(pos.count_repetitions(), 1);
    }

    #[test]
    fn null_move_breaks_repetition() {
        let mut pos = Position::starting();
        pos.play("g1f3").unwrap();
        pos.make_null_move();
        pos.play("f3g1").unwrap();
        pos.make_null_move();
        assert_eq!(pos.hash(), Position::starting().hash());
        assert_eq!(pos.count_repetitions(), 0);
    }

    #[test]
    fn insufficient_material() {
        let draws = [
            "4k3/8/8/8/8/8/8/4K3 w - - 0 1",
            "4k3/8/8/8/8/8/8/4KN2 w - - 0 1",
            "4kb2/8/8/8/8/8/8/4K3 w - - 0 1",
            "2b1k3/8/8/8/8/8/8/4KB2 w - - 0 1",
        ];
        for fen in draws {
            let pos: Position = fen.parse().unwrap();
            assert!(pos.check_insufficient_material(), "{fen}");
        }
        let not_draws = [
            "4k3/8/8/8/8/8/4P3/4K3 w - - 0 1",
            "4k3/8/8/8/8/8/8/3NKN2 w - - 0 1",
            "3bk3/8/8/8/8/8/8/4KB2 w - - 0 1",
            "4k3/8/8/8/8/8/8/4K2R w - - 0 1",
            "4kn2/8/8/8/8/8/8/4KB2 w - - 0 1",
        ];
        for fen in not_draws {
            let pos: Position = fen.parse().unwrap();
            assert!(!pos.check_insufficient_material(), "{fen}");
        }
    }
}
