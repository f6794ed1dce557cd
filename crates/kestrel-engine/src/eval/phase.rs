//! Game phase from the officers left on the board.

use kestrel_core::{Color, PieceKind, Position};

/// Phase of the opening piece set: four minors (1 each), four rooks (2
/// each), two queens (4 each).
pub const MAX_PHASE: i32 = 24;

/// At or below this phase the position is treated as an endgame.
pub const ENDGAME_PHASE: i32 = 6;

const WEIGHTS: [(PieceKind, i32); 4] = [
    (PieceKind::Knight, 1),
    (PieceKind::Bishop, 1),
    (PieceKind::Rook, 2),
    (PieceKind::Queen, 4),
];

/// Weighted officer count in `0..=MAX_PHASE`; promotions cannot push it
/// past the cap.
pub fn game_phase(pos: &Position) -> i32 {
    let phase: i32 = WEIGHTS
        .iter()
        .map(|&(kind, weight)| {
            let count = Color::ALL.iter().map(|&color| pos.count(color, kind)).sum::<usize>();
            count as i32 * weight
        })
        .sum();
    phase.min(MAX_PHASE)
}

#[cfg(test)]
mod tests {
    use kestrel_core::Position;

    use super::{MAX_PHASE, game_phase};

    fn phase_of(fen: &str) -> i32 {
        game_phase(&fen.parse::<Position>().unwrap())
    }

    #[test]
    fn opening_is_max_phase() {
        assert_eq!(game_phase(&Position::starting()), MAX_PHASE);
    }

    #[test]
    fn bare_kings_are_zero() {
        assert_eq!(phase_of("8/8/4k3/8/8/4K3/8/8 w - - 0 1"), 0);
    }

    #[test]
    fn missing_queen_drops_four() {
        assert_eq!(phase_of("rnb1kbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"), 20);
    }

    #[test]
    fn extra_queens_are_capped() {
        assert_eq!(phase_of("qqqqkqqq/8/8/8/8/8/8/QQQQKQQQ w - - 0 1"), MAX_PHASE);
    }
}
