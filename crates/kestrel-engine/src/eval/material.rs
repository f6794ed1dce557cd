//! Material balance with piece-pair terms.
//!
//! Scores are from White's perspective (positive = White ahead).

use kestrel_core::{Color, PieceKind, Position};

use crate::eval::score::{S, Score};

/// Base material values indexed by [`PieceKind::index()`].
pub const MATERIAL_VALUE: [Score; PieceKind::COUNT] = [
    S(100, 120), // Pawn
    S(320, 310), // Knight
    S(330, 320), // Bishop
    S(500, 520), // Rook
    S(900, 950), // Queen
    S(0, 0),     // King
];

pub const BISHOP_PAIR: Score = S(50, 60);

/// Two knights are slightly worse than their sum.
pub const KNIGHT_PAIR: Score = S(-8, -10);

/// Two rooks overlap in what they do.
pub const ROOK_PAIR: Score = S(-12, -8);

fn material_for_side(pos: &Position, color: Color) -> Score {
    let mut score = Score::ZERO;
    for kind in PieceKind::ALL {
        score += MATERIAL_VALUE[kind.index()] * pos.count(color, kind) as i16;
    }
    for (kind, pair) in [
        (PieceKind::Bishop, BISHOP_PAIR),
        (PieceKind::Knight, KNIGHT_PAIR),
        (PieceKind::Rook, ROOK_PAIR),
    ] {
        if pos.count(color, kind) >= 2 {
            score += pair;
        }
    }
    score
}

pub fn evaluate_material(pos: &Position) -> Score {
    material_for_side(pos, Color::White) - material_for_side(pos, Color::Black)
}

#[cfg(test)]
mod tests {
    use kestrel_core::{PieceKind, Position};

    use super::{BISHOP_PAIR, MATERIAL_VALUE, evaluate_material};
    use crate::eval::score::Score;

    #[test]
    fn starting_position_is_balanced() {
        assert_eq!(evaluate_material(&Position::starting()), Score::ZERO);
    }

    #[test]
    fn missing_black_queen() {
        let pos: Position = "rnb1kbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1".parse().unwrap();
        assert_eq!(evaluate_material(&pos), MATERIAL_VALUE[PieceKind::Queen.index()]);
    }

    #[test]
    fn losing_a_bishop_also_loses_the_pair() {
        let pos: Position = "rn1qkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1".parse().unwrap();
        assert_eq!(evaluate_material(&pos), MATERIAL_VALUE[PieceKind::Bishop.index()] + BISHOP_PAIR);
    }
}
