//! Handcrafted static evaluation.
//!
//! Every term produces a White-relative middlegame/endgame [`Score`]; the
//! sum is tapered by [`game_phase`] and then turned around for the side to
//! move.

pub mod king_safety;
pub mod material;
pub mod mobility;
pub mod phase;
pub mod pst;
pub mod score;

use kestrel_core::{Color, Position};

use self::king_safety::evaluate_king_safety;
use self::material::evaluate_material;
use self::mobility::evaluate_mobility;
use self::phase::{ENDGAME_PHASE, game_phase};
use self::pst::evaluate_pst;
use self::score::Score;

/// Value of a dead draw.
pub const DRAW_VALUE: i32 = 0;

/// Bonus for having the move, unless the move is spent getting out of check.
pub const TEMPO: i32 = 10;

/// Tapered but not yet side-relative sum of every term.
pub fn white_score(pos: &Position) -> Score {
    let mut score = evaluate_material(pos) + evaluate_pst(pos) + evaluate_mobility(pos);
    if game_phase(pos) > ENDGAME_PHASE {
        score += evaluate_king_safety(pos);
    }
    score
}

/// Static value of `pos` in centipawns from the side to move's view.
pub fn evaluate(pos: &Position) -> i32 {
    if pos.check_insufficient_material() {
        return DRAW_VALUE;
    }
    let value = white_score(pos).taper(game_phase(pos));
    let value = match pos.side_to_move() {
        Color::White => value,
        Color::Black => -value,
    };
    if pos.in_check() { value } else { value + TEMPO }
}

#[cfg(test)]
mod tests {
    use kestrel_core::Position;

    use super::phase::game_phase;
    use super::{DRAW_VALUE, TEMPO, evaluate, white_score};

    fn eval(fen: &str) -> i32 {
        evaluate(&fen.parse::<Position>().unwrap())
    }

    #[test]
    fn starting_position_is_tempo() {
        assert_eq!(evaluate(&Position::starting()), TEMPO);
    }

    #[test]
    fn insufficient_material_is_a_draw() {
        assert_eq!(eval("8/8/4k3/8/8/3BK3/8/8 w - - 0 1"), DRAW_VALUE);
        assert_eq!(eval("8/8/4k3/8/8/4K3/8/8 b - - 0 1"), DRAW_VALUE);
    }

    #[test]
    fn sides_see_opposite_values() {
        let white = eval("4k3/8/8/8/8/8/4P3/R3K3 w - - 0 1");
        let black = eval("4k3/8/8/8/8/8/4P3/R3K3 b - - 0 1");
        assert!(white > 400);
        assert_eq!(white - TEMPO, -(black - TEMPO));
    }

    #[test]
    fn mirrored_position_evaluates_the_same() {
        let white = eval("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3");
        let black = eval("rnbqkb1r/pppp1ppp/5n2/4p3/4P3/2N5/PPPP1PPP/R1BQKBNR b KQkq - 2 3");
        assert_eq!(white, black);
    }

    #[test]
    fn no_tempo_when_in_check() {
        let pos: Position = "4k3/8/8/8/8/8/8/R3K2r w - - 0 1".parse().unwrap();
        assert!(pos.in_check());
        assert_eq!(evaluate(&pos), white_score(&pos).taper(game_phase(&pos)));
    }
}
