//! Perft (performance test) for move generation correctness verification.

use tracing::debug;

use crate::movegen::legal_moves;
use crate::position::Position;

/// Count the leaf nodes of the legal move tree to `depth`.
///
/// Depth 0 returns 1 (the current position). Depth 1 returns the number of
/// legal moves without making them. The position is restored on return.
pub fn perft(pos: &mut Position, depth: usize) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = legal_moves(pos);
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0u64;
    for &mv in moves.iter() {
        pos.make_move(mv);
        nodes += perft(pos, depth - 1);
        pos.undo_move();
    }
    nodes
}

/// Perft split by root move, as `(coordinate move, node count)` pairs
/// sorted alphabetically.
pub fn divide(pos: &mut Position, depth: usize) -> Vec<(String, u64)> {
    let moves = legal_moves(pos);
    let mut results: Vec<(String, u64)> = moves
        .iter()
        .map(|&mv| {
            pos.make_move(mv);
            let count = if depth <= 1 { 1 } else { perft(pos, depth - 1) };
            pos.undo_move();
            debug!(mv = %mv, nodes = count, "divide");
            (mv.to_string(), count)
        })
        .collect();
    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- Position 1: Starting position ---

    #[test]
    fn perft_startpos_depth_1() {
        assert_eq!(perft(&mut Position::starting(), 1), 20);
    }

    #[test]
    fn perft_startpos_depth_2() {
        assert_eq!(perft(&mut Position::starting(), 2), 400);
    }

    #[test]
    fn perft_startpos_depth_3() {
        assert_eq!(perft(&mut Position::starting(), 3), 8_902);
    }

    #[test]
    fn perft_startpos_depth_4() {
        assert_eq!(perft(&mut Position::starting(), 4), 197_281);
    }

    #[test]
    #[ignore] // slow
    fn perft_startpos_depth_5() {
        assert_eq!(perft(&mut Position::starting(), 5), 4_865_609);
    }

    // --- Position 2: Kiwipete ---

    fn kiwipete() -> Position {
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1".parse().unwrap()
    }

    #[test]
    fn perft_kiwipete_depth_1() {
        assert_eq!(perft(&mut kiwipete(), 1), 48);
    }

    #[test]
    fn perft_kiwipete_depth_2() {
        assert_eq!(perft(&mut kiwipete(), 2), 2_039);
    }

    #[test]
    fn perft_kiwipete_depth_3() {
        assert_eq!(perft(&mut kiwipete(), 3), 97_862);
    }

    #[test]
    #[ignore] // slow
    fn perft_kiwipete_depth_4() {
        assert_eq!(perft(&mut kiwipete(), 4), 4_085_603);
    }

    // --- Position 3: en-passant pins along the fifth rank ---

    fn position3() -> Position {
        "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1".parse().unwrap()
    }

    #[test]
    fn perft_pos3_depth_1() {
        assert_eq!(perft(&mut position3(), 1), 14);
    }

    #[test]
    fn perft_pos3_depth_2() {
        assert_eq!(perft(&mut position3(), 2), 191);
    }

    #[test]
    fn perft_pos3_depth_3() {
        assert_eq!(perft(&mut position3(), 3), 2_812);
    }

    #[test]
    fn perft_pos3_depth_4() {
        assert_eq!(perft(&mut position3(), 4), 43_238);
    }

    #[test]
    #[ignore] // slow
    fn perft_pos3_depth_5() {
        assert_eq!(perft(&mut position3(), 5), 674_624);
    }

    // --- Position 4: promotions and checks ---

    fn position4() -> Position {
        "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1".parse().unwrap()
    }

    #[test]
    fn perft_pos4_depth_1() {
        assert_eq!(perft(&mut position4(), 1), 6);
    }

    #[test]
    fn perft_pos4_depth_2() {
        assert_eq!(perft(&mut position4(), 2), 264);
    }

    #[test]
    fn perft_pos4_depth_3() {
        assert_eq!(perft(&mut position4(), 3), 9_467);
    }

    // --- Position 5 ---

    fn position5() -> Position {
        "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8".parse().unwrap()
    }

    #[test]
    fn perft_pos5_depth_1() {
        assert_eq!(perft(&mut position5(), 1), 44);
    }

    #[test]
    fn perft_pos5_depth_2() {
        assert_eq!(perft(&mut position5(), 2), 1_486);
    }

    #[test]
    fn perft_pos5_depth_3() {
        assert_eq!(perft(&mut position5(), 3), 62_379);
    }

    #[test]
    fn perft_leaves_position_untouched() {
        let mut pos = kiwipete();
        let before = pos.clone();
        perft(&mut pos, 3);
        assert_eq!(pos, before);
    }

    #[test]
    fn divide_sums_to_perft() {
        let mut pos = Position::starting();
        let split = divide(&mut pos, 3);
        assert_eq!(split.len(), 20);
        assert_eq!(split.iter().map(|(_, n)| n).sum::<u64>(), 8_902);
        assert_eq!(split[0].0, "a2a3");
    }
}
