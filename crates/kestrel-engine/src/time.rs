//! Per-search limits and time allocation.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use kestrel_core::{Color, Move, Position};

use crate::eval::phase::{MAX_PHASE, game_phase};
use crate::search::control::SearchControl;

/// Limits and mode for one search call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchConfig {
    pub white_time: Option<Duration>,
    pub black_time: Option<Duration>,
    pub white_increment: Duration,
    pub black_increment: Duration,
    pub moves_to_go: Option<u32>,
    pub move_time: Option<Duration>,
    pub depth: Option<u8>,
    pub nodes: Option<u64>,
    /// Stop once a mate in this many moves is found.
    pub mate: Option<u32>,
    /// Restrict the root to these moves; empty means all legal moves.
    pub search_moves: Vec<Move>,
    pub ponder: bool,
    pub infinite: bool,
    /// Count leaf nodes to `depth` instead of searching.
    pub perft: bool,
}

impl SearchConfig {
    pub fn depth(depth: u8) -> SearchConfig {
        SearchConfig { depth: Some(depth), ..SearchConfig::default() }
    }

    pub fn move_time(time: Duration) -> SearchConfig {
        SearchConfig { move_time: Some(time), ..SearchConfig::default() }
    }

    pub fn infinite() -> SearchConfig {
        SearchConfig { infinite: true, ..SearchConfig::default() }
    }

    pub fn perft(depth: u8) -> SearchConfig {
        SearchConfig { depth: Some(depth), perft: true, ..SearchConfig::default() }
    }

    fn clock(&self, side: Color) -> (Option<Duration>, Duration) {
        match side {
            Color::White => (self.white_time, self.white_increment),
            Color::Black => (self.black_time, self.black_increment),
        }
    }
}

/// Held back from every allocation for move transmission.
const OVERHEAD_MS: u64 = 30;
/// Moves budgeted for when the position is a bare endgame.
const ENDGAME_HORIZON: u64 = 12;
/// Moves budgeted for at full opening material.
const OPENING_HORIZON: u64 = 32;
/// Upper bound on an announced `moves_to_go`.
const MAX_HORIZON: u64 = 50;
/// Hard limit as a multiple of the soft one.
const HARD_STRETCH: u64 = 4;
/// The hard limit never exceeds `1 / HARD_SHARE` of the usable clock.
const HARD_SHARE: u64 = 5;

/// Soft and hard limits from the clock.
///
/// The usable clock is split evenly over a horizon of moves: the announced
/// `moves_to_go`, or otherwise a count that shrinks linearly from
/// 32 to 12 as material comes off (`phase` runs from [`MAX_PHASE`] down
/// to 0). Four fifths of the increment is added on top. The hard limit is
/// four times the soft one, capped at a fifth of the clock, and never
/// below the soft limit.
pub fn compute_limits(
    remaining: Duration,
    increment: Duration,
    moves_to_go: Option<u32>,
    phase: i32,
) -> (Duration, Duration) {
    let remaining_ms = remaining.as_millis() as u64;
    if remaining_ms <= OVERHEAD_MS {
        let one_ms = Duration::from_millis(1);
        return (one_ms, one_ms);
    }
    let usable = remaining_ms - OVERHEAD_MS;

    let horizon = match moves_to_go {
        Some(moves) => (moves as u64).clamp(1, MAX_HORIZON),
        None => {
            let material = phase.clamp(0, MAX_PHASE) as u64;
            ENDGAME_HORIZON + (OPENING_HORIZON - ENDGAME_HORIZON) * material / MAX_PHASE as u64
        }
    };

    let increment_ms = increment.as_millis() as u64;
    let soft = (usable / horizon + increment_ms * 4 / 5).clamp(1, usable);
    let hard = (soft * HARD_STRETCH).min(usable / HARD_SHARE).clamp(soft, usable);

    (Duration::from_millis(soft), Duration::from_millis(hard))
}

/// Build the [`SearchControl`] for `config` in `pos`.
///
/// Move time beats the clock; a ponder search gets the same limits with
/// its clock held until the ponder hit; anything without a time source is
/// unlimited.
pub fn control_from_config(config: &SearchConfig, pos: &Position, stopped: Arc<AtomicBool>) -> SearchControl {
    let limits = match (config.move_time, config.clock(pos.side_to_move())) {
        _ if config.infinite || config.perft => None,
        (Some(time), _) => Some((time, time)),
        (None, (Some(remaining), increment)) => {
            Some(compute_limits(remaining, increment, config.moves_to_go, game_phase(pos)))
        }
        (None, (None, _)) => None,
    };

    let control = match (config.ponder, limits) {
        (true, limits) => SearchControl::new_ponder(stopped, limits.map(|l| l.0), limits.map(|l| l.1)),
        (false, Some((soft, hard))) => SearchControl::new_timed(stopped, soft, hard),
        (false, None) => SearchControl::new_unlimited(stopped),
    };
    control.with_infinite(config.infinite).with_node_limit(config.nodes)
}
