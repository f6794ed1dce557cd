//! Iterative-deepening alpha-beta search.

pub mod control;
pub mod heuristics;
mod negamax;
pub mod pv;
pub mod tt;

use std::fmt;
use std::time::Duration;

use kestrel_core::movegen::legal_moves;
use kestrel_core::{Move, MoveGenerator, Position, RootMoveList};
use tracing::debug;

use crate::options::SearchOptions;
use crate::time::SearchConfig;
use control::SearchControl;
use heuristics::KillerTable;
use negamax::{SearchContext, search_root};
use pv::PvTable;
use tt::{Bound, TranspositionTable};

/// Larger than any reachable score.
pub const INF: i32 = 30_000;
/// Score of delivering mate at the root; mate at ply `n` scores `MATE_SCORE - n`.
pub const MATE_SCORE: i32 = 29_000;
/// Scores at or beyond this magnitude are mate scores.
pub const MATE_THRESHOLD: i32 = 28_000;
/// Deepest ply the per-ply arena supports.
pub const MAX_PLY: usize = 128;
/// Aspiration half-widths tried before the full window, as multiples of
/// [`SearchOptions::aspiration_window`].
pub const ASPIRATION_WIDENING: [i32; 2] = [1, 4];

/// Where a search call currently is. Traced at debug level on every change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Idle,
    Initializing,
    IterativeDeepening,
    /// Finished, holding the result until stopped or a ponder hit.
    PonderWait,
    Reporting,
}

/// A search value in the form a user sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreReport {
    Centipawns(i32),
    /// Full moves to mate; negative when the side to move gets mated.
    Mate(i32),
}

impl ScoreReport {
    pub fn from_value(value: i32) -> ScoreReport {
        if value >= MATE_THRESHOLD {
            ScoreReport::Mate((MATE_SCORE - value + 1) / 2)
        } else if value <= -MATE_THRESHOLD {
            ScoreReport::Mate(-(MATE_SCORE + value) / 2)
        } else {
            ScoreReport::Centipawns(value)
        }
    }
}

impl fmt::Display for ScoreReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreReport::Centipawns(cp) => write!(f, "cp {cp}"),
            ScoreReport::Mate(moves) => write!(f, "mate {moves}"),
        }
    }
}

/// Counters for one search call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub qnodes: u64,
    pub seldepth: usize,
    pub tt_hits: u64,
    pub tt_misses: u64,
    pub tt_cutoffs: u64,
    pub beta_cutoffs: u64,
    pub null_move_prunes: u64,
    pub static_null_prunes: u64,
    pub razor_prunes: u64,
    pub lmr_researches: u64,
    pub aspiration_researches: u64,
}

/// Progress after a completed iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchInfo {
    pub depth: u8,
    pub seldepth: usize,
    pub score: ScoreReport,
    pub nodes: u64,
    pub nps: u64,
    pub elapsed: Duration,
    pub pv: Vec<Move>,
    /// Table fill in per mille.
    pub hashfull: u32,
}

/// Outcome of a search call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// [`Move::NULL`] when the root has no legal move, and in perft mode.
    pub best_move: Move,
    /// Expected reply, for pondering.
    pub ponder_move: Option<Move>,
    pub pv: Vec<Move>,
    /// Side-to-move view, in centipawns or as a mate score.
    pub score: i32,
    pub depth: u8,
    pub seldepth: usize,
    pub stats: SearchStats,
    /// Leaf count of a perft-mode call.
    pub perft: Option<u64>,
}

impl SearchResult {
    fn empty(score: i32, stats: SearchStats) -> SearchResult {
        SearchResult {
            best_move: Move::NULL,
            ponder_move: None,
            pv: Vec::new(),
            score,
            depth: 0,
            seldepth: 0,
            stats,
            perft: None,
        }
    }
}

/// Owns everything a search needs between calls: the table, the tunables
/// and the per-ply arena.
pub struct Searcher {
    tt: TranspositionTable,
    options: SearchOptions,
    generators: Vec<MoveGenerator>,
    killers: KillerTable,
    pv: PvTable,
    stats: SearchStats,
    phase: SearchPhase,
}

impl Searcher {
    pub fn new(options: SearchOptions) -> Searcher {
        Searcher {
            tt: TranspositionTable::new(options.hash_mb),
            generators: (0..=MAX_PLY).map(|_| MoveGenerator::new(options.ordering)).collect(),
            killers: KillerTable::new(options.killers),
            pv: PvTable::new(),
            stats: SearchStats::default(),
            phase: SearchPhase::Idle,
            options,
        }
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Replace the tunables, resizing the table if its size changed.
    pub fn set_options(&mut self, options: SearchOptions) {
        if options.hash_mb != self.options.hash_mb {
            self.tt.resize(options.hash_mb);
        }
        self.killers.set_count(options.killers);
        for generator in &mut self.generators {
            generator.set_ordering(options.ordering);
        }
        self.options = options;
    }

    pub fn tt(&self) -> &TranspositionTable {
        &self.tt
    }

    /// Resize the table; returns the size actually allocated in MB.
    pub fn resize_hash(&mut self, megabytes: usize) -> usize {
        self.tt.resize(megabytes);
        self.options.hash_mb = megabytes;
        self.tt.megabytes()
    }

    pub fn clear_tt(&mut self) {
        self.tt.clear();
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    fn set_phase(&mut self, phase: SearchPhase) {
        debug!(from = ?self.phase, to = ?phase, "search phase");
        self.phase = phase;
    }

    /// Reset the per-ply arena and age the table before a new search.
    pub fn prepare(&mut self) {
        self.set_phase(SearchPhase::Initializing);
        for generator in &mut self.generators {
            generator.reset();
        }
        self.killers.clear();
        self.pv = PvTable::new();
        self.stats = SearchStats::default();
        self.tt.age_entries();
    }

    /// [`prepare`](Self::prepare) then [`run`](Self::run).
    pub fn search<F>(&mut self, pos: &mut Position, config: &SearchConfig, control: &SearchControl, on_info: F) -> SearchResult
    where
        F: FnMut(&SearchInfo),
    {
        self.prepare();
        self.run(pos, config, control, on_info)
    }

    /// Search `pos` under `config` until a limit in `control` trips.
    ///
    /// Calls `on_info` after every completed iteration. The returned move
    /// comes from the last completed iteration; if none completed it is the
    /// first legal move.
    pub fn run<F>(&mut self, pos: &mut Position, config: &SearchConfig, control: &SearchControl, mut on_info: F) -> SearchResult
    where
        F: FnMut(&SearchInfo),
    {
        self.set_phase(SearchPhase::IterativeDeepening);
        let result = if config.perft {
            self.run_perft(pos, config)
        } else {
            self.iterate(pos, config, control, &mut on_info)
        };

        if control.must_wait() {
            self.set_phase(SearchPhase::PonderWait);
            while control.must_wait() {
                std::thread::sleep(Duration::from_millis(1));
            }
        }

        self.set_phase(SearchPhase::Reporting);
        debug!(
            best = %result.best_move,
            score = result.score,
            depth = result.depth,
            nodes = result.stats.nodes,
            "search finished"
        );
        self.set_phase(SearchPhase::Idle);
        result
    }

    fn run_perft(&mut self, pos: &mut Position, config: &SearchConfig) -> SearchResult {
        let depth = config.depth.unwrap_or(1);
        let count = kestrel_core::perft::perft(pos, depth as usize);
        self.stats.nodes = count;
        SearchResult { depth, perft: Some(count), ..SearchResult::empty(0, self.stats) }
    }

    fn info(&self, depth: u8, value: i32, pv: &[Move], control: &SearchControl) -> SearchInfo {
        let elapsed = control.wall_time();
        let millis = elapsed.as_millis().max(1) as u64;
        SearchInfo {
            depth,
            seldepth: self.stats.seldepth,
            score: ScoreReport::from_value(value),
            nodes: self.stats.nodes,
            nps: self.stats.nodes * 1000 / millis,
            elapsed,
            pv: pv.to_vec(),
            hashfull: self.tt.hashfull(),
        }
    }

    fn iterate(
        &mut self,
        pos: &mut Position,
        config: &SearchConfig,
        control: &SearchControl,
        on_info: &mut dyn FnMut(&SearchInfo),
    ) -> SearchResult {
        let mut root_moves = RootMoveList::new(legal_moves(pos).iter().copied(), -INF);
        if !config.search_moves.is_empty() {
            root_moves.retain(|mv| config.search_moves.contains(&mv));
        }
        let Some(first) = root_moves.first().map(|root| root.mv) else {
            let score = if pos.in_check() { -MATE_SCORE } else { 0 };
            return SearchResult::empty(score, self.stats);
        };

        let max_depth = config.depth.unwrap_or(MAX_PLY as u8 - 1).clamp(1, MAX_PLY as u8 - 1);
        let mut best = SearchResult { best_move: first, pv: vec![first], ..SearchResult::empty(0, self.stats) };
        let mut completed = false;
        let mut start_depth = 1u8;

        if self.options.use_table
            && let Some(entry) = self.tt.get(pos.hash())
            && entry.bound == Bound::Exact
            && entry.depth >= 1
            && root_moves.promote_to_front(entry.best_move)
        {
            let depth = entry.depth as u8;
            best.best_move = entry.best_move;
            best.pv = vec![entry.best_move];
            best.score = entry.value;
            best.depth = depth;
            completed = true;
            start_depth = depth.saturating_add(1);
            on_info(&self.info(depth, entry.value, &best.pv, control));
        }

        for depth in start_depth..=max_depth {
            if completed && control.should_stop_iterating() {
                break;
            }

            let value = self.aspiration(pos, &mut root_moves, depth as i32, best.score, control);
            if control.is_stopped() {
                break;
            }

            let line: Vec<Move> = self.pv.root().to_vec();
            let best_move = line.first().copied().unwrap_or(root_moves[0].mv);
            root_moves.sort();
            root_moves.promote_to_front(best_move);

            best.best_move = best_move;
            best.pv = if line.is_empty() { vec![best_move] } else { line };
            best.score = value;
            best.depth = depth;
            completed = true;

            debug!(depth, value, nodes = self.stats.nodes, pv_len = best.pv.len(), "iteration complete");
            on_info(&self.info(depth, value, &best.pv, control));

            if value.abs() >= MATE_THRESHOLD {
                let plies = MATE_SCORE - value.abs();
                if plies <= depth as i32 {
                    break;
                }
            }
            if let (Some(target), ScoreReport::Mate(moves)) = (config.mate, ScoreReport::from_value(value))
                && moves > 0
                && moves as u32 <= target
            {
                break;
            }
        }

        best.ponder_move = match best.pv.get(1) {
            Some(&reply) => Some(reply),
            None => self.ponder_from_table(pos, best.best_move),
        };
        best.seldepth = self.stats.seldepth;
        best.stats = self.stats;
        best
    }

    /// Expected reply from the table entry after `best_move`, if it is legal.
    fn ponder_from_table(&mut self, pos: &mut Position, best_move: Move) -> Option<Move> {
        if !self.options.use_table || best_move.is_null() {
            return None;
        }
        pos.make_move(best_move);
        let reply = self
            .tt
            .get(pos.hash())
            .map(|entry| entry.best_move)
            .filter(|&mv| !mv.is_null() && legal_moves(pos).contains(mv));
        pos.undo_move();
        reply
    }

    /// One iteration at `depth`, inside aspiration windows around `previous`
    /// when they apply, widened per [`ASPIRATION_WIDENING`] and then opened
    /// to the full window.
    fn aspiration(
        &mut self,
        pos: &mut Position,
        root_moves: &mut RootMoveList,
        depth: i32,
        previous: i32,
        control: &SearchControl,
    ) -> i32 {
        let options = self.options.clone();
        let root_color = pos.side_to_move();
        let mut ctx = SearchContext {
            tt: &mut self.tt,
            generators: &mut self.generators,
            killers: &mut self.killers,
            pv: &mut self.pv,
            options: &options,
            control,
            stats: &mut self.stats,
            root_color,
        };

        let narrow = options.aspiration
            && depth >= options.aspiration_depth as i32
            && previous.abs() < MATE_THRESHOLD;
        if narrow {
            for factor in ASPIRATION_WIDENING {
                let width = options.aspiration_window * factor;
                let (alpha, beta) = (previous - width, previous + width);
                let value = search_root(pos, root_moves, depth, alpha, beta, &mut ctx);
                if control.is_stopped() || (value > alpha && value < beta) {
                    return value;
                }
                ctx.stats.aspiration_researches += 1;
            }
        }
        search_root(pos, root_moves, depth, -INF, INF, &mut ctx)
    }
}

impl fmt::Debug for Searcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Searcher")
            .field("tt", &self.tt)
            .field("options", &self.options)
            .field("phase", &self.phase)
            .finish()
    }
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new(SearchOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::AtomicBool;

    use kestrel_core::Position;

    use super::*;

    fn unlimited() -> SearchControl {
        SearchControl::new_unlimited(Arc::new(AtomicBool::new(false)))
    }

    fn search_depth(pos: &str, depth: u8) -> SearchResult {
        let mut pos: Position = pos.parse().unwrap();
        let mut searcher = Searcher::new(SearchOptions { hash_mb: 1, ..SearchOptions::default() });
        searcher.search(&mut pos, &SearchConfig::depth(depth), &unlimited(), |_| {})
    }

    #[test]
    fn score_report_conversion() {
        assert_eq!(ScoreReport::from_value(35), ScoreReport::Centipawns(35));
        assert_eq!(ScoreReport::from_value(MATE_SCORE - 1), ScoreReport::Mate(1));
        assert_eq!(ScoreReport::from_value(MATE_SCORE - 3), ScoreReport::Mate(2));
        assert_eq!(ScoreReport::from_value(-MATE_SCORE + 2), ScoreReport::Mate(-1));
        assert_eq!(ScoreReport::Mate(-3).to_string(), "mate -3");
        assert_eq!(ScoreReport::Centipawns(-12).to_string(), "cp -12");
    }

    #[test]
    fn depth_one_returns_a_legal_move() {
        let result = search_depth(kestrel_core::STARTING_FEN, 1);
        let mut pos = Position::starting();
        assert!(legal_moves(&mut pos).contains(result.best_move));
        assert_eq!(result.depth, 1);
        assert_eq!(result.pv[0], result.best_move);
    }

    #[test]
    fn every_iteration_is_reported() {
        let mut pos = Position::starting();
        let mut searcher = Searcher::new(SearchOptions { hash_mb: 1, ..SearchOptions::default() });
        let mut depths = Vec::new();
        searcher.search(&mut pos, &SearchConfig::depth(4), &unlimited(), |info| {
            assert!(!info.pv.is_empty() && !info.pv[0].is_null());
            depths.push(info.depth);
        });
        assert_eq!(depths, vec![1, 2, 3, 4]);
    }

    #[test]
    fn position_is_restored() {
        let mut pos = Position::starting();
        let hash = pos.hash();
        let mut searcher = Searcher::new(SearchOptions { hash_mb: 1, ..SearchOptions::default() });
        searcher.search(&mut pos, &SearchConfig::depth(4), &unlimited(), |_| {});
        assert_eq!(pos.hash(), hash);
        assert_eq!(pos.to_string(), kestrel_core::STARTING_FEN);
    }

    #[test]
    fn stalemate_has_no_move_and_scores_zero() {
        let result = search_depth("k7/2K5/1Q6/8/8/8/8/8 b - - 0 1", 3);
        assert!(result.best_move.is_null());
        assert_eq!(result.score, 0);
    }

    #[test]
    fn checkmated_root_scores_mate() {
        let result = search_depth("7k/6Q1/5K2/8/8/8/8/8 b - - 0 1", 3);
        assert!(result.best_move.is_null());
        assert_eq!(result.score, -MATE_SCORE);
    }

    #[test]
    fn pv_and_ponder_move_at_depth_four() {
        let result = search_depth(kestrel_core::STARTING_FEN, 4);
        assert!(result.pv.len() >= 2, "pv {:?}", result.pv);
        assert_eq!(result.ponder_move, Some(result.pv[1]));
    }

    #[test]
    fn search_moves_restrict_the_root() {
        let mut pos = Position::starting();
        let only = kestrel_core::movegen::parse_move(&mut pos, "a2a3").unwrap();
        let config = SearchConfig { depth: Some(3), search_moves: vec![only], ..SearchConfig::default() };
        let mut searcher = Searcher::new(SearchOptions { hash_mb: 1, ..SearchOptions::default() });
        let result = searcher.search(&mut pos, &config, &unlimited(), |_| {});
        assert_eq!(result.best_move, only);
    }

    #[test]
    fn perft_mode_counts_leaves() {
        let mut pos = Position::starting();
        let mut searcher = Searcher::new(SearchOptions { hash_mb: 1, ..SearchOptions::default() });
        let result = searcher.search(&mut pos, &SearchConfig::perft(3), &unlimited(), |_| panic!("no info in perft"));
        assert_eq!(result.perft, Some(8_902));
        assert!(result.best_move.is_null());
    }

    #[test]
    fn stopped_before_start_still_returns_a_move() {
        let mut pos = Position::starting();
        let control = unlimited();
        control.stop();
        let mut searcher = Searcher::new(SearchOptions { hash_mb: 1, ..SearchOptions::default() });
        let result = searcher.search(&mut pos, &SearchConfig::depth(10), &control, |_| {});
        assert!(!result.best_move.is_null());
        assert_eq!(result.depth, 0);
    }

    #[test]
    fn node_limit_ends_the_search() {
        let mut pos = Position::starting();
        let control = unlimited().with_node_limit(Some(5_000));
        let mut searcher = Searcher::new(SearchOptions { hash_mb: 1, ..SearchOptions::default() });
        let result = searcher.search(&mut pos, &SearchConfig::default(), &control, |_| {});
        assert!(!result.best_move.is_null());
        assert!(result.stats.nodes < 5_000 + 2 * control::CHECK_INTERVAL);
    }

    #[test]
    fn fifty_move_rule_does_not_hide_a_mate() {
        // Ra8 mates on the move that brings the clock to 100.
        let result = search_depth("6k1/5ppp/8/8/8/8/8/R5K1 w - - 99 80", 2);
        assert_eq!(result.best_move.to_string(), "a1a8");
        assert_eq!(result.score, MATE_SCORE - 1);
    }

    #[test]
    fn second_search_reuses_the_table() {
        let mut pos = Position::starting();
        let mut searcher = Searcher::new(SearchOptions { hash_mb: 1, ..SearchOptions::default() });
        let first = searcher.search(&mut pos, &SearchConfig::depth(4), &unlimited(), |_| {});
        let mut depths = Vec::new();
        let second = searcher.search(&mut pos, &SearchConfig::depth(5), &unlimited(), |info| depths.push(info.depth));
        assert_eq!(depths.first(), Some(&4));
        assert_eq!(depths.last(), Some(&5));
        assert!(!second.best_move.is_null());
        assert!(second.stats.nodes > 0 && first.depth == 4);
    }
}
