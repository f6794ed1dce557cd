//! Root search, recursive alpha-beta and quiescence.

use kestrel_core::movegen::has_legal_move;
use kestrel_core::{Color, Move, MoveGenerator, PieceKind, Position, RootMoveList};

use crate::eval::evaluate;
use crate::eval::phase::{MAX_PHASE, game_phase};
use crate::options::SearchOptions;
use crate::search::control::SearchControl;
use crate::search::heuristics::KillerTable;
use crate::search::pv::PvTable;
use crate::search::tt::{Bound, QSEARCH_DEPTH, TranspositionTable, TtEntry, value_from_tt, value_to_tt};
use crate::search::{INF, MATE_SCORE, MATE_THRESHOLD, MAX_PLY, SearchStats};

/// Everything one search call threads through the recursion. The per-ply
/// arena (`generators`, `killers`, `pv`) is indexed by ply and only the
/// node at that ply touches its row.
pub(super) struct SearchContext<'a> {
    pub tt: &'a mut TranspositionTable,
    pub generators: &'a mut [MoveGenerator],
    pub killers: &'a mut KillerTable,
    pub pv: &'a mut PvTable,
    pub options: &'a SearchOptions,
    pub control: &'a SearchControl,
    pub stats: &'a mut SearchStats,
    pub root_color: Color,
}

impl SearchContext<'_> {
    /// Value of a rule draw for the side to move: the side that started the
    /// search gives up `contempt`, scaled by how much material is left.
    fn draw_value(&self, pos: &Position) -> i32 {
        let contempt = self.options.contempt * game_phase(pos) / MAX_PHASE;
        if pos.side_to_move() == self.root_color { -contempt } else { contempt }
    }

    /// Score of a node the rules end right here. Checkmate outranks the
    /// 50-move rule; a repetition does not need the move list.
    fn rule_outcome(&self, pos: &mut Position, ply: usize) -> Option<i32> {
        if pos.check_repetitions(2) {
            return Some(self.draw_value(pos));
        }
        if pos.check_50_moves() {
            if pos.in_check() && !has_legal_move(pos) {
                return Some(-MATE_SCORE + ply as i32);
            }
            return Some(self.draw_value(pos));
        }
        None
    }

    #[inline]
    fn aborted(&mut self) -> bool {
        self.control.should_stop(self.stats.nodes)
    }

    fn enter(&mut self, ply: usize) {
        self.stats.nodes += 1;
        self.stats.seldepth = self.stats.seldepth.max(ply);
        self.pv.clear_ply(ply);
    }

    fn probe(&mut self, pos: &Position) -> Option<TtEntry> {
        if !self.options.use_table {
            return None;
        }
        let entry = self.tt.get(pos.hash());
        match entry {
            Some(_) => self.stats.tt_hits += 1,
            None => self.stats.tt_misses += 1,
        }
        entry
    }

    #[allow(clippy::too_many_arguments)]
    fn store(&mut self, pos: &Position, ply: usize, value: i32, bound: Bound, depth: i32, mv: Move, mate_threat: bool) {
        if self.options.use_table {
            let depth = depth.clamp(QSEARCH_DEPTH as i32, i8::MAX as i32) as i8;
            self.tt.put(pos.hash(), value_to_tt(value, ply), bound, depth, mv, mate_threat);
        }
    }

    fn prepare_generator(&mut self, ply: usize, preferred: Move) {
        let generator = &mut self.generators[ply];
        generator.reset();
        generator.set_ordering(self.options.ordering);
        generator.set_killers(self.killers.row(ply));
        generator.set_preferred(preferred);
    }
}

/// Table value usable at this node, if the stored bound settles it.
/// Exact hits always do; bounds only outside PV nodes.
fn table_cutoff(value: i32, bound: Bound, alpha: i32, beta: i32, is_pv: bool) -> Option<i32> {
    match bound {
        Bound::Exact => Some(value),
        Bound::Lower if !is_pv && value >= beta => Some(value),
        Bound::Upper if !is_pv && value <= alpha => Some(value),
        _ => None,
    }
}

fn is_minor_promotion(mv: Move) -> bool {
    mv.promotion().is_some_and(|p| matches!(p.kind(), PieceKind::Rook | PieceKind::Bishop))
}

/// Search every root move at `depth` inside `(alpha, beta)`.
///
/// Moves are taken in list order and each one's value is written back
/// into `root_moves`. A fail high returns at once with a lower bound
/// stored; otherwise the best value is returned and row 0 of the PV table
/// holds the line.
pub(super) fn search_root(
    pos: &mut Position,
    root_moves: &mut RootMoveList,
    depth: i32,
    mut alpha: i32,
    beta: i32,
    ctx: &mut SearchContext<'_>,
) -> i32 {
    ctx.enter(0);
    let original_alpha = alpha;
    let mut best_value = -INF;
    let mut best_move = Move::NULL;

    for index in 0..root_moves.len() {
        let mv = root_moves[index].mv;
        pos.make_move(mv);
        let mut value = alpha + 1;
        if index > 0 && ctx.options.pvs {
            value = -negamax(pos, depth - 1, 1, -alpha - 1, -alpha, false, true, ctx);
        }
        if value > alpha && !ctx.control.is_stopped() {
            value = -negamax(pos, depth - 1, 1, -beta, -alpha, true, true, ctx);
        }
        pos.undo_move();

        if ctx.control.is_stopped() {
            return best_value;
        }
        if let Some(entry) = root_moves.get_mut(index) {
            entry.value = value;
        }
        if value > best_value {
            best_value = value;
        }
        if value > alpha {
            best_move = mv;
            if value >= beta {
                ctx.stats.beta_cutoffs += 1;
                ctx.pv.set_single(0, mv);
                ctx.store(pos, 0, value, Bound::Lower, depth, mv, false);
                return value;
            }
            alpha = value;
            ctx.pv.update(0, mv);
        }
    }

    let bound = if alpha > original_alpha { Bound::Exact } else { Bound::Upper };
    ctx.store(pos, 0, best_value, bound, depth, best_move, false);
    best_value
}

/// Alpha-beta below the root.
///
/// Returns a fail-soft value from the side to move's view. The value is
/// meaningless once the control reports a stop; callers check it.
#[allow(clippy::too_many_arguments)]
pub(super) fn negamax(
    pos: &mut Position,
    depth: i32,
    ply: usize,
    mut alpha: i32,
    mut beta: i32,
    is_pv: bool,
    allow_null: bool,
    ctx: &mut SearchContext<'_>,
) -> i32 {
    if depth <= 0 || ply >= MAX_PLY {
        return qsearch(pos, ply, alpha, beta, is_pv, ctx);
    }
    ctx.enter(ply);

    if let Some(value) = ctx.rule_outcome(pos, ply) {
        return value;
    }
    if ctx.aborted() {
        return 0;
    }

    if ctx.options.mate_distance_pruning {
        alpha = alpha.max(-MATE_SCORE + ply as i32);
        beta = beta.min(MATE_SCORE - ply as i32 - 1);
        if alpha >= beta {
            return alpha;
        }
    }

    let mut tt_move = Move::NULL;
    let mut mate_threat = false;
    if let Some(entry) = ctx.probe(pos) {
        tt_move = entry.best_move;
        mate_threat = entry.mate_threat;
        if entry.depth as i32 >= depth {
            if let Some(value) = table_cutoff(value_from_tt(entry.value, ply), entry.bound, alpha, beta, is_pv) {
                ctx.stats.tt_cutoffs += 1;
                if !tt_move.is_null() {
                    ctx.pv.set_single(ply, tt_move);
                }
                return value;
            }
        }
    }

    let in_check = pos.in_check();
    let static_eval = if in_check { -INF } else { evaluate(pos) };
    let us = pos.side_to_move();

    if !in_check && !is_pv {
        let options = ctx.options;

        if options.static_null_move
            && depth <= options.static_null_move_depth
            && beta.abs() < MATE_THRESHOLD
            && static_eval - options.static_null_move_margin * depth >= beta
        {
            ctx.stats.static_null_prunes += 1;
            return static_eval - options.static_null_move_margin * depth;
        }

        if options.null_move
            && allow_null
            && depth >= options.null_move_depth
            && static_eval >= beta
            && pos.has_non_pawn_material(us)
        {
            let reduced = depth - 1 - options.null_move_reduction;
            pos.make_null_move();
            let value = -negamax(pos, reduced, ply + 1, -beta, -beta + 1, false, false, ctx);
            pos.undo_null_move();
            if ctx.control.is_stopped() {
                return 0;
            }
            if value >= beta {
                let value = if value >= MATE_THRESHOLD { beta } else { value };
                let verified = !options.null_move_verification
                    || depth <= options.null_move_verification_depth
                    || negamax(pos, reduced, ply, beta - 1, beta, false, false, ctx) >= beta;
                if ctx.control.is_stopped() {
                    return 0;
                }
                if verified {
                    ctx.stats.null_move_prunes += 1;
                    return value;
                }
            } else if value <= -MATE_THRESHOLD {
                mate_threat = true;
            }
        }

        if options.razoring
            && depth <= options.razoring_depth
            && static_eval + options.razoring_margin * depth <= alpha
        {
            let value = qsearch(pos, ply, alpha, alpha + 1, false, ctx);
            if value <= alpha {
                ctx.stats.razor_prunes += 1;
                return value;
            }
        }
    }

    ctx.prepare_generator(ply, tt_move);
    let original_alpha = alpha;
    let mut best_value = -INF;
    let mut best_move = Move::NULL;
    let mut legal = 0usize;

    while let Some(mv) = ctx.generators[ply].next_pseudo_legal_move(pos, false) {
        if ctx.options.minor_promotion_pruning && is_minor_promotion(mv) {
            continue;
        }
        let killer = ctx.generators[ply].is_killer(mv);

        pos.make_move(mv);
        if pos.opponent_in_check() {
            pos.undo_move();
            continue;
        }
        legal += 1;

        let reduction = if ctx.options.lmr
            && depth >= ctx.options.lmr_min_depth
            && legal >= ctx.options.lmr_min_move
            && !in_check
            && !mate_threat
            && mv.captured().is_none()
            && !mv.is_promotion()
            && !killer
            && !pos.in_check()
            && alpha.abs() < MATE_THRESHOLD
        {
            ctx.options.lmr_reduction
        } else {
            0
        };

        let mut value = alpha + 1;
        if reduction > 0 {
            value = -negamax(pos, depth - 1 - reduction, ply + 1, -alpha - 1, -alpha, false, true, ctx);
            if value > alpha {
                ctx.stats.lmr_researches += 1;
            }
        }
        if value > alpha && legal > 1 && ctx.options.pvs && !ctx.control.is_stopped() {
            value = -negamax(pos, depth - 1, ply + 1, -alpha - 1, -alpha, false, true, ctx);
            if value > alpha && value < beta && !ctx.control.is_stopped() {
                value = -negamax(pos, depth - 1, ply + 1, -beta, -alpha, is_pv, true, ctx);
            }
        } else if value > alpha && !ctx.control.is_stopped() {
            value = -negamax(pos, depth - 1, ply + 1, -beta, -alpha, is_pv, true, ctx);
        }
        pos.undo_move();

        if ctx.control.is_stopped() {
            return 0;
        }
        if value > best_value {
            best_value = value;
        }
        if value > alpha {
            best_move = mv;
            if value >= beta {
                ctx.stats.beta_cutoffs += 1;
                if mv.captured().is_none() {
                    ctx.killers.store(ply, mv);
                }
                ctx.store(pos, ply, value, Bound::Lower, depth, mv, mate_threat);
                return value;
            }
            alpha = value;
            ctx.pv.update(ply, mv);
        }
    }

    if legal == 0 {
        return if in_check { -MATE_SCORE + ply as i32 } else { 0 };
    }

    let bound = if alpha > original_alpha { Bound::Exact } else { Bound::Upper };
    ctx.store(pos, ply, best_value, bound, depth, best_move, mate_threat);
    best_value
}

/// Captures-only search past the horizon; every move when in check.
pub(super) fn qsearch(
    pos: &mut Position,
    ply: usize,
    mut alpha: i32,
    mut beta: i32,
    is_pv: bool,
    ctx: &mut SearchContext<'_>,
) -> i32 {
    ctx.enter(ply);
    ctx.stats.qnodes += 1;

    if ply >= MAX_PLY {
        return evaluate(pos);
    }
    if let Some(value) = ctx.rule_outcome(pos, ply) {
        return value;
    }
    if ctx.aborted() {
        return 0;
    }
    if !ctx.options.quiescence {
        return evaluate(pos);
    }

    if ctx.options.mate_distance_pruning {
        alpha = alpha.max(-MATE_SCORE + ply as i32);
        beta = beta.min(MATE_SCORE - ply as i32 - 1);
        if alpha >= beta {
            return alpha;
        }
    }

    let mut tt_move = Move::NULL;
    if let Some(entry) = ctx.probe(pos) {
        tt_move = entry.best_move;
        if let Some(value) = table_cutoff(value_from_tt(entry.value, ply), entry.bound, alpha, beta, is_pv) {
            ctx.stats.tt_cutoffs += 1;
            return value;
        }
    }

    let in_check = pos.in_check();
    let mut best_value = -INF;
    if !in_check {
        let stand_pat = evaluate(pos);
        if stand_pat >= beta {
            return stand_pat;
        }
        alpha = alpha.max(stand_pat);
        best_value = stand_pat;
    }

    ctx.prepare_generator(ply, tt_move);
    let original_alpha = alpha;
    let mut best_move = Move::NULL;
    let mut legal = 0usize;

    while let Some(mv) = ctx.generators[ply].next_qsearch_move(pos) {
        if !in_check && ctx.options.qsearch_see_pruning && pos.see(mv) < 0 {
            continue;
        }
        pos.make_move(mv);
        if pos.opponent_in_check() {
            pos.undo_move();
            continue;
        }
        legal += 1;
        let value = -qsearch(pos, ply + 1, -beta, -alpha, is_pv, ctx);
        pos.undo_move();

        if ctx.control.is_stopped() {
            return 0;
        }
        if value > best_value {
            best_value = value;
        }
        if value > alpha {
            best_move = mv;
            if value >= beta {
                ctx.stats.beta_cutoffs += 1;
                ctx.store(pos, ply, value, Bound::Lower, QSEARCH_DEPTH as i32, mv, false);
                return value;
            }
            alpha = value;
            ctx.pv.update(ply, mv);
        }
    }

    if in_check && legal == 0 {
        return -MATE_SCORE + ply as i32;
    }

    let bound = if alpha > original_alpha { Bound::Exact } else { Bound::Upper };
    ctx.store(pos, ply, best_value, bound, QSEARCH_DEPTH as i32, best_move, false);
    best_value
}
