//! Search tunables.

use kestrel_core::movegen::Ordering;

/// Switches and parameters for every search heuristic, each toggleable on
/// its own. [`SearchOptions::plain`] turns them all off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    /// Resolve captures past the horizon instead of evaluating directly.
    pub quiescence: bool,
    /// Skip losing captures (negative SEE) in quiescence when not in check.
    pub qsearch_see_pruning: bool,

    pub use_table: bool,
    pub hash_mb: usize,

    /// Principal variation search: null window after the first move.
    pub pvs: bool,

    pub null_move: bool,
    /// Minimum remaining depth for a null move.
    pub null_move_depth: i32,
    pub null_move_reduction: i32,
    /// Re-search a null-move cutoff without the null move before trusting it.
    pub null_move_verification: bool,
    /// Verification only runs above this depth.
    pub null_move_verification_depth: i32,

    /// Reverse futility: cut when the static eval clears beta by
    /// `static_null_move_margin` per ply of remaining depth.
    pub static_null_move: bool,
    pub static_null_move_depth: i32,
    pub static_null_move_margin: i32,

    pub razoring: bool,
    pub razoring_depth: i32,
    pub razoring_margin: i32,

    /// Late move reductions for quiet moves ordered late.
    pub lmr: bool,
    pub lmr_min_depth: i32,
    /// Moves before this number (1-based) are never reduced.
    pub lmr_min_move: usize,
    pub lmr_reduction: i32,

    pub aspiration: bool,
    pub aspiration_depth: u8,
    /// Half-width of the first window; later ones scale it by
    /// [`crate::search::ASPIRATION_WIDENING`].
    pub aspiration_window: i32,

    /// Killer slots per ply, up to [`kestrel_core::movegen::MAX_KILLERS`].
    pub killers: usize,

    pub mate_distance_pruning: bool,
    /// Never search rook or bishop promotions.
    pub minor_promotion_pruning: bool,

    pub ordering: Ordering,

    /// Centipawns a draw by repetition or the fifty-move rule costs the
    /// side that started the search, at full material. Scaled down with
    /// the game phase.
    pub contempt: i32,
}

impl SearchOptions {
    /// Every pruning, reduction and ordering aid off: plain alpha-beta
    /// over every move, evaluating at the horizon.
    pub fn plain() -> SearchOptions {
        SearchOptions {
            quiescence: false,
            qsearch_see_pruning: false,
            use_table: false,
            pvs: false,
            null_move: false,
            null_move_verification: false,
            static_null_move: false,
            razoring: false,
            lmr: false,
            aspiration: false,
            killers: 0,
            mate_distance_pruning: false,
            minor_promotion_pruning: false,
            ordering: Ordering::Generation,
            contempt: 0,
            ..SearchOptions::default()
        }
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions {
            quiescence: true,
            qsearch_see_pruning: true,
            use_table: true,
            hash_mb: 16,
            pvs: true,
            null_move: true,
            null_move_depth: 3,
            null_move_reduction: 2,
            null_move_verification: true,
            null_move_verification_depth: 6,
            static_null_move: true,
            static_null_move_depth: 3,
            static_null_move_margin: 120,
            razoring: true,
            razoring_depth: 2,
            razoring_margin: 300,
            lmr: true,
            lmr_min_depth: 3,
            lmr_min_move: 4,
            lmr_reduction: 1,
            aspiration: true,
            aspiration_depth: 4,
            aspiration_window: 50,
            killers: 2,
            mate_distance_pruning: true,
            minor_promotion_pruning: true,
            ordering: Ordering::Heuristic,
            contempt: 10,
        }
    }
}
