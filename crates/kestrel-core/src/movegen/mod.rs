//! Move generation and ordering.
//!
//! Generation is pseudo-legal: moves that leave the mover's king attacked
//! are produced and rejected afterwards with a trial make/undo. The
//! [`MoveGenerator`] hands moves out lazily in two stages, captures first,
//! so a search that cuts off early never generates or scores the quiets.

mod list;
mod pseudo;

pub use self::list::{MAX_MOVES, MoveList, RootMove, RootMoveList};

use crate::chess_move::Move;
use crate::error::MoveError;
use crate::piece_kind::PieceKind;
use crate::piece_square;
use crate::position::Position;
use crate::square::Square;

use self::pseudo::{generate_captures, generate_quiets};

/// Killer slots a generator can hold per ply.
pub const MAX_KILLERS: usize = 4;

/// How much more a captured piece must be worth than its captor for the
/// capture to count as good in quiescence.
pub const GOOD_CAPTURE_MARGIN: i32 = 100;

const PREFERRED_SCORE: i32 = i32::MAX;
const KILLER_SCORE: i32 = 1_000_000;
const PROMOTION_SCORE: i32 = 500_000;
const CASTLE_SCORE: i32 = 400_000;

/// How the staged generator orders moves inside a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ordering {
    /// Captures by victim minus attacker value; quiets by killer,
    /// promotion, castle, then piece-square gain.
    #[default]
    Heuristic,
    /// Generation order, nothing scored.
    Generation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    GenerateCaptures,
    Captures,
    GenerateQuiets,
    Quiets,
    Done,
}

/// Staged, ordered pseudo-legal move source for one node.
///
/// A search keeps one generator per ply and calls [`MoveGenerator::reset`]
/// on entering a node, then optionally installs the killers and the
/// preferred (table or PV) move before pulling moves.
#[derive(Clone)]
pub struct MoveGenerator {
    ordering: Ordering,
    stage: Stage,
    moves: MoveList,
    scores: [i32; MAX_MOVES],
    next: usize,
    killers: [Move; MAX_KILLERS],
    preferred: Move,
}

impl MoveGenerator {
    pub fn new(ordering: Ordering) -> MoveGenerator {
        MoveGenerator {
            ordering,
            stage: Stage::GenerateCaptures,
            moves: MoveList::new(),
            scores: [0; MAX_MOVES],
            next: 0,
            killers: [Move::NULL; MAX_KILLERS],
            preferred: Move::NULL,
        }
    }

    #[inline]
    pub fn ordering(&self) -> Ordering {
        self.ordering
    }

    pub fn set_ordering(&mut self, ordering: Ordering) {
        self.ordering = ordering;
    }

    /// Forget everything about the previous node.
    pub fn reset(&mut self) {
        self.stage = Stage::GenerateCaptures;
        self.moves.clear();
        self.next = 0;
        self.killers = [Move::NULL; MAX_KILLERS];
        self.preferred = Move::NULL;
    }

    /// Install up to [`MAX_KILLERS`] killer moves, most recent first.
    pub fn set_killers(&mut self, killers: &[Move]) {
        self.killers = [Move::NULL; MAX_KILLERS];
        for (slot, &mv) in self.killers.iter_mut().zip(killers) {
            *slot = mv;
        }
    }

    /// Move searched first within its stage, if generated at all.
    pub fn set_preferred(&mut self, mv: Move) {
        self.preferred = mv;
    }

    #[inline]
    pub fn is_killer(&self, mv: Move) -> bool {
        !mv.is_null() && self.killers.contains(&mv)
    }

    /// Next pseudo-legal move in staged order, or `None` when exhausted.
    /// With `capturing_only` the quiet stage is skipped.
    pub fn next_pseudo_legal_move(&mut self, pos: &Position, capturing_only: bool) -> Option<Move> {
        loop {
            match self.stage {
                Stage::GenerateCaptures => {
                    self.fill(pos, generate_captures);
                    self.stage = Stage::Captures;
                }
                Stage::Captures => {
                    if let Some(mv) = self.pick() {
                        return Some(mv);
                    }
                    self.stage = if capturing_only { Stage::Done } else { Stage::GenerateQuiets };
                }
                Stage::GenerateQuiets => {
                    self.fill(pos, generate_quiets);
                    self.stage = Stage::Quiets;
                }
                Stage::Quiets => {
                    if let Some(mv) = self.pick() {
                        return Some(mv);
                    }
                    self.stage = Stage::Done;
                }
                Stage::Done => return None,
            }
        }
    }

    /// Quiescence mode: every move when in check, otherwise only good captures.
    pub fn next_qsearch_move(&mut self, pos: &Position) -> Option<Move> {
        if pos.in_check() {
            return self.next_pseudo_legal_move(pos, false);
        }
        while let Some(mv) = self.next_pseudo_legal_move(pos, true) {
            if is_good_capture(pos, mv) {
                return Some(mv);
            }
        }
        None
    }

    fn fill(&mut self, pos: &Position, generate: fn(&Position, &mut MoveList)) {
        self.moves.clear();
        self.next = 0;
        generate(pos, &mut self.moves);
        if self.ordering == Ordering::Generation {
            return;
        }
        for index in 0..self.moves.len() {
            self.scores[index] = self.score(pos, self.moves[index]);
        }
    }

    fn score(&self, pos: &Position, mv: Move) -> i32 {
        if mv == self.preferred {
            return PREFERRED_SCORE;
        }
        if let Some(victim) = mv.captured() {
            let promotion = mv.promotion().map_or(0, |p| p.kind().value());
            return victim.kind().value() - mv.piece().kind().value() + promotion;
        }
        if let Some(slot) = self.killers.iter().position(|&killer| killer == mv) {
            return KILLER_SCORE - slot as i32;
        }
        if let Some(promoted) = mv.promotion() {
            return PROMOTION_SCORE + promoted.kind().value();
        }
        if mv.is_castle() {
            return CASTLE_SCORE;
        }
        debug_assert_eq!(pos.piece_on(mv.from()), Some(mv.piece()));
        piece_square::midgame(mv.piece(), mv.to()) - piece_square::midgame(mv.piece(), mv.from())
    }

    /// Selection step: swap the best remaining move to the cursor.
    fn pick(&mut self) -> Option<Move> {
        if self.next >= self.moves.len() {
            return None;
        }
        if self.ordering == Ordering::Heuristic {
            let mut best = self.next;
            for index in self.next + 1..self.moves.len() {
                if self.scores[index] > self.scores[best] {
                    best = index;
                }
            }
            self.moves.swap(self.next, best);
            self.scores.swap(self.next, best);
        }
        let mv = self.moves[self.next];
        self.next += 1;
        Some(mv)
    }
}

impl Default for MoveGenerator {
    fn default() -> Self {
        MoveGenerator::new(Ordering::default())
    }
}

/// Whether a capture is worth searching in quiescence: made by a pawn, of
/// a piece clearly worth more than its captor, or of an undefended piece.
pub fn is_good_capture(pos: &Position, mv: Move) -> bool {
    let Some(victim) = mv.captured() else {
        return false;
    };
    let attacker = mv.piece().kind();
    attacker == PieceKind::Pawn
        || victim.kind().value() - attacker.value() >= GOOD_CAPTURE_MARGIN
        || !pos.is_attacked(victim.color(), mv.to())
}

/// Every pseudo-legal move, or only captures.
pub fn pseudo_legal_moves(pos: &Position, capturing_only: bool) -> MoveList {
    let mut list = MoveList::new();
    generate_captures(pos, &mut list);
    if !capturing_only {
        generate_quiets(pos, &mut list);
    }
    list
}

/// Moves quiescence considers: all of them when in check, else good captures.
pub fn pseudo_legal_qsearch_moves(pos: &Position) -> MoveList {
    if pos.in_check() {
        return pseudo_legal_moves(pos, false);
    }
    let mut list = MoveList::new();
    for &mv in pseudo_legal_moves(pos, true).iter() {
        if is_good_capture(pos, mv) {
            list.push(mv);
        }
    }
    list
}

/// Every legal move in generation order.
pub fn legal_moves(pos: &mut Position) -> MoveList {
    let mut legal = MoveList::new();
    for &mv in pseudo_legal_moves(pos, false).iter() {
        if pos.is_legal(mv) {
            legal.push(mv);
        }
    }
    legal
}

/// Whether the side to move has any legal move; stops at the first.
pub fn has_legal_move(pos: &mut Position) -> bool {
    let mut generator = MoveGenerator::new(Ordering::Generation);
    while let Some(mv) = generator.next_pseudo_legal_move(pos, false) {
        if pos.is_legal(mv) {
            return true;
        }
    }
    false
}

/// Resolve coordinate text (`e2e4`, `e7e8q`) against the legal moves.
pub fn parse_move(pos: &mut Position, text: &str) -> Result<Move, MoveError> {
    let unparseable = || MoveError::Unparseable(text.to_string());
    if !text.is_ascii() || !(4..=5).contains(&text.len()) {
        return Err(unparseable());
    }
    let from = Square::from_algebraic(&text[0..2]).ok_or_else(unparseable)?;
    let to = Square::from_algebraic(&text[2..4]).ok_or_else(unparseable)?;
    let promotion = match text[4..].chars().next() {
        None => None,
        Some(c) => match PieceKind::from_fen_char(c) {
            Some(kind) if PieceKind::PROMOTIONS.contains(&kind) => Some(kind),
            _ => return Err(unparseable()),
        },
    };

    legal_moves(pos)
        .iter()
        .copied()
        .find(|mv| mv.from() == from && mv.to() == to && mv.promotion().map(|p| p.kind()) == promotion)
        .ok_or_else(|| MoveError::Illegal(text.to_string()))
}

impl Position {
    /// Whether a pseudo-legal `mv` keeps the mover's king safe.
    pub fn is_legal(&mut self, mv: Move) -> bool {
        self.make_move(mv);
        let legal = !self.opponent_in_check();
        self.undo_move();
        legal
    }

    /// Parse coordinate move text and apply it.
    pub fn play(&mut self, text: &str) -> Result<Move, MoveError> {
        let mv = parse_move(self, text)?;
        self.make_move(mv);
        Ok(mv)
    }
}
