//! Move containers.

use std::ops::Index;

use crate::chess_move::Move;

/// Capacity of a [`MoveList`]; the most moves any position has is 218.
pub const MAX_MOVES: usize = 256;

/// Stack-allocated buffer for generated moves.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; MAX_MOVES],
    len: u16,
}

impl MoveList {
    pub fn new() -> MoveList {
        MoveList { moves: [Move::NULL; MAX_MOVES], len: 0 }
    }

    #[inline]
    pub fn push(&mut self, mv: Move) {
        debug_assert!((self.len as usize) < MAX_MOVES);
        self.moves[self.len as usize] = mv;
        self.len += 1;
    }

    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len as usize]
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    pub fn contains(&self, mv: Move) -> bool {
        self.as_slice().contains(&mv)
    }

    #[inline]
    pub(crate) fn swap(&mut self, a: usize, b: usize) {
        self.moves.swap(a, b);
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<usize> for MoveList {
    type Output = Move;

    #[inline]
    fn index(&self, index: usize) -> &Move {
        &self.as_slice()[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// A root move and the value it scored in the latest iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootMove {
    pub mv: Move,
    pub value: i32,
}

/// Legal moves at the root, kept in search order between iterations.
#[derive(Debug, Clone, Default)]
pub struct RootMoveList {
    moves: Vec<RootMove>,
}

impl RootMoveList {
    /// Every move in `moves`, valued at `value`.
    pub fn new(moves: impl IntoIterator<Item = Move>, value: i32) -> RootMoveList {
        RootMoveList { moves: moves.into_iter().map(|mv| RootMove { mv, value }).collect() }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RootMove> {
        self.moves.iter()
    }

    pub fn first(&self) -> Option<&RootMove> {
        self.moves.first()
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut RootMove> {
        self.moves.get_mut(index)
    }

    pub fn set_value(&mut self, mv: Move, value: i32) {
        if let Some(entry) = self.moves.iter_mut().find(|entry| entry.mv == mv) {
            entry.value = value;
        }
    }

    /// Best value first; moves with equal values keep their relative order.
    pub fn sort(&mut self) {
        self.moves.sort_by(|a, b| b.value.cmp(&a.value));
    }

    /// Move `mv` to the head, shifting the moves before it back by one.
    /// Returns whether `mv` was in the list.
    pub fn promote_to_front(&mut self, mv: Move) -> bool {
        match self.moves.iter().position(|entry| entry.mv == mv) {
            Some(index) => {
                self.moves[..=index].rotate_right(1);
                true
            }
            None => false,
        }
    }

    /// Keep only moves that satisfy `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(Move) -> bool) {
        self.moves.retain(|entry| keep(entry.mv));
    }
}

impl Index<usize> for RootMoveList {
    type Output = RootMove;

    fn index(&self, index: usize) -> &RootMove {
        &self.moves[index]
    }
}
