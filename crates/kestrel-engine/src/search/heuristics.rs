//! Killer moves: quiet moves that caused a beta cutoff at the same ply.

use kestrel_core::Move;
use kestrel_core::movegen::MAX_KILLERS;

use crate::search::MAX_PLY;

pub struct KillerTable {
    slots: Vec<[Move; MAX_KILLERS]>,
    count: usize,
}

impl KillerTable {
    /// `count` slots per ply, clamped to [`MAX_KILLERS`].
    pub fn new(count: usize) -> Self {
        KillerTable { slots: vec![[Move::NULL; MAX_KILLERS]; MAX_PLY + 1], count: count.min(MAX_KILLERS) }
    }

    pub fn clear(&mut self) {
        self.slots.fill([Move::NULL; MAX_KILLERS]);
    }

    pub fn set_count(&mut self, count: usize) {
        self.count = count.min(MAX_KILLERS);
        self.clear();
    }

    /// Record `mv` as the newest killer at `ply`, shifting older ones down.
    /// A move already in the row moves to the front instead of duplicating.
    pub fn store(&mut self, ply: usize, mv: Move) {
        if self.count == 0 || ply >= self.slots.len() {
            return;
        }
        let row = &mut self.slots[ply][..self.count];
        let end = row.iter().position(|&killer| killer == mv).unwrap_or(row.len() - 1);
        row[..=end].rotate_right(1);
        row[0] = mv;
    }

    /// Killers at `ply`, newest first.
    pub fn row(&self, ply: usize) -> &[Move] {
        match self.slots.get(ply) {
            Some(row) => &row[..self.count],
            None => &[],
        }
    }
}

impl Default for KillerTable {
    fn default() -> Self {
        Self::new(2)
    }
}
