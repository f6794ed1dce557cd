//! Transposition table.
//!
//! One 16-byte slot per index: the full Zobrist key and a packed data word.
//! The table belongs to the single search worker while a search runs, so
//! plain `&mut self` access is enough.
//!
//! ## Data word
//!
//! ```text
//!   bits  0-28: best move      (29 bits, Move::raw)
//!   bits 29-44: value          (i16 biased to u16)
//!   bits 45-52: depth          (i8; quiescence stores -1)
//!   bits 53-55: age            (3 bits, saturating)
//!   bits 56-57: bound          (2 bits)
//!   bit     58: mate threat
//! ```

use std::mem::size_of;

use kestrel_core::{MOVE_BITS, Move};
use tracing::{info, warn};

use crate::search::MATE_THRESHOLD;

/// Largest table the engine will allocate, in megabytes.
pub const MAX_HASH_MB: usize = 4096;

/// Depth recorded for entries written by quiescence.
pub const QSEARCH_DEPTH: i8 = -1;

const MOVE_MASK: u64 = (1 << MOVE_BITS) - 1;
const VALUE_SHIFT: u32 = 29;
const DEPTH_SHIFT: u32 = 45;
const AGE_SHIFT: u32 = 53;
const BOUND_SHIFT: u32 = 56;
const MATE_THREAT_SHIFT: u32 = 58;
const MAX_AGE: u8 = 7;
const VALUE_BIAS: i32 = 1 << 15;

/// What the stored value proves about the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Bound {
    /// Empty slot.
    #[default]
    None = 0,
    /// The true value.
    Exact = 1,
    /// Failed high: the true value is at least this.
    Lower = 2,
    /// Failed low: the true value is at most this.
    Upper = 3,
}

impl Bound {
    const fn from_bits(bits: u64) -> Bound {
        match bits & 0b11 {
            1 => Bound::Exact,
            2 => Bound::Lower,
            3 => Bound::Upper,
            _ => Bound::None,
        }
    }
}

/// Unpacked table record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtEntry {
    pub best_move: Move,
    /// Stored as passed to [`TranspositionTable::put`]; mate values are
    /// node-relative, see [`value_from_tt`].
    pub value: i32,
    pub depth: i8,
    pub age: u8,
    pub bound: Bound,
    pub mate_threat: bool,
}

impl TtEntry {
    fn pack(self) -> u64 {
        let value = (self.value.clamp(-VALUE_BIAS, VALUE_BIAS - 1) + VALUE_BIAS) as u64;
        (self.best_move.raw() as u64 & MOVE_MASK)
            | value << VALUE_SHIFT
            | (self.depth as u8 as u64) << DEPTH_SHIFT
            | (self.age.min(MAX_AGE) as u64) << AGE_SHIFT
            | (self.bound as u64) << BOUND_SHIFT
            | (self.mate_threat as u64) << MATE_THREAT_SHIFT
    }

    fn unpack(data: u64) -> TtEntry {
        TtEntry {
            best_move: Move::from_raw((data & MOVE_MASK) as u32),
            value: ((data >> VALUE_SHIFT) & 0xFFFF) as i32 - VALUE_BIAS,
            depth: ((data >> DEPTH_SHIFT) & 0xFF) as u8 as i8,
            age: ((data >> AGE_SHIFT) & 0b111) as u8,
            bound: Bound::from_bits(data >> BOUND_SHIFT),
            mate_threat: (data >> MATE_THREAT_SHIFT) & 1 != 0,
        }
    }
}

/// Make a mate value relative to the node at `ply` before storing it, so
/// the same entry is valid wherever the position is reached.
pub fn value_to_tt(value: i32, ply: usize) -> i32 {
    if value > MATE_THRESHOLD {
        value + ply as i32
    } else if value < -MATE_THRESHOLD {
        value - ply as i32
    } else {
        value
    }
}

/// Inverse of [`value_to_tt`].
pub fn value_from_tt(value: i32, ply: usize) -> i32 {
    if value > MATE_THRESHOLD {
        value - ply as i32
    } else if value < -MATE_THRESHOLD {
        value + ply as i32
    } else {
        value
    }
}

#[derive(Clone, Copy, Default)]
struct Slot {
    key: u64,
    data: u64,
}

impl Slot {
    const EMPTY: Slot = Slot { key: 0, data: 0 };

    #[inline]
    fn is_live(self) -> bool {
        Bound::from_bits(self.data >> BOUND_SHIFT) != Bound::None
    }
}

pub struct TranspositionTable {
    slots: Vec<Slot>,
    megabytes: usize,
}

impl TranspositionTable {
    /// Allocate about `megabytes` of slots. The request is clamped to
    /// `1..=MAX_HASH_MB` and halved until the allocation succeeds;
    /// [`megabytes`](Self::megabytes) reports what was actually granted.
    pub fn new(megabytes: usize) -> TranspositionTable {
        let (slots, megabytes) = allocate(megabytes);
        info!(megabytes, entries = slots.len(), "transposition table allocated");
        TranspositionTable { slots, megabytes }
    }

    /// Replace the table with a fresh one of the requested size.
    pub fn resize(&mut self, megabytes: usize) {
        *self = TranspositionTable::new(megabytes);
    }

    #[inline]
    pub fn megabytes(&self) -> usize {
        self.megabytes
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn clear(&mut self) {
        self.slots.fill(Slot::EMPTY);
    }

    #[inline]
    fn index(&self, key: u64) -> usize {
        (key % self.slots.len() as u64) as usize
    }

    /// Store a search result.
    ///
    /// An empty slot is always written. A slot holding another position is
    /// taken over only by an equal or deeper result, or once the old entry
    /// has gone a search without being touched. For the same position a
    /// deeper result replaces the old one, an equal-depth result replaces
    /// it unless that would turn an exact entry into a bound, and a known
    /// best move is never lost.
    pub fn put(&mut self, key: u64, value: i32, bound: Bound, depth: i8, best_move: Move, mate_threat: bool) {
        let index = self.index(key);
        let slot = &mut self.slots[index];
        let incoming = TtEntry { best_move, value, depth, age: 0, bound, mate_threat };

        if !slot.is_live() {
            *slot = Slot { key, data: incoming.pack() };
            return;
        }

        let stored = TtEntry::unpack(slot.data);
        if slot.key != key {
            if depth >= stored.depth || stored.age > 0 {
                *slot = Slot { key, data: incoming.pack() };
            }
            return;
        }

        let downgrade = depth == stored.depth && stored.bound == Bound::Exact && bound != Bound::Exact;
        let mut entry = if depth >= stored.depth && !downgrade { incoming } else { stored };
        if entry.best_move.is_null() {
            entry.best_move = if best_move.is_null() { stored.best_move } else { best_move };
        }
        entry.age = 0;
        slot.data = entry.pack();
    }

    /// Look up `key`. Only an exact key match hits; a hit marks the entry
    /// as used in the current search.
    pub fn get(&mut self, key: u64) -> Option<TtEntry> {
        let index = self.index(key);
        let slot = &mut self.slots[index];
        if !slot.is_live() || slot.key != key {
            return None;
        }
        let mut entry = TtEntry::unpack(slot.data);
        if entry.age != 0 {
            entry.age = 0;
            slot.data = entry.pack();
        }
        Some(entry)
    }

    /// Start a new search generation: every live entry grows one step older.
    pub fn age_entries(&mut self) {
        for slot in self.slots.iter_mut().filter(|slot| slot.is_live()) {
            let mut entry = TtEntry::unpack(slot.data);
            if entry.age < MAX_AGE {
                entry.age += 1;
                slot.data = entry.pack();
            }
        }
    }

    /// Per-mille of live entries among the first thousand slots.
    pub fn hashfull(&self) -> u32 {
        let sample = &self.slots[..self.slots.len().min(1000)];
        let live = sample.iter().filter(|slot| slot.is_live()).count();
        (live * 1000 / sample.len()) as u32
    }
}

fn allocate(requested: usize) -> (Vec<Slot>, usize) {
    let mut megabytes = requested.clamp(1, MAX_HASH_MB);
    if megabytes != requested {
        warn!(requested, megabytes, "hash size clamped");
    }
    loop {
        let capacity = (megabytes * 1024 * 1024 / size_of::<Slot>()).max(1);
        let mut slots = Vec::new();
        match slots.try_reserve_exact(capacity) {
            Ok(()) => {
                slots.resize(capacity, Slot::EMPTY);
                return (slots, megabytes);
            }
            Err(err) if megabytes > 1 => {
                warn!(megabytes, %err, "hash allocation failed, halving");
                megabytes /= 2;
            }
            Err(err) => {
                warn!(%err, "hash allocation failed at 1 MB, using a single slot");
                return (vec![Slot::EMPTY], 0);
            }
        }
    }
}

impl std::fmt::Debug for TranspositionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranspositionTable")
            .field("megabytes", &self.megabytes)
            .field("entries", &self.slots.len())
            .finish()
    }
}
