//! Board squares on a padded 0x88 grid.
//!
//! A square is stored as `rank << 4 | file`, so the 128-slot index space is
//! 16 columns wide and the right half of every row lies off the board. Any
//! value with a bit in [`OFF_BOARD`] is not a square, which turns edge
//! detection during move stepping into a single mask test.

use std::fmt;

use crate::bitboard::Bitboard;
use crate::geometry::{self, Direction};

/// Bits that are set for every value outside the 8x8 board.
pub const OFF_BOARD: u8 = 0x88;

/// A valid square on the 0x88 grid.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(u8);

impl Square {
    /// Number of valid squares.
    pub const COUNT: usize = 64;

    /// Size of the padded index space (arrays indexed by [`Square::raw`]).
    pub const SPAN: usize = 128;

    /// Build a square from 0-based rank and file.
    #[inline]
    pub const fn new(rank: u8, file: u8) -> Square {
        debug_assert!(rank < 8 && file < 8);
        Square(rank << 4 | file)
    }

    /// Interpret a raw 0x88 value, rejecting off-board values.
    #[inline]
    pub const fn from_raw(raw: u8) -> Option<Square> {
        if raw & OFF_BOARD == 0 {
            Some(Square(raw))
        } else {
            None
        }
    }

    /// Build a square from its compact 0..64 index (LERF order).
    #[inline]
    pub const fn from_index(index: u8) -> Option<Square> {
        if index < 64 {
            Some(Square::from_index_unchecked(index))
        } else {
            None
        }
    }

    #[inline]
    pub(crate) const fn from_index_unchecked(index: u8) -> Square {
        debug_assert!(index < 64);
        Square((index >> 3) << 4 | (index & 7))
    }

    /// Parse algebraic notation such as `e4`.
    pub fn from_algebraic(s: &str) -> Option<Square> {
        match s.as_bytes() {
            &[file @ b'a'..=b'h', rank @ b'1'..=b'8'] => Some(Square::new(rank - b'1', file - b'a')),
            _ => None,
        }
    }

    /// The raw 0x88 value (0..128, never off-board).
    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Compact 0..64 index, rank * 8 + file.
    #[inline]
    pub const fn index(self) -> usize {
        ((self.0 + (self.0 & 7)) >> 1) as usize
    }

    #[inline]
    pub const fn file(self) -> u8 {
        self.0 & 7
    }

    #[inline]
    pub const fn rank(self) -> u8 {
        self.0 >> 4
    }

    /// Single-bit occupancy mask for this square.
    #[inline]
    pub const fn bitboard(self) -> Bitboard {
        Bitboard::new(1u64 << self.index())
    }

    /// Step by a raw 0x88 delta, returning `None` when the step leaves the board.
    #[inline]
    pub const fn offset(self, delta: i8) -> Option<Square> {
        let target = self.0 as i16 + delta as i16;
        if target < 0 {
            return None;
        }
        Square::from_raw(target as u8)
    }

    /// The adjacent square in `dir`, from the precomputed neighbor table.
    #[inline]
    pub fn neighbor(self, dir: Direction) -> Option<Square> {
        geometry::neighbor(self, dir)
    }

    /// Same file, rank mirrored (a1 <-> a8).
    #[inline]
    pub const fn flip_rank(self) -> Square {
        Square(self.0 ^ 0x70)
    }

    /// Whether the square is a light square.
    #[inline]
    pub const fn is_light(self) -> bool {
        (self.rank() + self.file()) % 2 == 1
    }

    /// Iterate over all 64 squares, a1 first.
    pub fn all() -> impl Iterator<Item = Square> {
        (0u8..64).map(Square::from_index_unchecked)
    }

    pub const A1: Square = Square(0x00);
    pub const B1: Square = Square(0x01);
    pub const C1: Square = Square(0x02);
    pub const D1: Square = Square(0x03);
    pub const E1: Square = Square(0x04);
    pub const F1: Square = Square(0x05);
    pub const G1: Square = Square(0x06);
    pub const H1: Square = Square(0x07);
    pub const A2: Square = Square(0x10);
    pub const B2: Square = Square(0x11);
    pub const C2: Square = Square(0x12);
    pub const D2: Square = Square(0x13);
    pub const E2: Square = Square(0x14);
    pub const F2: Square = Square(0x15);
    pub const G2: Square = Square(0x16);
    pub const H2: Square = Square(0x17);
    pub const A3: Square = Square(0x20);
    pub const B3: Square = Square(0x21);
    pub const C3: Square = Square(0x22);
    pub const D3: Square = Square(0x23);
    pub const E3: Square = Square(0x24);
    pub const F3: Square = Square(0x25);
    pub const G3: Square = Square(0x26);
    pub const H3: Square = Square(0x27);
    pub const A4: Square = Square(0x30);
    pub const B4: Square = Square(0x31);
    pub const C4: Square = Square(0x32);
    pub const D4: Square = Square(0x33);
    pub const E4: Square = Square(0x34);
    pub const F4: Square = Square(0x35);
    pub const G4: Square = Square(0x36);
    pub const H4: Square = Square(0x37);
    pub const A5: Square = Square(0x40);
    pub const B5: Square = Square(0x41);
    pub const C5: Square = Square(0x42);
    pub const D5: Square = Square(0x43);
    pub const E5: Square = Square(0x44);
    pub const F5: Square = Square(0x45);
    pub const G5: Square = Square(0x46);
    pub const H5: Square = Square(0x47);
    pub const A6: Square = Square(0x50);
    pub const B6: Square = Square(0x51);
    pub const C6: Square = Square(0x52);
    pub const D6: Square = Square(0x53);
    pub const E6: Square = Square(0x54);
    pub const F6: Square = Square(0x55);
    pub const G6: Square = Square(0x56);
    pub const H6: Square = Square(0x57);
    pub const A7: Square = Square(0x60);
    pub const B7: Square = Square(0x61);
    pub const C7: Square = Square(0x62);
    pub const D7: Square = Square(0x63);
    pub const E7: Square = Square(0x64);
    pub const F7: Square = Square(0x65);
    pub const G7: Square = Square(0x66);
    pub const H7: Square = Square(0x67);
    pub const A8: Square = Square(0x70);
    pub const B8: Square = Square(0x71);
    pub const C8: Square = Square(0x72);
    pub const D8: Square = Square(0x73);
    pub const E8: Square = Square(0x74);
    pub const F8: Square = Square(0x75);
    pub const G8: Square = Square(0x76);
    pub const H8: Square = Square(0x77);
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file()) as char, (b'1' + self.rank()) as char)
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({self})")
    }
}
