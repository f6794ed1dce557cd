//! 64-bit occupancy sets over the compact square index.
//!
//! The board array is 0x88, but occupancy sets use the dense 0..64 index so
//! that popcounts and bit scans work directly.

use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};

use crate::square::Square;

/// A set of squares, one bit per compact square index.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bitboard(u64);

impl Bitboard {
    pub const EMPTY: Bitboard = Bitboard(0);
    pub const FULL: Bitboard = Bitboard(!0);

    /// Squares where bishops on light squares live.
    pub const LIGHT_SQUARES: Bitboard = Bitboard(0x55AA_55AA_55AA_55AA);
    pub const DARK_SQUARES: Bitboard = Bitboard(0xAA55_AA55_AA55_AA55);

    #[inline]
    pub const fn new(bits: u64) -> Bitboard {
        Bitboard(bits)
    }

    #[inline]
    pub const fn inner(self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_nonempty(self) -> bool {
        self.0 != 0
    }

    #[inline]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// True when two or more squares are set.
    #[inline]
    pub const fn more_than_one(self) -> bool {
        self.0 & self.0.wrapping_sub(1) != 0
    }

    #[inline]
    pub const fn contains(self, sq: Square) -> bool {
        self.0 & (1u64 << sq.index()) != 0
    }

    #[inline]
    pub const fn with(self, sq: Square) -> Bitboard {
        Bitboard(self.0 | 1u64 << sq.index())
    }

    #[inline]
    pub const fn without(self, sq: Square) -> Bitboard {
        Bitboard(self.0 & !(1u64 << sq.index()))
    }

    /// Lowest-index square, if any.
    #[inline]
    pub const fn lsb(self) -> Option<Square> {
        if self.0 == 0 {
            None
        } else {
            Some(Square::from_index_unchecked(self.0.trailing_zeros() as u8))
        }
    }

    /// Highest-index square, if any.
    #[inline]
    pub const fn msb(self) -> Option<Square> {
        if self.0 == 0 {
            None
        } else {
            Some(Square::from_index_unchecked(63 - self.0.leading_zeros() as u8))
        }
    }
}

macro_rules! impl_bit_op {
    ($trait:ident, $method:ident, $assign_trait:ident, $assign_method:ident, $op:tt) => {
        impl $trait for Bitboard {
            type Output = Bitboard;

            #[inline]
            fn $method(self, rhs: Bitboard) -> Bitboard {
                Bitboard(self.0 $op rhs.0)
            }
        }

        impl $assign_trait for Bitboard {
            #[inline]
            fn $assign_method(&mut self, rhs: Bitboard) {
                self.0 = self.0 $op rhs.0;
            }
        }
    };
}

impl_bit_op!(BitAnd, bitand, BitAndAssign, bitand_assign, &);
impl_bit_op!(BitOr, bitor, BitOrAssign, bitor_assign, |);
impl_bit_op!(BitXor, bitxor, BitXorAssign, bitxor_assign, ^);

impl Not for Bitboard {
    type Output = Bitboard;

    #[inline]
    fn not(self) -> Bitboard {
        Bitboard(!self.0)
    }
}

impl Iterator for Bitboard {
    type Item = Square;

    #[inline]
    fn next(&mut self) -> Option<Square> {
        let sq = self.lsb()?;
        self.0 &= self.0 - 1;
        Some(sq)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.count() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Bitboard {}

impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        for rank in (0..8u8).rev() {
            write!(f, "  {} ", rank + 1)?;
            for file in 0..8u8 {
                let mark = if self.contains(Square::new(rank, file)) { 'x' } else { '.' };
                write!(f, "{mark} ")?;
            }
            writeln!(f)?;
        }
        write!(f, "    a b c d e f g h")
    }
}

#[cfg(test)]
mod tests {
    use super::Bitboard;
    use crate::square::Square;

    #[test]
    fn insert_remove() {
        let bb = Bitboard::EMPTY.with(Square::E4).with(Square::A8);
        assert!(bb.contains(Square::E4));
        assert!(bb.contains(Square::A8));
        assert!(!bb.contains(Square::E5));
        assert_eq!(bb.count(), 2);
        assert!(bb.more_than_one());
        assert!(!bb.without(Square::E4).more_than_one());
        assert!(bb.without(Square::E4).without(Square::A8).is_empty());
    }

    #[test]
    fn bit_scans() {
        let bb = Bitboard::EMPTY.with(Square::C3).with(Square::F6).with(Square::B7);
        assert_eq!(bb.lsb(), Some(Square::C3));
        assert_eq!(bb.msb(), Some(Square::B7));
        assert_eq!(Bitboard::EMPTY.lsb(), None);
        assert_eq!(Bitboard::EMPTY.msb(), None);
    }

    #[test]
    fn iterates_in_index_order() {
        let bb = Bitboard::EMPTY.with(Square::H8).with(Square::A1).with(Square::E4);
        let squares: Vec<_> = bb.collect();
        assert_eq!(squares, vec![Square::A1, Square::E4, Square::H8]);
        assert_eq!(bb.len(), 3);
    }

    #[test]
    fn square_color_masks_partition_board() {
        assert_eq!(Bitboard::LIGHT_SQUARES | Bitboard::DARK_SQUARES, Bitboard::FULL);
        assert!((Bitboard::LIGHT_SQUARES & Bitboard::DARK_SQUARES).is_empty());
        for sq in Square::all() {
            assert_eq!(Bitboard::LIGHT_SQUARES.contains(sq), sq.is_light(), "{sq}");
        }
    }

    #[test]
    fn operators() {
        let a = Bitboard::EMPTY.with(Square::A1).with(Square::B1);
        let b = Bitboard::EMPTY.with(Square::B1).with(Square::C1);
        assert_eq!((a & b).count(), 1);
        assert_eq!((a | b).count(), 3);
        assert_eq!((a ^ b).count(), 2);
        assert_eq!((!a).count(), 62);
        let mut c = a;
        c ^= a;
        assert!(c.is_empty());
    }
}
