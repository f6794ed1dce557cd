//! Side colors and the pawn geometry that depends on them.

use std::fmt;
use std::ops::Not;

/// The side a piece belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    pub const COUNT: usize = 2;
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Return the opposite color.
    #[inline]
    pub const fn flip(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// 0x88 step a pawn of this color advances by.
    #[inline]
    pub const fn forward(self) -> i8 {
        match self {
            Color::White => 16,
            Color::Black => -16,
        }
    }

    /// Rank (0-based) this side's pieces start on.
    #[inline]
    pub const fn back_rank(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    /// Rank (0-based) a pawn of this color may double-push from.
    #[inline]
    pub const fn pawn_rank(self) -> u8 {
        match self {
            Color::White => 1,
            Color::Black => 6,
        }
    }

    /// Rank (0-based) a pawn of this color promotes on.
    #[inline]
    pub const fn promotion_rank(self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }

    /// Parse the side-to-move field of a FEN string.
    pub fn from_fen(s: &str) -> Option<Color> {
        match s {
            "w" => Some(Color::White),
            "b" => Some(Color::Black),
            _ => None,
        }
    }
}

impl Not for Color {
    type Output = Color;

    #[inline]
    fn not(self) -> Color {
        self.flip()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Color::White => "w",
            Color::Black => "b",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Color;

    #[test]
    fn flip_and_not_agree() {
        for color in Color::ALL {
            assert_eq!(color.flip(), !color);
            assert_eq!(color.flip().flip(), color);
        }
    }

    #[test]
    fn pawn_geometry_is_mirrored() {
        assert_eq!(Color::White.forward(), -Color::Black.forward());
        assert_eq!(Color::White.pawn_rank() + Color::Black.pawn_rank(), 7);
        assert_eq!(Color::White.promotion_rank(), Color::Black.back_rank());
    }

    #[test]
    fn fen_side_roundtrip() {
        for color in Color::ALL {
            assert_eq!(Color::from_fen(&color.to_string()), Some(color));
        }
        assert_eq!(Color::from_fen("x"), None);
        assert_eq!(Color::from_fen("W"), None);
    }
}
