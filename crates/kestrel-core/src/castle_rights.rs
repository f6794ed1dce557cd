//! Castling rights and castling geometry.

use std::fmt;

use crate::color::Color;
use crate::error::FenError;
use crate::square::Square;

/// Wing a king castles toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    KingSide,
    QueenSide,
}

impl CastleSide {
    pub const ALL: [CastleSide; 2] = [CastleSide::KingSide, CastleSide::QueenSide];

    /// Destination of the king.
    #[inline]
    pub const fn king_to(self, color: Color) -> Square {
        let file = match self {
            CastleSide::KingSide => 6,
            CastleSide::QueenSide => 2,
        };
        Square::new(color.back_rank(), file)
    }

    /// Corner the rook starts on.
    #[inline]
    pub const fn rook_from(self, color: Color) -> Square {
        let file = match self {
            CastleSide::KingSide => 7,
            CastleSide::QueenSide => 0,
        };
        Square::new(color.back_rank(), file)
    }

    /// Square the rook lands on, next to the king.
    #[inline]
    pub const fn rook_to(self, color: Color) -> Square {
        let file = match self {
            CastleSide::KingSide => 5,
            CastleSide::QueenSide => 3,
        };
        Square::new(color.back_rank(), file)
    }

    /// Which wing a castling king move to `king_to` belongs to.
    #[inline]
    pub const fn from_king_to(king_to: Square) -> CastleSide {
        if king_to.file() > 4 { CastleSide::KingSide } else { CastleSide::QueenSide }
    }
}

/// Four independent castling flags: bit 0 = `K`, 1 = `Q`, 2 = `k`, 3 = `q`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastleRights(u8);

/// Rights lost when a piece leaves or arrives on each 0x88 square.
const REVOKED_BY: [u8; Square::SPAN] = {
    let mut table = [0u8; Square::SPAN];
    table[Square::E1.raw() as usize] = 0b0011;
    table[Square::H1.raw() as usize] = 0b0001;
    table[Square::A1.raw() as usize] = 0b0010;
    table[Square::E8.raw() as usize] = 0b1100;
    table[Square::H8.raw() as usize] = 0b0100;
    table[Square::A8.raw() as usize] = 0b1000;
    table
};

impl CastleRights {
    pub const NONE: CastleRights = CastleRights(0);
    pub const ALL: CastleRights = CastleRights(0b1111);

    /// Number of distinct single rights.
    pub const COUNT: usize = 4;

    #[inline]
    const fn bit(color: Color, side: CastleSide) -> u8 {
        let shift = color.index() * 2
            + match side {
                CastleSide::KingSide => 0,
                CastleSide::QueenSide => 1,
            };
        1 << shift
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn has(self, color: Color, side: CastleSide) -> bool {
        self.0 & Self::bit(color, side) != 0
    }

    #[inline]
    pub const fn with(self, color: Color, side: CastleSide) -> CastleRights {
        CastleRights(self.0 | Self::bit(color, side))
    }

    #[inline]
    pub const fn without(self, color: Color, side: CastleSide) -> CastleRights {
        CastleRights(self.0 & !Self::bit(color, side))
    }

    /// Rights left after a move touching `from` and `to`.
    ///
    /// Moving the king or a corner rook, or capturing on a corner, clears
    /// the matching rights.
    #[inline]
    pub const fn after_move(self, from: Square, to: Square) -> CastleRights {
        CastleRights(self.0 & !(REVOKED_BY[from.raw() as usize] | REVOKED_BY[to.raw() as usize]))
    }

    /// Indices (0..4) of the set rights, used for hashing.
    pub fn indices(self) -> impl Iterator<Item = usize> {
        (0..Self::COUNT).filter(move |i| self.0 & (1 << i) != 0)
    }

    /// Parse the FEN castling field (`KQkq`, any subset, or `-`).
    pub fn from_fen(s: &str) -> Result<CastleRights, FenError> {
        if s == "-" {
            return Ok(CastleRights::NONE);
        }
        s.chars().try_fold(CastleRights::NONE, |rights, c| {
            let (color, side) = match c {
                'K' => (Color::White, CastleSide::KingSide),
                'Q' => (Color::White, CastleSide::QueenSide),
                'k' => (Color::Black, CastleSide::KingSide),
                'q' => (Color::Black, CastleSide::QueenSide),
                _ => return Err(FenError::InvalidCastlingChar { character: c }),
            };
            Ok(rights.with(color, side))
        })
    }
}

impl fmt::Display for CastleRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("-");
        }
        for (i, c) in ['K', 'Q', 'k', 'q'].into_iter().enumerate() {
            if self.0 & (1 << i) != 0 {
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for CastleRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CastleRights({self})")
    }
}
