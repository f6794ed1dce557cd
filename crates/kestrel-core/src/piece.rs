//! Colored pieces packed into a non-zero byte.

use std::fmt;
use std::num::NonZeroU8;

use crate::color::Color;
use crate::piece_kind::PieceKind;

/// A colored piece.
///
/// Bit layout:
/// - bits 0-2: kind index + 1 (1..=6)
/// - bit 3: color (0 = White, 1 = Black)
///
/// The encoding is never zero, so `Option<Piece>` is one byte and the
/// packed move format can use 0 for "no piece".
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece(NonZeroU8);

impl Piece {
    pub const COUNT: usize = 12;

    pub const WHITE_PAWN: Piece = Piece::new(PieceKind::Pawn, Color::White);
    pub const WHITE_KNIGHT: Piece = Piece::new(PieceKind::Knight, Color::White);
    pub const WHITE_BISHOP: Piece = Piece::new(PieceKind::Bishop, Color::White);
    pub const WHITE_ROOK: Piece = Piece::new(PieceKind::Rook, Color::White);
    pub const WHITE_QUEEN: Piece = Piece::new(PieceKind::Queen, Color::White);
    pub const WHITE_KING: Piece = Piece::new(PieceKind::King, Color::White);
    pub const BLACK_PAWN: Piece = Piece::new(PieceKind::Pawn, Color::Black);
    pub const BLACK_KNIGHT: Piece = Piece::new(PieceKind::Knight, Color::Black);
    pub const BLACK_BISHOP: Piece = Piece::new(PieceKind::Bishop, Color::Black);
    pub const BLACK_ROOK: Piece = Piece::new(PieceKind::Rook, Color::Black);
    pub const BLACK_QUEEN: Piece = Piece::new(PieceKind::Queen, Color::Black);
    pub const BLACK_KING: Piece = Piece::new(PieceKind::King, Color::Black);

    #[inline]
    pub const fn new(kind: PieceKind, color: Color) -> Piece {
        match NonZeroU8::new((color as u8) << 3 | (kind as u8 + 1)) {
            Some(bits) => Piece(bits),
            None => unreachable!(),
        }
    }

    /// Decode the 4-bit packed form; 0 and unused codes give `None`.
    #[inline]
    pub const fn from_bits(bits: u8) -> Option<Piece> {
        let kind = bits & 7;
        if bits > 15 || kind == 0 || kind > 6 {
            return None;
        }
        match NonZeroU8::new(bits) {
            Some(bits) => Some(Piece(bits)),
            None => None,
        }
    }

    /// The 4-bit packed form (never zero).
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0.get()
    }

    #[inline]
    pub const fn kind(self) -> PieceKind {
        match self.0.get() & 7 {
            1 => PieceKind::Pawn,
            2 => PieceKind::Knight,
            3 => PieceKind::Bishop,
            4 => PieceKind::Rook,
            5 => PieceKind::Queen,
            _ => PieceKind::King,
        }
    }

    #[inline]
    pub const fn color(self) -> Color {
        if self.0.get() & 8 == 0 { Color::White } else { Color::Black }
    }

    /// Dense 0..12 index: White kinds first, then Black.
    #[inline]
    pub const fn index(self) -> usize {
        self.color().index() * PieceKind::COUNT + self.kind().index()
    }

    /// FEN letter, uppercase for White.
    pub fn fen_char(self) -> char {
        let c = self.kind().fen_char();
        match self.color() {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    pub fn from_fen_char(c: char) -> Option<Piece> {
        let kind = PieceKind::from_fen_char(c)?;
        let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
        Some(Piece::new(kind, color))
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fen_char())
    }
}

impl fmt::Debug for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Piece({})", self.fen_char())
    }
}
