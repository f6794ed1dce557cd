//! Moves packed into a `u32`.

use std::fmt;

use crate::color::Color;
use crate::piece::Piece;
use crate::piece_kind::PieceKind;
use crate::square::Square;

const FROM_SHIFT: u32 = 0;
const TO_SHIFT: u32 = 7;
const PIECE_SHIFT: u32 = 14;
const CAPTURED_SHIFT: u32 = 18;
const PROMOTION_SHIFT: u32 = 22;
const KIND_SHIFT: u32 = 26;

const SQUARE_MASK: u32 = 0x7F;
const PIECE_MASK: u32 = 0xF;
const KIND_MASK: u32 = 0x7;

/// Number of bits a packed move occupies.
pub const MOVE_BITS: u32 = 29;

/// What a move does beyond relocating a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MoveKind {
    Normal = 0,
    DoublePawnPush = 1,
    EnPassant = 2,
    Castle = 3,
    Promotion = 4,
}

impl MoveKind {
    const fn from_bits(bits: u32) -> Option<MoveKind> {
        match bits {
            0 => Some(MoveKind::Normal),
            1 => Some(MoveKind::DoublePawnPush),
            2 => Some(MoveKind::EnPassant),
            3 => Some(MoveKind::Castle),
            4 => Some(MoveKind::Promotion),
            _ => None,
        }
    }
}

/// A move with everything needed to apply and undo it.
///
/// ```text
/// bits  0-6:  from square (0x88)
/// bits  7-13: to square (0x88)
/// bits 14-17: moving piece
/// bits 18-21: captured piece (0 = none)
/// bits 22-25: promotion piece (0 = none)
/// bits 26-28: kind
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Move(u32);

impl Move {
    /// The "no move" sentinel. Never valid.
    pub const NULL: Move = Move(0);

    /// Pack a move from its parts.
    #[inline]
    pub const fn new(
        kind: MoveKind,
        from: Square,
        to: Square,
        piece: Piece,
        captured: Option<Piece>,
        promotion: Option<Piece>,
    ) -> Move {
        let captured = match captured {
            Some(p) => p.bits() as u32,
            None => 0,
        };
        let promotion = match promotion {
            Some(p) => p.bits() as u32,
            None => 0,
        };
        Move(
            (from.raw() as u32) << FROM_SHIFT
                | (to.raw() as u32) << TO_SHIFT
                | (piece.bits() as u32) << PIECE_SHIFT
                | captured << CAPTURED_SHIFT
                | promotion << PROMOTION_SHIFT
                | (kind as u32) << KIND_SHIFT,
        )
    }

    /// A plain move or capture.
    #[inline]
    pub const fn normal(from: Square, to: Square, piece: Piece, captured: Option<Piece>) -> Move {
        Move::new(MoveKind::Normal, from, to, piece, captured, None)
    }

    /// Reinterpret a packed value, as stored in the transposition table.
    #[inline]
    pub const fn from_raw(raw: u32) -> Move {
        Move(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    const fn field(self, shift: u32, mask: u32) -> u32 {
        (self.0 >> shift) & mask
    }

    #[inline]
    pub const fn from(self) -> Square {
        match Square::from_raw(self.field(FROM_SHIFT, SQUARE_MASK) as u8) {
            Some(sq) => sq,
            None => Square::A1,
        }
    }

    #[inline]
    pub const fn to(self) -> Square {
        match Square::from_raw(self.field(TO_SHIFT, SQUARE_MASK) as u8) {
            Some(sq) => sq,
            None => Square::A1,
        }
    }

    /// The piece that moves.
    ///
    /// # Panics
    ///
    /// On [`Move::NULL`] or a corrupted encoding.
    #[inline]
    pub const fn piece(self) -> Piece {
        match Piece::from_bits(self.field(PIECE_SHIFT, PIECE_MASK) as u8) {
            Some(piece) => piece,
            None => panic!("move carries no moving piece"),
        }
    }

    #[inline]
    pub const fn captured(self) -> Option<Piece> {
        Piece::from_bits(self.field(CAPTURED_SHIFT, PIECE_MASK) as u8)
    }

    #[inline]
    pub const fn promotion(self) -> Option<Piece> {
        Piece::from_bits(self.field(PROMOTION_SHIFT, PIECE_MASK) as u8)
    }

    #[inline]
    pub const fn kind(self) -> MoveKind {
        match MoveKind::from_bits(self.field(KIND_SHIFT, KIND_MASK)) {
            Some(kind) => kind,
            None => MoveKind::Normal,
        }
    }

    #[inline]
    pub const fn color(self) -> Color {
        self.piece().color()
    }

    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_capture(self) -> bool {
        self.field(CAPTURED_SHIFT, PIECE_MASK) != 0
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        self.field(PROMOTION_SHIFT, PIECE_MASK) != 0
    }

    #[inline]
    pub const fn is_castle(self) -> bool {
        matches!(self.kind(), MoveKind::Castle)
    }

    #[inline]
    pub const fn is_en_passant(self) -> bool {
        matches!(self.kind(), MoveKind::EnPassant)
    }

    /// Neither a capture nor a promotion.
    #[inline]
    pub const fn is_quiet(self) -> bool {
        !self.is_capture() && !self.is_promotion()
    }

    /// Structural validity of the encoded fields.
    ///
    /// Checks squares and pieces decode, the promotion field agrees with the
    /// kind, colors line up, and special kinds have their expected shape.
    /// Says nothing about legality in any particular position.
    pub const fn is_valid(self) -> bool {
        if self.0 >> MOVE_BITS != 0 {
            return false;
        }
        let (Some(from), Some(to)) = (
            Square::from_raw(self.field(FROM_SHIFT, SQUARE_MASK) as u8),
            Square::from_raw(self.field(TO_SHIFT, SQUARE_MASK) as u8),
        ) else {
            return false;
        };
        if from.raw() == to.raw() {
            return false;
        }
        let Some(piece) = Piece::from_bits(self.field(PIECE_SHIFT, PIECE_MASK) as u8) else {
            return false;
        };
        let Some(kind) = MoveKind::from_bits(self.field(KIND_SHIFT, KIND_MASK)) else {
            return false;
        };
        let captured_bits = self.field(CAPTURED_SHIFT, PIECE_MASK);
        let captured = Piece::from_bits(captured_bits as u8);
        if captured_bits != 0 && captured.is_none() {
            return false;
        }
        if let Some(victim) = captured
            && (victim.color() as u8 == piece.color() as u8 || matches!(victim.kind(), PieceKind::King))
        {
            return false;
        }
        let promotion_bits = self.field(PROMOTION_SHIFT, PIECE_MASK);
        let promotion = Piece::from_bits(promotion_bits as u8);
        if promotion_bits != 0 && promotion.is_none() {
            return false;
        }
        let is_pawn = matches!(piece.kind(), PieceKind::Pawn);
        match kind {
            MoveKind::Normal => promotion.is_none(),
            MoveKind::DoublePawnPush => {
                is_pawn && captured.is_none() && promotion.is_none() && from.file() == to.file()
                    && from.rank().abs_diff(to.rank()) == 2
            }
            MoveKind::EnPassant => match captured {
                Some(victim) => is_pawn && promotion.is_none() && matches!(victim.kind(), PieceKind::Pawn),
                None => false,
            },
            MoveKind::Castle => {
                matches!(piece.kind(), PieceKind::King)
                    && captured.is_none()
                    && promotion.is_none()
                    && from.rank() == to.rank()
                    && from.file().abs_diff(to.file()) == 2
            }
            MoveKind::Promotion => match promotion {
                Some(promo) => {
                    is_pawn
                        && promo.color() as u8 == piece.color() as u8
                        && !matches!(promo.kind(), PieceKind::Pawn | PieceKind::King)
                }
                None => false,
            },
        }
    }

    /// Long-form debug rendering, e.g. `Ng1-f3`, `Pe5xd6 e.p.`, `O-O-O`.
    pub fn verbose(self) -> Verbose {
        Verbose(self)
    }
}

/// Coordinate notation: `e2e4`, `e7e8q`, `0000` for the null move.
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return f.write_str("0000");
        }
        write!(f, "{}{}", self.from(), self.to())?;
        if let Some(promo) = self.promotion() {
            write!(f, "{}", promo.kind().fen_char())?;
        }
        Ok(())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return f.write_str("Move(null)");
        }
        write!(f, "Move({})", self.verbose())
    }
}

/// Display adapter returned by [`Move::verbose`].
pub struct Verbose(Move);

impl fmt::Display for Verbose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mv = self.0;
        if mv.is_null() {
            return f.write_str("--");
        }
        if mv.is_castle() {
            return f.write_str(if mv.to().file() > mv.from().file() { "O-O" } else { "O-O-O" });
        }
        let letter = mv.piece().kind().fen_char().to_ascii_uppercase();
        let sep = if mv.is_capture() { 'x' } else { '-' };
        write!(f, "{letter}{}{sep}{}", mv.from(), mv.to())?;
        if let Some(promo) = mv.promotion() {
            write!(f, "={}", promo.kind().fen_char().to_ascii_uppercase())?;
        }
        if mv.is_en_passant() {
            f.write_str(" e.p.")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Move, MoveKind};
    use crate::piece::Piece;
    use crate::square::Square;

    #[test]
    fn fields_roundtrip() {
        let mv = Move::new(
            MoveKind::Promotion,
            Square::G7,
            Square::H8,
            Piece::WHITE_PAWN,
            Some(Piece::BLACK_ROOK),
            Some(Piece::WHITE_KNIGHT),
        );
        assert_eq!(mv.from(), Square::G7);
        assert_eq!(mv.to(), Square::H8);
        assert_eq!(mv.piece(), Piece::WHITE_PAWN);
        assert_eq!(mv.captured(), Some(Piece::BLACK_ROOK));
        assert_eq!(mv.promotion(), Some(Piece::WHITE_KNIGHT));
        assert_eq!(mv.kind(), MoveKind::Promotion);
        assert!(mv.is_capture() && mv.is_promotion() && !mv.is_quiet());
        assert!(mv.is_valid());
        assert_eq!(Move::from_raw(mv.raw()), mv);
        assert!(mv.raw() < 1 << super::MOVE_BITS);
    }

    #[test]
    fn null_move() {
        assert!(Move::NULL.is_null());
        assert!(!Move::NULL.is_valid());
        assert_eq!(Move::NULL.to_string(), "0000");
        assert_eq!(Move::default(), Move::NULL);
    }

    #[test]
    fn validity_predicate() {
        let push = Move::normal(Square::E2, Square::E3, Piece::WHITE_PAWN, None);
        assert!(push.is_valid());

        let own_capture = Move::normal(Square::E2, Square::D3, Piece::WHITE_PAWN, Some(Piece::WHITE_KNIGHT));
        assert!(!own_capture.is_valid());

        let king_capture = Move::normal(Square::D1, Square::D8, Piece::WHITE_QUEEN, Some(Piece::BLACK_KING));
        assert!(!king_capture.is_valid());

        let promo_without_piece = Move::new(MoveKind::Promotion, Square::A7, Square::A8, Piece::WHITE_PAWN, None, None);
        assert!(!promo_without_piece.is_valid());

        let bad_castle = Move::new(MoveKind::Castle, Square::E1, Square::F1, Piece::WHITE_KING, None, None);
        assert!(!bad_castle.is_valid());

        let castle = Move::new(MoveKind::Castle, Square::E8, Square::C8, Piece::BLACK_KING, None, None);
        assert!(castle.is_valid());

        let double = Move::new(MoveKind::DoublePawnPush, Square::D7, Square::D5, Piece::BLACK_PAWN, None, None);
        assert!(double.is_valid());

        let ep = Move::new(
            MoveKind::EnPassant,
            Square::E5,
            Square::D6,
            Piece::WHITE_PAWN,
            Some(Piece::BLACK_PAWN),
            None,
        );
        assert!(ep.is_valid());
        assert!(!Move::from_raw(u32::MAX).is_valid());
    }

    #[test]
    fn coordinate_text() {
        let mv = Move::normal(Square::G1, Square::F3, Piece::WHITE_KNIGHT, None);
        assert_eq!(mv.to_string(), "g1f3");
        let promo = Move::new(
            MoveKind::Promotion,
            Square::E2,
            Square::E1,
            Piece::BLACK_PAWN,
            None,
            Some(Piece::BLACK_QUEEN),
        );
        assert_eq!(promo.to_string(), "e2e1q");
    }

    #[test]
    fn verbose_text() {
        let mv = Move::normal(Square::G1, Square::F3, Piece::WHITE_KNIGHT, None);
        assert_eq!(mv.verbose().to_string(), "Ng1-f3");
        let ep = Move::new(
            MoveKind::EnPassant,
            Square::E5,
            Square::D6,
            Piece::WHITE_PAWN,
            Some(Piece::BLACK_PAWN),
            None,
        );
        assert_eq!(ep.verbose().to_string(), "Pe5xd6 e.p.");
        let castle = Move::new(MoveKind::Castle, Square::E1, Square::C1, Piece::WHITE_KING, None, None);
        assert_eq!(castle.verbose().to_string(), "O-O-O");
        let promo = Move::new(
            MoveKind::Promotion,
            Square::B7,
            Square::A8,
            Piece::WHITE_PAWN,
            Some(Piece::BLACK_ROOK),
            Some(Piece::WHITE_QUEEN),
        );
        assert_eq!(promo.verbose().to_string(), "Pb7xa8=Q");
        assert_eq!(format!("{promo:?}"), "Move(Pb7xa8=Q)");
    }
}
