//! Error types for FEN parsing, position validation and move text.

use crate::color::Color;
use crate::piece_kind::PieceKind;

/// A FEN string that could not be turned into a position.
///
/// Every variant names the field it came from; parsing never falls back
/// to a partially filled board.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FenError {
    #[error("expected 6 FEN fields, found {found}")]
    WrongFieldCount { found: usize },

    #[error("piece placement: expected 8 ranks, found {found}")]
    WrongRankCount { found: usize },

    /// `rank` is the FEN rank number (8 = first rank listed).
    #[error("piece placement: rank {rank} describes {length} squares, expected 8")]
    BadRankLength { rank: usize, length: usize },

    #[error("piece placement: invalid piece character '{character}'")]
    InvalidPieceChar { character: char },

    #[error("side to move: expected \"w\" or \"b\", found \"{found}\"")]
    InvalidColor { found: String },

    #[error("castling rights: invalid character '{character}'")]
    InvalidCastlingChar { character: char },

    #[error("en passant: invalid target square \"{found}\"")]
    InvalidEnPassant { found: String },

    #[error("{field}: invalid counter \"{found}\"")]
    InvalidMoveCounter { field: &'static str, found: String },

    #[error("invalid position: {0}")]
    InvalidPosition(#[from] PositionError),
}

/// A board that parses but cannot arise in a game.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    #[error("expected exactly one {color:?} king, found {count}")]
    KingCount { color: Color, count: u32 },

    #[error("pawn on the first or eighth rank")]
    PawnOnBackRank,

    #[error("too many {color:?} {kind:?} pieces ({count})")]
    TooManyPieces { color: Color, kind: PieceKind, count: usize },

    #[error("the side not to move is in check")]
    OpponentInCheck,
}

/// Move text that was rejected before or during application.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("not a coordinate move: \"{0}\"")]
    Unparseable(String),

    #[error("not a legal move in this position: \"{0}\"")]
    Illegal(String),
}
