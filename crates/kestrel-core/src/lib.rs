//! Core chess types: 0x88 board representation, moves, generation and game rules.

pub mod attacks;
mod bitboard;
mod castle_rights;
mod chess_move;
mod color;
mod error;
mod fen;
pub mod geometry;
pub mod movegen;
pub mod perft;
mod piece;
mod piece_kind;
pub mod piece_square;
mod position;
mod square;
mod zobrist;

pub use bitboard::Bitboard;
pub use castle_rights::{CastleRights, CastleSide};
pub use chess_move::{MOVE_BITS, Move, MoveKind};
pub use color::Color;
pub use error::{FenError, MoveError, PositionError};
pub use fen::STARTING_FEN;
pub use movegen::{MoveGenerator, MoveList, RootMove, RootMoveList};
pub use piece::Piece;
pub use piece_kind::PieceKind;
pub use position::{MAX_PIECES_PER_KIND, Position, PrettyPosition};
pub use square::Square;
