//! The mutable board.
//!
//! A [`Position`] keeps four redundant views of the same placement in sync:
//! the 0x88 board array, per-(color, kind) bitboards, per-(color, kind)
//! piece lists, and the king squares. Moves are applied in place and undone
//! from a stack of [`Checkpoint`]s, and the Zobrist hash is updated
//! incrementally on every change.

mod attacks;
mod draw;
mod make_move;

use std::cell::Cell;
use std::fmt;

use crate::bitboard::Bitboard;
use crate::castle_rights::{CastleRights, CastleSide};
use crate::chess_move::Move;
use crate::color::Color;
use crate::error::PositionError;
use crate::piece::Piece;
use crate::piece_kind::PieceKind;
use crate::square::Square;
use crate::zobrist;

/// Most pieces of one kind and color a position can hold (two plus eight promotions).
pub const MAX_PIECES_PER_KIND: usize = 10;

/// Squares occupied by one kind of piece of one color, in no particular order.
#[derive(Clone, Copy)]
struct PieceList {
    squares: [Square; MAX_PIECES_PER_KIND],
    len: u8,
}

impl PieceList {
    const EMPTY: PieceList = PieceList { squares: [Square::A1; MAX_PIECES_PER_KIND], len: 0 };

    #[inline]
    fn as_slice(&self) -> &[Square] {
        &self.squares[..self.len as usize]
    }

    /// Append and return the slot used.
    #[inline]
    fn push(&mut self, sq: Square) -> u8 {
        debug_assert!((self.len as usize) < MAX_PIECES_PER_KIND);
        let slot = self.len;
        self.squares[slot as usize] = sq;
        self.len += 1;
        slot
    }

    /// Remove `slot` by moving the last entry into it. Returns the moved square, if any.
    #[inline]
    fn swap_remove(&mut self, slot: u8) -> Option<Square> {
        debug_assert!(slot < self.len);
        self.len -= 1;
        if slot == self.len {
            return None;
        }
        let moved = self.squares[self.len as usize];
        self.squares[slot as usize] = moved;
        Some(moved)
    }

    /// Exact inverse of [`PieceList::swap_remove`]: put `sq` back at `slot`
    /// and return the square displaced to the end, if any.
    #[inline]
    fn insert(&mut self, slot: u8, sq: Square) -> Option<Square> {
        debug_assert!(slot <= self.len);
        let end = self.len;
        self.len += 1;
        if slot == end {
            self.squares[end as usize] = sq;
            return None;
        }
        let displaced = self.squares[slot as usize];
        self.squares[end as usize] = displaced;
        self.squares[slot as usize] = sq;
        Some(displaced)
    }
}

impl PartialEq for PieceList {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

/// State saved by `make_move` so `undo_move` can restore it exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Checkpoint {
    /// The move applied, or [`Move::NULL`] for a pass.
    mv: Move,
    castling: CastleRights,
    en_passant: Option<Square>,
    halfmove_clock: u16,
    fullmove_number: u16,
    hash: u64,
    in_check: Option<bool>,
    /// Piece-list slot the captured piece occupied.
    captured_slot: u8,
    /// Piece-list slot of a promoting pawn.
    promoted_slot: u8,
}

/// A chess position with undo history.
#[derive(Clone)]
pub struct Position {
    /// Occupant of each 0x88 square; off-board slots stay `None`.
    board: [Option<Piece>; Square::SPAN],
    /// Bitboard per color and kind.
    pieces: [[Bitboard; PieceKind::COUNT]; Color::COUNT],
    /// Union of each side's pieces.
    sides: [Bitboard; Color::COUNT],
    lists: [[PieceList; PieceKind::COUNT]; Color::COUNT],
    /// Index of the occupant of each square within its piece list.
    slots: [u8; Square::SPAN],
    kings: [Square; Color::COUNT],
    pub(crate) side_to_move: Color,
    pub(crate) castling: CastleRights,
    pub(crate) en_passant: Option<Square>,
    pub(crate) halfmove_clock: u16,
    pub(crate) fullmove_number: u16,
    pub(crate) hash: u64,
    history: Vec<Checkpoint>,
    /// Lazily computed "side to move is in check".
    in_check: Cell<Option<bool>>,
}

impl Position {
    /// An empty board, White to move, no rights. Filled in by FEN parsing.
    pub(crate) fn empty() -> Position {
        Position {
            board: [None; Square::SPAN],
            pieces: [[Bitboard::EMPTY; PieceKind::COUNT]; Color::COUNT],
            sides: [Bitboard::EMPTY; Color::COUNT],
            lists: [[PieceList::EMPTY; PieceKind::COUNT]; Color::COUNT],
            slots: [0; Square::SPAN],
            kings: [Square::E1, Square::E8],
            side_to_move: Color::White,
            castling: CastleRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            hash: 0,
            history: Vec::with_capacity(256),
            in_check: Cell::new(None),
        }
    }

    /// The standard initial position.
    pub fn starting() -> Position {
        const BACK_RANK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        let mut pos = Position::empty();
        for color in Color::ALL {
            for (file, kind) in BACK_RANK.into_iter().enumerate() {
                pos.add_piece(Square::new(color.back_rank(), file as u8), Piece::new(kind, color));
                pos.add_piece(Square::new(color.pawn_rank(), file as u8), Piece::new(PieceKind::Pawn, color));
            }
        }
        pos.castling = CastleRights::ALL;
        pos.hash = pos.compute_hash();
        pos
    }

    /// Parse a FEN string. Same as `s.parse()`.
    pub fn from_fen(s: &str) -> Result<Position, crate::error::FenError> {
        s.parse()
    }

    #[inline]
    pub fn piece_on(&self, sq: Square) -> Option<Piece> {
        self.board[sq.raw() as usize]
    }

    #[inline]
    pub fn is_empty(&self, sq: Square) -> bool {
        self.board[sq.raw() as usize].is_none()
    }

    #[inline]
    pub fn pieces(&self, color: Color, kind: PieceKind) -> Bitboard {
        self.pieces[color.index()][kind.index()]
    }

    /// Both colors' pieces of `kind`.
    #[inline]
    pub fn kind(&self, kind: PieceKind) -> Bitboard {
        self.pieces[0][kind.index()] | self.pieces[1][kind.index()]
    }

    #[inline]
    pub fn side(&self, color: Color) -> Bitboard {
        self.sides[color.index()]
    }

    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.sides[0] | self.sides[1]
    }

    /// Squares holding `color`'s pieces of `kind`.
    #[inline]
    pub fn piece_list(&self, color: Color, kind: PieceKind) -> &[Square] {
        self.lists[color.index()][kind.index()].as_slice()
    }

    #[inline]
    pub fn count(&self, color: Color, kind: PieceKind) -> usize {
        self.lists[color.index()][kind.index()].len as usize
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        self.kings[color.index()]
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn castling(&self) -> CastleRights {
        self.castling
    }

    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u16 {
        self.fullmove_number
    }

    #[inline]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Number of moves applied since construction (undo-log depth).
    #[inline]
    pub fn ply(&self) -> usize {
        self.history.len()
    }

    /// Most recently applied move, `Move::NULL` for a pass.
    pub fn last_move(&self) -> Option<Move> {
        self.history.last().map(|cp| cp.mv)
    }

    /// Whether `color` has anything besides pawns and the king.
    pub fn has_non_pawn_material(&self, color: Color) -> bool {
        let c = color.index();
        (self.pieces[c][PieceKind::Knight.index()]
            | self.pieces[c][PieceKind::Bishop.index()]
            | self.pieces[c][PieceKind::Rook.index()]
            | self.pieces[c][PieceKind::Queen.index()])
        .is_nonempty()
    }

    /// Forget the undo log, keeping the current state. The result can no
    /// longer be unwound past this point or see earlier repetitions.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Fold the hash from scratch.
    pub fn compute_hash(&self) -> u64 {
        let mut hash = zobrist::side(self.side_to_move)
            ^ zobrist::castling(self.castling)
            ^ zobrist::en_passant(self.en_passant);
        for sq in Square::all() {
            if let Some(piece) = self.piece_on(sq) {
                hash ^= zobrist::piece_square(piece, sq);
            }
        }
        hash
    }

    /// Check that every redundant view of the placement agrees and the
    /// hash matches. Used by debug assertions and tests.
    pub fn is_consistent(&self) -> bool {
        let mut pieces = [[Bitboard::EMPTY; PieceKind::COUNT]; Color::COUNT];
        for sq in Square::all() {
            if let Some(piece) = self.piece_on(sq) {
                let (c, k) = (piece.color().index(), piece.kind().index());
                pieces[c][k] = pieces[c][k].with(sq);
                let list = &self.lists[c][k];
                let slot = self.slots[sq.raw() as usize];
                if slot >= list.len || list.squares[slot as usize] != sq {
                    return false;
                }
            }
        }
        for color in Color::ALL {
            let c = color.index();
            let mut side = Bitboard::EMPTY;
            for kind in PieceKind::ALL {
                let k = kind.index();
                if pieces[c][k] != self.pieces[c][k] || pieces[c][k].count() as u8 != self.lists[c][k].len {
                    return false;
                }
                side |= pieces[c][k];
            }
            if side != self.sides[c] {
                return false;
            }
            if self.piece_on(self.kings[c]) != Some(Piece::new(PieceKind::King, color)) {
                return false;
            }
        }
        (self.sides[0] & self.sides[1]).is_empty() && self.hash == self.compute_hash()
    }

    /// Rules a position from FEN or a setup must satisfy.
    pub fn validate(&self) -> Result<(), PositionError> {
        for color in Color::ALL {
            let count = self.pieces(color, PieceKind::King).count();
            if count != 1 {
                return Err(PositionError::KingCount { color, count });
            }
        }
        let back_ranks = crate::geometry::RANK_MASKS[0] | crate::geometry::RANK_MASKS[7];
        if (self.kind(PieceKind::Pawn) & back_ranks).is_nonempty() {
            return Err(PositionError::PawnOnBackRank);
        }
        let them = !self.side_to_move;
        if self.is_attacked(self.side_to_move, self.king_square(them)) {
            return Err(PositionError::OpponentInCheck);
        }
        Ok(())
    }

    /// Drop castling rights whose king or rook is not on its home square.
    pub(crate) fn sanitize_castling(&mut self) {
        for color in Color::ALL {
            let king_home = Square::new(color.back_rank(), 4);
            for side in CastleSide::ALL {
                let rook_home = side.rook_from(color);
                if self.piece_on(king_home) != Some(Piece::new(PieceKind::King, color))
                    || self.piece_on(rook_home) != Some(Piece::new(PieceKind::Rook, color))
                {
                    self.castling = self.castling.without(color, side);
                }
            }
        }
    }

    /// 8x8 diagram for logs and debugging.
    pub fn pretty(&self) -> PrettyPosition<'_> {
        PrettyPosition(self)
    }

    /// Place a piece on an empty square, appending it to its list.
    pub(crate) fn add_piece(&mut self, sq: Square, piece: Piece) {
        debug_assert!(self.is_empty(sq), "add_piece on occupied {sq}");
        let (c, k) = (piece.color().index(), piece.kind().index());
        self.board[sq.raw() as usize] = Some(piece);
        self.pieces[c][k] ^= sq.bitboard();
        self.sides[c] ^= sq.bitboard();
        self.slots[sq.raw() as usize] = self.lists[c][k].push(sq);
        if piece.kind() == PieceKind::King {
            self.kings[c] = sq;
        }
        self.hash ^= zobrist::piece_square(piece, sq);
    }

    /// Lift the piece off `sq` and return the list slot it held.
    fn remove_piece(&mut self, sq: Square) -> u8 {
        let Some(piece) = self.board[sq.raw() as usize].take() else {
            debug_assert!(false, "remove_piece on empty {sq}");
            return 0;
        };
        let (c, k) = (piece.color().index(), piece.kind().index());
        self.pieces[c][k] ^= sq.bitboard();
        self.sides[c] ^= sq.bitboard();
        let slot = self.slots[sq.raw() as usize];
        if let Some(moved) = self.lists[c][k].swap_remove(slot) {
            self.slots[moved.raw() as usize] = slot;
        }
        self.hash ^= zobrist::piece_square(piece, sq);
        slot
    }

    /// Put a piece back exactly where [`Position::remove_piece`] took it from.
    fn restore_piece(&mut self, sq: Square, piece: Piece, slot: u8) {
        debug_assert!(self.is_empty(sq), "restore_piece on occupied {sq}");
        let (c, k) = (piece.color().index(), piece.kind().index());
        self.board[sq.raw() as usize] = Some(piece);
        self.pieces[c][k] ^= sq.bitboard();
        self.sides[c] ^= sq.bitboard();
        let list = &mut self.lists[c][k];
        if let Some(displaced) = list.insert(slot, sq) {
            self.slots[displaced.raw() as usize] = list.len - 1;
        }
        self.slots[sq.raw() as usize] = slot;
        if piece.kind() == PieceKind::King {
            self.kings[c] = sq;
        }
        self.hash ^= zobrist::piece_square(piece, sq);
    }

    /// Relocate the piece on `from` to the empty square `to`.
    fn move_piece(&mut self, from: Square, to: Square) {
        let Some(piece) = self.board[from.raw() as usize].take() else {
            debug_assert!(false, "move_piece from empty {from}");
            return;
        };
        debug_assert!(self.is_empty(to), "move_piece onto occupied {to}");
        self.board[to.raw() as usize] = Some(piece);
        let (c, k) = (piece.color().index(), piece.kind().index());
        let mask = from.bitboard() | to.bitboard();
        self.pieces[c][k] ^= mask;
        self.sides[c] ^= mask;
        let slot = self.slots[from.raw() as usize];
        self.lists[c][k].squares[slot as usize] = to;
        self.slots[to.raw() as usize] = slot;
        if piece.kind() == PieceKind::King {
            self.kings[c] = to;
        }
        self.hash ^= zobrist::piece_square(piece, from) ^ zobrist::piece_square(piece, to);
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::starting()
    }
}

/// Equal placement, state and history. Piece lists compare in order.
impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.board == other.board
            && self.pieces == other.pieces
            && self.sides == other.sides
            && self.lists == other.lists
            && self.kings == other.kings
            && self.side_to_move == other.side_to_move
            && self.castling == other.castling
            && self.en_passant == other.en_passant
            && self.halfmove_clock == other.halfmove_clock
            && self.fullmove_number == other.fullmove_number
            && self.hash == other.hash
            && self.history == other.history
    }
}

impl Eq for Position {}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Position(\"{self}\")")
    }
}

/// Display adapter returned by [`Position::pretty`].
pub struct PrettyPosition<'a>(&'a Position);

impl fmt::Display for PrettyPosition<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8u8).rev() {
            write!(f, "{}  ", rank + 1)?;
            for file in 0..8u8 {
                let c = self.0.piece_on(Square::new(rank, file)).map_or('.', |p| p.fen_char());
                if file < 7 {
                    write!(f, "{c} ")?;
                } else {
                    write!(f, "{c}")?;
                }
            }
            writeln!(f)?;
        }
        write!(f, "   a b c d e f g h")
    }
}
