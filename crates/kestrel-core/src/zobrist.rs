//! Zobrist keys.
//!
//! One key per (piece, square), one for Black to move, one per castling
//! right and one per en-passant file. The position XORs keys in and out as
//! it changes; [`Position::compute_hash`](crate::Position::compute_hash)
//! folds them from scratch.

use crate::castle_rights::CastleRights;
use crate::color::Color;
use crate::piece::Piece;
use crate::square::Square;

pub(crate) struct Keys {
    pub piece_square: [[u64; 64]; Piece::COUNT],
    pub black_to_move: u64,
    pub castling: [u64; CastleRights::COUNT],
    pub en_passant_file: [u64; 8],
}

const SEED: u64 = 0x6b65_7374_7265_6c21;

/// SplitMix64 step: returns (output, next state).
const fn splitmix64(state: u64) -> (u64, u64) {
    let next = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = next;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    (z ^ (z >> 31), next)
}

pub(crate) static KEYS: Keys = {
    let mut state = SEED;
    let mut piece_square = [[0u64; 64]; Piece::COUNT];
    let mut piece = 0;
    while piece < Piece::COUNT {
        let mut sq = 0;
        while sq < 64 {
            let (key, next) = splitmix64(state);
            piece_square[piece][sq] = key;
            state = next;
            sq += 1;
        }
        piece += 1;
    }

    let (black_to_move, next) = splitmix64(state);
    state = next;

    let mut castling = [0u64; CastleRights::COUNT];
    let mut i = 0;
    while i < CastleRights::COUNT {
        let (key, next) = splitmix64(state);
        castling[i] = key;
        state = next;
        i += 1;
    }

    let mut en_passant_file = [0u64; 8];
    let mut file = 0;
    while file < 8 {
        let (key, next) = splitmix64(state);
        en_passant_file[file] = key;
        state = next;
        file += 1;
    }

    Keys { piece_square, black_to_move, castling, en_passant_file }
};

#[inline]
pub(crate) fn piece_square(piece: Piece, sq: Square) -> u64 {
    KEYS.piece_square[piece.index()][sq.index()]
}

#[inline]
pub(crate) fn side(color: Color) -> u64 {
    match color {
        Color::White => 0,
        Color::Black => KEYS.black_to_move,
    }
}

/// XOR of the keys of every right in `rights`.
#[inline]
pub(crate) fn castling(rights: CastleRights) -> u64 {
    rights.indices().fold(0, |acc, i| acc ^ KEYS.castling[i])
}

#[inline]
pub(crate) fn en_passant(target: Option<Square>) -> u64 {
    match target {
        Some(sq) => KEYS.en_passant_file[sq.file() as usize],
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::KEYS;

    #[test]
    fn keys_are_distinct_and_nonzero() {
        let mut all: Vec<u64> = KEYS.piece_square.iter().flatten().copied().collect();
        all.push(KEYS.black_to_move);
        all.extend(KEYS.castling);
        all.extend(KEYS.en_passant_file);
        let total = all.len();
        assert!(all.iter().all(|&k| k != 0));
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), total);
    }
}
