//! Precomputed board geometry.
//!
//! Everything here is built at compile time by stepping over the 0x88 grid:
//! neighbors, leaper attack sets, sliding rays, between-masks and the
//! classic 0x88 difference table that maps `to - from` to a unit step.

use crate::bitboard::Bitboard;
use crate::color::Color;
use crate::square::Square;

/// One of the eight compass directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Direction {
    North = 0,
    NorthEast = 1,
    East = 2,
    SouthEast = 3,
    South = 4,
    SouthWest = 5,
    West = 6,
    NorthWest = 7,
}

impl Direction {
    pub const COUNT: usize = 8;

    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    pub const ORTHOGONAL: [Direction; 4] =
        [Direction::North, Direction::East, Direction::South, Direction::West];

    pub const DIAGONAL: [Direction; 4] = [
        Direction::NorthEast,
        Direction::SouthEast,
        Direction::SouthWest,
        Direction::NorthWest,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Step on the 0x88 grid.
    #[inline]
    pub const fn delta(self) -> i8 {
        match self {
            Direction::North => 16,
            Direction::NorthEast => 17,
            Direction::East => 1,
            Direction::SouthEast => -15,
            Direction::South => -16,
            Direction::SouthWest => -17,
            Direction::West => -1,
            Direction::NorthWest => 15,
        }
    }

    /// Whether stepping this way increases the compact square index.
    #[inline]
    pub const fn is_positive(self) -> bool {
        self.delta() > 0
    }

    #[inline]
    pub const fn is_diagonal(self) -> bool {
        self.index() % 2 == 1
    }

    const fn from_delta(delta: i8) -> Option<Direction> {
        match delta {
            16 => Some(Direction::North),
            17 => Some(Direction::NorthEast),
            1 => Some(Direction::East),
            -15 => Some(Direction::SouthEast),
            -16 => Some(Direction::South),
            -17 => Some(Direction::SouthWest),
            -1 => Some(Direction::West),
            15 => Some(Direction::NorthWest),
            _ => None,
        }
    }
}

/// Knight jumps on the 0x88 grid.
pub const KNIGHT_DELTAS: [i8; 8] = [33, 31, 18, 14, -14, -18, -31, -33];

const NO_SQUARE: u8 = 0xFF;

static NEIGHBORS: [[u8; Direction::COUNT]; Square::SPAN] = {
    let mut table = [[NO_SQUARE; Direction::COUNT]; Square::SPAN];
    let mut index = 0;
    while index < 64 {
        let sq = Square::from_index_unchecked(index as u8);
        let mut d = 0;
        while d < Direction::COUNT {
            if let Some(to) = sq.offset(Direction::ALL[d].delta()) {
                table[sq.raw() as usize][d] = to.raw();
            }
            d += 1;
        }
        index += 1;
    }
    table
};

/// Adjacent square in `dir`, or `None` at the edge.
#[inline]
pub fn neighbor(sq: Square, dir: Direction) -> Option<Square> {
    Square::from_raw(NEIGHBORS[sq.raw() as usize][dir.index()])
}

const fn leaper_attacks(deltas: &[i8]) -> [Bitboard; 64] {
    let mut table = [Bitboard::EMPTY; 64];
    let mut index = 0;
    while index < 64 {
        let sq = Square::from_index_unchecked(index as u8);
        let mut bits = 0u64;
        let mut i = 0;
        while i < deltas.len() {
            if let Some(to) = sq.offset(deltas[i]) {
                bits |= 1u64 << to.index();
            }
            i += 1;
        }
        table[index] = Bitboard::new(bits);
        index += 1;
    }
    table
}

pub static KNIGHT_ATTACKS: [Bitboard; 64] = leaper_attacks(&KNIGHT_DELTAS);
pub static KING_ATTACKS: [Bitboard; 64] = leaper_attacks(&[16, 17, 1, -15, -16, -17, -1, 15]);

/// Squares a pawn of each color attacks, indexed `[color][square]`.
pub static PAWN_ATTACKS: [[Bitboard; 64]; Color::COUNT] =
    [leaper_attacks(&[15, 17]), leaper_attacks(&[-15, -17])];

/// Sliding rays, indexed `[direction][square]`, excluding the origin.
pub static RAYS: [[Bitboard; 64]; Direction::COUNT] = {
    let mut table = [[Bitboard::EMPTY; 64]; Direction::COUNT];
    let mut d = 0;
    while d < Direction::COUNT {
        let delta = Direction::ALL[d].delta();
        let mut index = 0;
        while index < 64 {
            let mut bits = 0u64;
            let mut cursor = Square::from_index_unchecked(index as u8).offset(delta);
            while let Some(sq) = cursor {
                bits |= 1u64 << sq.index();
                cursor = sq.offset(delta);
            }
            table[d][index] = Bitboard::new(bits);
            index += 1;
        }
        d += 1;
    }
    table
};

/// Squares strictly between two aligned squares, empty otherwise.
pub static BETWEEN: [[Bitboard; 64]; 64] = {
    let mut table = [[Bitboard::EMPTY; 64]; 64];
    let mut from = 0;
    while from < 64 {
        let origin = Square::from_index_unchecked(from as u8);
        let mut d = 0;
        while d < Direction::COUNT {
            let delta = Direction::ALL[d].delta();
            let mut bits = 0u64;
            let mut cursor = origin.offset(delta);
            while let Some(sq) = cursor {
                table[from][sq.index()] = Bitboard::new(bits);
                bits |= 1u64 << sq.index();
                cursor = sq.offset(delta);
            }
            d += 1;
        }
        from += 1;
    }
    table
};

pub static FILE_MASKS: [Bitboard; 8] = {
    let mut table = [Bitboard::EMPTY; 8];
    let mut file = 0;
    while file < 8 {
        table[file] = Bitboard::new(0x0101_0101_0101_0101u64 << file);
        file += 1;
    }
    table
};

pub static RANK_MASKS: [Bitboard; 8] = {
    let mut table = [Bitboard::EMPTY; 8];
    let mut rank = 0;
    while rank < 8 {
        table[rank] = Bitboard::new(0xFFu64 << (rank * 8));
        rank += 1;
    }
    table
};

/// Offset added to `to - from` so the difference indexes [`STEP_BETWEEN`].
const DIFF_OFFSET: i16 = 119;

/// The 0x88 difference table: unit step from `from` toward `to` when the
/// two squares share a rank, file or diagonal, else 0.
static STEP_BETWEEN: [i8; 239] = {
    let mut table = [0i8; 239];
    let mut d = 0;
    while d < Direction::COUNT {
        let delta = Direction::ALL[d].delta();
        let mut distance = 1;
        while distance < 8 {
            let diff = delta as i16 * distance;
            table[(diff + DIFF_OFFSET) as usize] = delta;
            distance += 1;
        }
        d += 1;
    }
    table
};

/// Direction from `from` toward `to` if they are aligned.
#[inline]
pub fn direction_between(from: Square, to: Square) -> Option<Direction> {
    let diff = to.raw() as i16 - from.raw() as i16;
    Direction::from_delta(STEP_BETWEEN[(diff + DIFF_OFFSET) as usize])
}

/// Chebyshev distance between two squares.
#[inline]
pub const fn distance(a: Square, b: Square) -> u8 {
    let df = a.file().abs_diff(b.file());
    let dr = a.rank().abs_diff(b.rank());
    if df > dr { df } else { dr }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbors_at_corners() {
        assert_eq!(neighbor(Square::A1, Direction::North), Some(Square::A2));
        assert_eq!(neighbor(Square::A1, Direction::West), None);
        assert_eq!(neighbor(Square::A1, Direction::SouthEast), None);
        assert_eq!(neighbor(Square::H8, Direction::SouthWest), Some(Square::G7));
        assert_eq!(Direction::ALL.iter().filter(|&&d| neighbor(Square::E4, d).is_some()).count(), 8);
    }

    #[test]
    fn leaper_counts() {
        assert_eq!(KNIGHT_ATTACKS[Square::A1.index()].count(), 2);
        assert_eq!(KNIGHT_ATTACKS[Square::E4.index()].count(), 8);
        assert_eq!(KING_ATTACKS[Square::H8.index()].count(), 3);
        assert_eq!(KING_ATTACKS[Square::D5.index()].count(), 8);
        assert!(PAWN_ATTACKS[Color::White.index()][Square::E4.index()].contains(Square::D5));
        assert!(PAWN_ATTACKS[Color::Black.index()][Square::A5.index()].contains(Square::B4));
        assert_eq!(PAWN_ATTACKS[Color::Black.index()][Square::A5.index()].count(), 1);
    }

    #[test]
    fn rays_stop_at_edge() {
        assert_eq!(RAYS[Direction::North.index()][Square::A1.index()].count(), 7);
        assert_eq!(RAYS[Direction::NorthEast.index()][Square::A1.index()].count(), 7);
        assert!(RAYS[Direction::East.index()][Square::H4.index()].is_empty());
        assert!(RAYS[Direction::SouthWest.index()][Square::D4.index()].contains(Square::A1));
    }

    #[test]
    fn between_masks() {
        assert_eq!(BETWEEN[Square::A1.index()][Square::H8.index()].count(), 6);
        assert_eq!(BETWEEN[Square::E1.index()][Square::E8.index()].count(), 6);
        assert!(BETWEEN[Square::E1.index()][Square::E2.index()].is_empty());
        assert!(BETWEEN[Square::A1.index()][Square::B3.index()].is_empty());
        assert_eq!(BETWEEN[Square::H1.index()][Square::E1.index()].count(), 2);
    }

    #[test]
    fn difference_table() {
        assert_eq!(direction_between(Square::E1, Square::E8), Some(Direction::North));
        assert_eq!(direction_between(Square::H8, Square::A1), Some(Direction::SouthWest));
        assert_eq!(direction_between(Square::H1, Square::A8), Some(Direction::NorthWest));
        assert_eq!(direction_between(Square::B1, Square::C3), None);
        assert_eq!(direction_between(Square::D4, Square::D4), None);
        assert_eq!(direction_between(Square::A2, Square::H2), Some(Direction::East));
    }

    #[test]
    fn file_and_rank_masks() {
        for sq in Square::all() {
            assert!(FILE_MASKS[sq.file() as usize].contains(sq));
            assert!(RANK_MASKS[sq.rank() as usize].contains(sq));
        }
        assert_eq!(distance(Square::A1, Square::H8), 7);
        assert_eq!(distance(Square::E4, Square::F6), 2);
    }
}
