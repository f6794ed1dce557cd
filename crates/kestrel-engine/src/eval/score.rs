//! Packed middlegame/endgame score pair.

use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use super::phase::MAX_PHASE;

/// Middlegame and endgame values packed into one `i32`.
///
/// The middlegame half lives in the upper 16 bits and the endgame half in
/// the lower 16, so addition and subtraction work on the packed word
/// directly. Anything else unpacks, operates per half and repacks.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Score(i32);

impl Score {
    pub const ZERO: Score = Score(0);

    #[inline]
    pub const fn new(mg: i16, eg: i16) -> Score {
        Score(((mg as i32) << 16).wrapping_add(eg as i32))
    }

    /// Middlegame half. The `0x8000` bias undoes the borrow a negative
    /// endgame half leaves in the upper word.
    #[inline]
    pub const fn mg(self) -> i16 {
        (self.0.wrapping_add(0x8000) >> 16) as i16
    }

    #[inline]
    pub const fn eg(self) -> i16 {
        self.0 as i16
    }

    /// Blend the halves by game phase: `MAX_PHASE` is pure middlegame,
    /// zero pure endgame.
    #[inline]
    pub fn taper(self, phase: i32) -> i32 {
        let phase = phase.clamp(0, MAX_PHASE);
        (self.mg() as i32 * phase + self.eg() as i32 * (MAX_PHASE - phase)) / MAX_PHASE
    }
}

/// Shorthand for [`Score::new`], the usual notation in evaluation tables.
#[allow(non_snake_case)]
#[inline]
pub const fn S(mg: i16, eg: i16) -> Score {
    Score::new(mg, eg)
}

impl Add for Score {
    type Output = Score;

    #[inline]
    fn add(self, rhs: Score) -> Score {
        Score(self.0.wrapping_add(rhs.0))
    }
}

impl AddAssign for Score {
    #[inline]
    fn add_assign(&mut self, rhs: Score) {
        *self = *self + rhs;
    }
}

impl Sub for Score {
    type Output = Score;

    #[inline]
    fn sub(self, rhs: Score) -> Score {
        Score(self.0.wrapping_sub(rhs.0))
    }
}

impl SubAssign for Score {
    #[inline]
    fn sub_assign(&mut self, rhs: Score) {
        *self = *self - rhs;
    }
}

impl Neg for Score {
    type Output = Score;

    #[inline]
    fn neg(self) -> Score {
        Score::new(-self.mg(), -self.eg())
    }
}

impl Mul<i16> for Score {
    type Output = Score;

    #[inline]
    fn mul(self, rhs: i16) -> Score {
        Score::new(self.mg() * rhs, self.eg() * rhs)
    }
}

impl fmt::Debug for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S({}, {})", self.mg(), self.eg())
    }
}
