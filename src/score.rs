/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use uci_parser::UciScore;

/// Evaluation of a position in [centipawns](https://www.chessprogramming.org/Centipawns).
///
/// Positive scores favor White when produced by the evaluator.
/// The search negates leaf evaluations, so a root score is positive when it favors the side that just moved into the leaf.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Score(pub i32);

impl Score {
    /// Score of an even position.
    pub const DRAW: Self = Self(0);

    /// Initial "best" value of a search node.
    ///
    /// Maximizing nodes start at `-SENTINEL`, minimizing nodes at `SENTINEL`.
    /// A node without legal moves returns its sentinel untouched.
    ///
    /// Note that this is smaller than the material value of a King, so a position
    /// missing a King can evaluate outside of `[-SENTINEL, SENTINEL]`.
    pub const SENTINEL: Self = Self(9999);

    /// Half-width of the window every root move is searched with.
    pub const ROOT_WINDOW: Self = Self(10_000);

    /// Returns the inner value of this score.
    #[inline(always)]
    pub const fn inner(&self) -> i32 {
        self.0
    }

    /// Returns `true` if this score lies outside of the sentinel range.
    ///
    /// Such scores can only be reached by positions that are missing a King.
    #[inline(always)]
    pub const fn is_beyond_sentinel(&self) -> bool {
        self.0.abs() > Self::SENTINEL.0
    }

    /// Converts this [`Score`] into a centipawn [`UciScore`] for `info score`.
    #[inline(always)]
    pub fn into_uci(self) -> UciScore {
        UciScore::cp(self.0)
    }
}

impl std::ops::AddAssign<i32> for Score {
    #[inline(always)]
    fn add_assign(&mut self, centipawns: i32) {
        self.0 += centipawns;
    }
}

impl std::ops::Neg for Score {
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_is_inside_root_window() {
        assert!(Score::SENTINEL < Score::ROOT_WINDOW);
        assert!(-Score::ROOT_WINDOW < -Score::SENTINEL);
    }

    #[test]
    fn test_beyond_sentinel() {
        assert!(!Score::SENTINEL.is_beyond_sentinel());
        assert!(!(-Score::SENTINEL).is_beyond_sentinel());
        assert!(Score(20_000).is_beyond_sentinel());
        assert!(Score(-10_000).is_beyond_sentinel());
    }
}
