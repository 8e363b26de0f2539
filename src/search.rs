/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use uci_parser::UciSearchOptions;

use crate::{
    evaluate, RulesEngine, Score, SearchError, DEFAULT_DIFFICULTY, MAX_DIFFICULTY, MIN_DIFFICULTY,
};

/// Depth of a search, in plies.
///
/// Always within [`MIN_DIFFICULTY`] and [`MAX_DIFFICULTY`]; the cost of a search grows exponentially with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Difficulty(usize);

impl Difficulty {
    /// Validates `depth`, returning an error if it is outside of the supported range.
    pub fn new(depth: usize) -> Result<Self, SearchError> {
        if (MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&depth) {
            Ok(Self(depth))
        } else {
            Err(SearchError::InvalidDepth { depth })
        }
    }

    /// Number of plies to search.
    #[inline(always)]
    pub const fn depth(&self) -> usize {
        self.0
    }
}

impl Default for Difficulty {
    #[inline(always)]
    fn default() -> Self {
        Self(DEFAULT_DIFFICULTY)
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Configuration variables for executing a [`Search`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchConfig {
    /// Depth to execute the search at.
    pub depth: Difficulty,
}

impl SearchConfig {
    /// Constructs a new [`SearchConfig`] from the provided UCI options.
    ///
    /// If no depth was supplied, `fallback` is used.
    /// Time and node limits are ignored, since the search always runs to completion.
    pub fn new(options: UciSearchOptions, fallback: Difficulty) -> Result<Self, SearchError> {
        let depth = match options.depth {
            Some(depth) => Difficulty::new(depth as usize)?,
            None => fallback,
        };

        Ok(Self { depth })
    }
}

/// The result of a search, containing the best move found, score, and total nodes searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult<M> {
    /// Number of nodes searched.
    pub nodes: u64,

    /// Best move found during the search.
    pub bestmove: Option<M>,

    /// Score of `bestmove`.
    pub score: Score,
}

impl<M> Default for SearchResult<M> {
    /// A default search result starts at the maximizing sentinel, without a move.
    ///
    /// A root move must score at least this much to be selected.
    #[inline(always)]
    fn default() -> Self {
        Self {
            nodes: 0,
            bestmove: None,
            score: -Score::SENTINEL,
        }
    }
}

/// Executes a fixed-depth [minimax](https://www.chessprogramming.org/Minimax) search
/// with [alpha-beta pruning](https://www.chessprogramming.org/Alpha-Beta) on a borrowed position.
///
/// The position is mutated while searching, but every applied move is reverted before any method returns.
pub struct Search<'a, R: RulesEngine> {
    /// The position to search on.
    rules: &'a mut R,

    /// Number of nodes visited so far.
    nodes: u64,
}

impl<'a, R: RulesEngine> Search<'a, R> {
    /// Construct a new [`Search`] instance to execute on the provided position.
    #[inline(always)]
    pub fn new(rules: &'a mut R) -> Self {
        Self { rules, nodes: 0 }
    }

    /// Number of nodes visited so far.
    #[inline(always)]
    pub const fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Start the search with the provided config.
    pub fn start(mut self, config: SearchConfig) -> Result<SearchResult<R::Move>, SearchError> {
        let res = self.select_move(config.depth.depth())?;

        tracing::debug!(
            depth = config.depth.depth(),
            nodes = res.nodes,
            score = res.score.inner(),
            bestmove = ?res.bestmove,
            "search finished"
        );

        if res.score.is_beyond_sentinel() {
            tracing::warn!(score = res.score.inner(), "root score outside of sentinel range");
        }

        Ok(res)
    }

    /// Scores every root move and returns the best one.
    ///
    /// Each root move is searched to `depth - 1` with the full root window.
    /// A move replaces the current best if its score is greater than *or equal to* the best score,
    /// so among equal scores the move enumerated last wins.
    ///
    /// If there are no legal moves, no move is returned.
    pub fn select_move(&mut self, depth: usize) -> Result<SearchResult<R::Move>, SearchError> {
        let depth = Difficulty::new(depth)?.depth();
        let mut res = SearchResult::default();

        for mv in self.rules.legal_moves() {
            let score = self.with_move(mv, |search| {
                search.search(depth - 1, -Score::ROOT_WINDOW, Score::ROOT_WINDOW, false)
            })?;

            if score >= res.score {
                res.score = score;
                res.bestmove = Some(mv);
            }
        }

        res.nodes = self.nodes;
        Ok(res)
    }

    /// Primary location of search logic.
    ///
    /// At depth 0, returns the *negated* evaluation of the position.
    /// Otherwise, alternates between maximizing and minimizing over the children,
    /// returning as soon as `beta <= alpha`.
    ///
    /// A node without legal moves returns its starting sentinel; there is no special
    /// score for checkmate or stalemate.
    pub fn search(
        &mut self,
        depth: usize,
        mut alpha: Score,
        mut beta: Score,
        maximizing: bool,
    ) -> Result<Score, SearchError> {
        self.nodes += 1;

        if depth == 0 {
            return Ok(-evaluate(&self.rules.board_view()));
        }

        let moves = self.rules.legal_moves();

        if maximizing {
            let mut best = -Score::SENTINEL;

            for mv in moves {
                let score =
                    self.with_move(mv, |search| search.search(depth - 1, alpha, beta, false))?;

                best = best.max(score);
                alpha = alpha.max(best);
                if beta <= alpha {
                    return Ok(best);
                }
            }

            Ok(best)
        } else {
            let mut best = Score::SENTINEL;

            for mv in moves {
                let score =
                    self.with_move(mv, |search| search.search(depth - 1, alpha, beta, true))?;

                best = best.min(score);
                beta = beta.min(best);
                if beta <= alpha {
                    return Ok(best);
                }
            }

            Ok(best)
        }
    }

    /// Applies `mv`, runs `f`, and reverts `mv` again, regardless of what `f` returned.
    fn with_move<T>(
        &mut self,
        mv: R::Move,
        f: impl FnOnce(&mut Self) -> Result<T, SearchError>,
    ) -> Result<T, SearchError> {
        self.rules.make_move(mv).map_err(SearchError::IllegalMove)?;
        let res = f(self);
        self.rules.unmake_move().map_err(SearchError::UnmatchedUndo)?;
        res
    }
}

/// Convenience wrapper to select a move on `rules` at `depth`.
pub fn select_move<R: RulesEngine>(
    rules: &mut R,
    depth: usize,
) -> Result<Option<R::Move>, SearchError> {
    Ok(Search::new(rules).select_move(depth)?.bestmove)
}
