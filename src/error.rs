/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::{MAX_DIFFICULTY, MIN_DIFFICULTY};

/// Errors reported by a [`RulesEngine`](crate::RulesEngine).
#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    /// A move was applied that is not legal in the current position.
    #[error("Illegal move {mv:?} in position {fen:?}")]
    IllegalMove { mv: String, fen: String },

    /// A move string could not be understood at all.
    #[error("Invalid move string {input:?}: {message}")]
    InvalidMove { input: String, message: String },

    /// A FEN string could not be parsed.
    #[error("Invalid FEN {fen:?}: {message}")]
    InvalidFen { fen: String, message: String },

    /// An undo was requested with no moves left to take back.
    #[error("No moves to undo")]
    NothingToUndo,
}

/// Errors reported by the search.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The requested depth is outside of the supported range.
    #[error("Depth must be within [{min}, {max}], got {depth}", min = MIN_DIFFICULTY, max = MAX_DIFFICULTY)]
    InvalidDepth { depth: usize },

    /// The rules engine refused a move it generated itself.
    ///
    /// This indicates a broken rules engine, not a recoverable condition.
    #[error("Rules engine rejected one of its own legal moves: {0}")]
    IllegalMove(#[source] RulesError),

    /// The rules engine could not revert a move the search applied.
    #[error("Rules engine failed to undo a move applied during search: {0}")]
    UnmatchedUndo(#[source] RulesError),
}

/// Errors reported by a [`Session`](crate::Session).
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// A move was requested after the game has concluded.
    #[error("The game is over: {status}")]
    GameOver { status: String },

    /// A takeback was requested with fewer than two moves played.
    #[error("Need at least 2 played moves to take back, have {played}")]
    NotEnoughHistory { played: usize },

    #[error(transparent)]
    Rules(#[from] RulesError),

    #[error(transparent)]
    Search(#[from] SearchError),
}

/// Result type alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
