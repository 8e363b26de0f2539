/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Commands accepted by the engine, outside of the UCI protocol.
mod cli;

/// Code related to the engine's functionality, such as user input handling.
mod engine;

/// Errors produced by the rules adapter, the search, and the game session.
mod error;

/// Evaluation of chess positions.
mod eval;

/// Piece-Square tables for Pawns and Knights.
mod psqt;

/// Adapter between the search and a legal move generator.
mod rules;

/// Types for representing the score of a position.
mod score;

/// Main engine logic; all search related code.
mod search;

/// A game played against the engine.
mod session;

/// Misc utility functions, constants, and types.
mod utils;

pub use cli::*;
pub use engine::*;
pub use error::*;
pub use eval::*;
pub use psqt::*;
pub use rules::*;
pub use score::*;
pub use search::*;
pub use session::*;
pub use utils::*;
