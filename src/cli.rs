/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::str::FromStr;

use chessie::{Color, PieceKind};
use clap::{builder::PossibleValue, Parser, ValueEnum};
use uci_parser::UciCommand;

/// A command to be sent to the engine.
#[derive(Debug, Clone, Parser)]
#[command(
    multicall = true,
    about,
    rename_all = "lower",
    override_usage("<ENGINE COMMAND> | <UCI COMMAND>")
)]
pub enum EngineCommand {
    /// Run a benchmark with the provided parameters.
    Bench {
        /// If set, the benchmarking results will be printed in a well-formatted table.
        #[arg(short, long, default_value = "false")]
        pretty: bool,

        /// Override the default benchmark depth.
        #[arg(short, long, required = false)]
        depth: Option<usize>,
    },

    /// Change the engine's search depth [1-5], or display the current one.
    #[command(alias = "level")]
    Difficulty { depth: Option<usize> },

    /// Print a visual representation of the current board state.
    #[command(alias = "d")]
    Display,

    /// Print an evaluation of the current position, from White's perspective.
    Eval {
        /// If set, the contribution of every piece will be printed as well.
        #[arg(short, long, default_value = "false")]
        pretty: bool,
    },

    /// Quit the engine.
    Exit,

    /// Generate and print a FEN string for the current position.
    Fen,

    /// Shows all legal moves in the current position, in the order the search visits them.
    Moves,

    /// Play the provided move (in UCI notation) for the side to move.
    ///
    /// If it then becomes the engine's turn, the engine replies immediately.
    #[command(alias = "move")]
    Play { mv_string: String },

    /// Print the Piece-Square table of the provided piece, from White's perspective.
    #[command(aliases = ["psq", "pst"])]
    Psqt {
        /// The piece whose table to print.
        piece: TableKind,

        /// If set, print the table from Black's perspective instead.
        #[arg(short, long, default_value = "false")]
        black: bool,
    },

    /// Have the engine choose and play a move for the side to move.
    Reply,

    /// Change the side the engine plays, or display the current one.
    Side { color: Option<Side> },

    /// Print the state of the game, material, and number of moves played.
    Status,

    /// Take back the last two moves.
    #[command(alias = "undo")]
    Takeback,

    /// Wrapper over UCI commands sent to the engine.
    #[command(skip)]
    Uci { cmd: UciCommand },
}

impl FromStr for EngineCommand {
    type Err = clap::Error;
    /// Attempt to parse an [`EngineCommand`] from a string.
    ///
    /// If this fails, it will attempt to parse the string as a [`UciCommand`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Self::try_parse_from(s.split_ascii_whitespace()) {
            Ok(cmd) => Ok(cmd),
            Err(e) => {
                // If parsing failed, attempt to parse as a UciCommand
                if let Ok(cmd) = UciCommand::new(s) {
                    Ok(Self::Uci { cmd })
                } else {
                    Err(e)
                }
            }
        }
    }
}

/// A piece that has a Piece-Square table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Pawn,
    Knight,
}

impl From<TableKind> for PieceKind {
    fn from(kind: TableKind) -> Self {
        match kind {
            TableKind::Pawn => PieceKind::Pawn,
            TableKind::Knight => PieceKind::Knight,
        }
    }
}

impl ValueEnum for TableKind {
    fn value_variants<'a>() -> &'a [Self] {
        &[TableKind::Pawn, TableKind::Knight]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        let value = match self {
            TableKind::Pawn => PossibleValue::new("pawn").aliases(["p", "P"]),
            TableKind::Knight => PossibleValue::new("knight").aliases(["n", "N"]),
        };

        Some(value)
    }
}

/// One of the two sides, as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    White,
    Black,
}

impl From<Side> for Color {
    fn from(side: Side) -> Self {
        match side {
            Side::White => Color::White,
            Side::Black => Color::Black,
        }
    }
}

impl ValueEnum for Side {
    fn value_variants<'a>() -> &'a [Self] {
        &[Side::White, Side::Black]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        let value = match self {
            Side::White => PossibleValue::new("white").alias("w"),
            Side::Black => PossibleValue::new("black").alias("b"),
        };

        Some(value)
    }
}
