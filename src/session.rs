/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use chessie::{Color, Move};

use crate::{
    material_of, ChessRules, Difficulty, RulesEngine, Search, SearchConfig, SearchResult,
    SessionError, SessionResult,
};

/// The state of a game, as seen by whoever is about to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStatus {
    /// The game continues and the side-to-move is not in check.
    InProgress,

    /// The game continues, but the side-to-move is in check.
    Check,

    /// The side-to-move has been checkmated.
    Checkmate { winner: Color },

    /// The side-to-move has no legal moves but is not in check.
    Stalemate,

    /// The same position has occurred three times.
    ThreefoldRepetition,

    /// Neither side has enough material to deliver checkmate.
    InsufficientMaterial,

    /// 50 full moves have passed without a capture or Pawn move.
    FiftyMoveRule,
}

impl GameStatus {
    /// Classifies the current position of `rules`.
    ///
    /// Checkmate takes precedence over every draw, and every draw over check.
    pub fn of<R: RulesEngine>(rules: &R) -> Self {
        if rules.is_checkmate() {
            Self::Checkmate {
                winner: rules.side_to_move().opponent(),
            }
        } else if rules.is_stalemate() {
            Self::Stalemate
        } else if rules.is_threefold_repetition() {
            Self::ThreefoldRepetition
        } else if rules.has_insufficient_material() {
            Self::InsufficientMaterial
        } else if rules.is_fifty_move_draw() {
            Self::FiftyMoveRule
        } else if rules.is_in_check() {
            Self::Check
        } else {
            Self::InProgress
        }
    }

    /// Returns `true` if no more moves may be played.
    #[inline(always)]
    pub const fn is_over(&self) -> bool {
        !matches!(self, Self::InProgress | Self::Check)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InProgress => write!(f, "in progress"),
            Self::Check => write!(f, "check"),
            Self::Checkmate { winner } => write!(f, "checkmate, {} wins", winner.name()),
            Self::Stalemate => write!(f, "draw by stalemate"),
            Self::ThreefoldRepetition => write!(f, "draw by threefold repetition"),
            Self::InsufficientMaterial => write!(f, "draw by insufficient material"),
            Self::FiftyMoveRule => write!(f, "draw by the fifty-move rule"),
        }
    }
}

/// A game between a human and the engine.
///
/// Holds everything the game loop needs between moves: the position, the engine's strength, which side it plays,
/// and the moves played so far.
#[derive(Debug, Clone)]
pub struct Session {
    /// The current position and its history.
    rules: ChessRules,

    /// Depth the engine searches at when asked to reply.
    difficulty: Difficulty,

    /// The side the engine plays.
    engine_color: Color,

    /// Every move played since the position was set up, in order.
    moves: Vec<Move>,
}

impl Session {
    /// Starts a new session on the standard starting position, with the engine playing Black.
    pub fn new() -> Self {
        Self {
            rules: ChessRules::new(),
            difficulty: Difficulty::default(),
            engine_color: Color::Black,
            moves: Vec::new(),
        }
    }

    /// The current position.
    #[inline(always)]
    pub const fn rules(&self) -> &ChessRules {
        &self.rules
    }

    /// Depth the engine replies at.
    #[inline(always)]
    pub const fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Changes the depth the engine replies at.
    pub fn set_difficulty(&mut self, depth: usize) -> SessionResult<()> {
        self.difficulty = Difficulty::new(depth)?;
        tracing::info!(difficulty = depth, "difficulty changed");
        Ok(())
    }

    /// The side the engine plays.
    #[inline(always)]
    pub const fn engine_color(&self) -> Color {
        self.engine_color
    }

    /// Changes the side the engine plays.
    pub fn set_engine_color(&mut self, color: Color) {
        self.engine_color = color;
    }

    /// Returns `true` if it is the engine's turn to move.
    #[inline(always)]
    pub fn is_engine_turn(&self) -> bool {
        self.rules.side_to_move() == self.engine_color
    }

    /// Moves played since the position was set up.
    #[inline(always)]
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// Number of full moves played, counting an unanswered move as a full move.
    #[inline(always)]
    pub fn full_moves(&self) -> usize {
        self.moves.len().div_ceil(2)
    }

    /// Classifies the current position.
    #[inline(always)]
    pub fn status(&self) -> GameStatus {
        GameStatus::of(&self.rules)
    }

    /// Material of `color`, in whole pawns.
    pub fn material(&self, color: Color) -> i32 {
        material_of(&self.rules.board_view(), color)
    }

    /// Resets the position to the standard starting position.
    ///
    /// The difficulty and the engine's color are kept.
    pub fn new_game(&mut self) {
        self.rules = ChessRules::new();
        self.moves.clear();
        tracing::info!("new game");
    }

    /// Set the position to the supplied FEN string (defaults to the standard startpos if not supplied),
    /// and then apply `moves` one-by-one to the position.
    ///
    /// If anything fails to parse or apply, the session is left untouched.
    pub fn set_position<T: AsRef<str>>(
        &mut self,
        fen: Option<T>,
        moves: impl IntoIterator<Item = T>,
    ) -> SessionResult<()> {
        let mut rules = match fen {
            Some(fen) => ChessRules::from_fen(fen.as_ref())?,
            None => ChessRules::new(),
        };

        let mut played = Vec::new();
        for mv_str in moves {
            let mv = rules.parse_move(mv_str.as_ref())?;
            rules.make_move(mv)?;
            played.push(mv);
        }

        self.rules = rules;
        self.moves = played;
        Ok(())
    }

    /// Plays a move given in UCI notation.
    pub fn play(&mut self, input: &str) -> SessionResult<Move> {
        self.ensure_not_over()?;

        let mv = self.rules.parse_move(input)?;
        self.rules.make_move(mv)?;
        self.moves.push(mv);

        tracing::info!(%mv, "move played");
        Ok(mv)
    }

    /// Searches the current position without playing anything.
    pub fn think(&mut self, config: SearchConfig) -> SessionResult<SearchResult<Move>> {
        Ok(Search::new(&mut self.rules).start(config)?)
    }

    /// Lets the engine choose and play a move at the session's difficulty.
    ///
    /// Returns `None` without searching if the game is already over.
    pub fn engine_move(&mut self) -> SessionResult<Option<Move>> {
        if self.status().is_over() {
            return Ok(None);
        }

        let config = SearchConfig {
            depth: self.difficulty,
        };
        let res = self.think(config)?;

        if let Some(mv) = res.bestmove {
            self.rules.make_move(mv)?;
            self.moves.push(mv);
            tracing::info!(%mv, score = res.score.inner(), nodes = res.nodes, "engine played");
        } else {
            tracing::warn!(score = res.score.inner(), "engine found no move to play");
        }

        Ok(res.bestmove)
    }

    /// Takes back the last two moves: the engine's reply and the move before it.
    ///
    /// Not allowed once the game has ended in checkmate.
    pub fn takeback(&mut self) -> SessionResult<()> {
        if let status @ GameStatus::Checkmate { .. } = self.status() {
            return Err(SessionError::GameOver {
                status: status.to_string(),
            });
        }

        if self.moves.len() < 2 {
            return Err(SessionError::NotEnoughHistory {
                played: self.moves.len(),
            });
        }

        for _ in 0..2 {
            self.rules.unmake_move()?;
            self.moves.pop();
        }

        tracing::info!(remaining = self.moves.len(), "took back two moves");
        Ok(())
    }

    fn ensure_not_over(&self) -> SessionResult<()> {
        let status = self.status();
        if status.is_over() {
            Err(SessionError::GameOver {
                status: status.to_string(),
            })
        } else {
            Ok(())
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
