/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use chessie::{Color, File, Game, Move, Piece, PieceKind, Rank, Square};

use crate::RulesError;

/// An 8x8 snapshot of the board, row-major.
///
/// Row 0 is the 8th rank and column 0 is the a-file, so `view[7][4]` is e1.
pub type BoardView = [[Option<Piece>; 8]; 8];

/// The collaborator that knows the rules of chess.
///
/// The search only ever enumerates, applies, and reverts moves through this trait.
/// Every [`RulesEngine::make_move`] must be matched by exactly one [`RulesEngine::unmake_move`],
/// and the two must nest properly.
pub trait RulesEngine {
    /// A move in this engine's representation.
    type Move: Copy + Eq + fmt::Debug + fmt::Display;

    /// All legal moves in the current position.
    ///
    /// The order must be deterministic for a given position, since the search breaks ties by it.
    fn legal_moves(&self) -> Vec<Self::Move>;

    /// Applies `mv` to the current position.
    ///
    /// `mv` must be one of [`RulesEngine::legal_moves`]. Implementations may reject anything else,
    /// but are not required to check.
    fn make_move(&mut self, mv: Self::Move) -> Result<(), RulesError>;

    /// Reverts the most recent [`RulesEngine::make_move`].
    fn unmake_move(&mut self) -> Result<(), RulesError>;

    /// A snapshot of the pieces on the board.
    fn board_view(&self) -> BoardView;

    /// The side whose turn it is.
    fn side_to_move(&self) -> Color;

    /// Returns `true` if the side-to-move's King is attacked.
    fn is_in_check(&self) -> bool;

    /// Returns `true` if the half-move clock has reached 100 plies.
    fn is_fifty_move_draw(&self) -> bool;

    /// Returns `true` if the current position has occurred at least three times.
    fn is_threefold_repetition(&self) -> bool;

    /// Returns `true` if the side-to-move is in check and has no legal moves.
    fn is_checkmate(&self) -> bool {
        self.is_in_check() && self.legal_moves().is_empty()
    }

    /// Returns `true` if the side-to-move is not in check but has no legal moves.
    fn is_stalemate(&self) -> bool {
        !self.is_in_check() && self.legal_moves().is_empty()
    }

    /// Returns `true` if neither side can possibly deliver checkmate.
    fn has_insufficient_material(&self) -> bool {
        is_insufficient_material(&self.board_view())
    }

    /// Returns `true` if the game is drawn for any reason.
    fn is_draw(&self) -> bool {
        self.is_fifty_move_draw()
            || self.is_stalemate()
            || self.has_insufficient_material()
            || self.is_threefold_repetition()
    }

    /// Returns `true` if the game has concluded.
    fn is_game_over(&self) -> bool {
        self.is_checkmate() || self.is_draw()
    }
}

/// Returns `true` if the pieces in `view` cannot produce a checkmate.
///
/// That is: lone Kings, a single minor piece, or any number of Bishops that all stand on the same square color.
pub fn is_insufficient_material(view: &BoardView) -> bool {
    let mut minors = 0;
    let mut knights = 0;
    let mut bishop_square_colors = [0; 2];

    for (row, rank) in view.iter().enumerate() {
        for (col, piece) in rank.iter().enumerate() {
            let Some(piece) = piece else {
                continue;
            };

            match piece.kind() {
                PieceKind::King => {}
                PieceKind::Knight => {
                    minors += 1;
                    knights += 1;
                }
                PieceKind::Bishop => {
                    minors += 1;
                    bishop_square_colors[(row + col) % 2] += 1;
                }
                _ => return false,
            }
        }
    }

    match minors {
        0 | 1 => true,
        _ => knights == 0 && (bishop_square_colors[0] == 0 || bishop_square_colors[1] == 0),
    }
}

/// A [`RulesEngine`] backed by a [`chessie::Game`].
///
/// Moves are undone by copy-make: every applied move stores the previous [`Game`] on a stack.
#[derive(Debug, Clone)]
pub struct ChessRules {
    /// The current position.
    game: Game,

    /// Every position before the current one, oldest first.
    history: Vec<Game>,
}

impl ChessRules {
    /// Creates a new [`ChessRules`] on the standard starting position.
    pub fn new() -> Self {
        Self {
            game: Game::default(),
            history: Vec::with_capacity(128),
        }
    }

    /// Creates a new [`ChessRules`] from the provided FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, RulesError> {
        let game = Game::from_fen(fen).map_err(|e| RulesError::InvalidFen {
            fen: fen.to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            game,
            history: Vec::with_capacity(128),
        })
    }

    /// The current position as a FEN string.
    pub fn to_fen(&self) -> String {
        self.game.to_fen()
    }

    /// The underlying [`Game`].
    pub const fn game(&self) -> &Game {
        &self.game
    }

    /// Number of moves applied since this position was set up.
    pub fn ply(&self) -> usize {
        self.history.len()
    }

    /// Fetches the piece at `square`, if there is one.
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.game.piece_at(square)
    }

    /// Parses a move in UCI notation, ensuring it is legal in the current position.
    pub fn parse_move(&self, input: &str) -> Result<Move, RulesError> {
        let mv = Move::from_uci(&self.game, input).map_err(|e| RulesError::InvalidMove {
            input: input.to_string(),
            message: e.to_string(),
        })?;

        if self.is_legal(mv) {
            Ok(mv)
        } else {
            Err(self.illegal(mv))
        }
    }

    fn is_legal(&self, mv: Move) -> bool {
        self.game.get_legal_moves().into_iter().any(|legal| legal == mv)
    }

    fn illegal(&self, mv: Move) -> RulesError {
        RulesError::IllegalMove {
            mv: mv.to_string(),
            fen: self.to_fen(),
        }
    }

    /// The parts of a FEN string that identify a position for repetition purposes:
    /// placement, side to move, castling rights, and en passant square.
    fn repetition_key(game: &Game) -> String {
        game.to_fen()
            .split_ascii_whitespace()
            .take(4)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl RulesEngine for ChessRules {
    type Move = Move;

    #[inline(always)]
    fn legal_moves(&self) -> Vec<Move> {
        self.game.get_legal_moves().into_iter().collect()
    }

    /// Legality is only checked in debug builds. Moves from outside the search go through
    /// [`ChessRules::parse_move`] first.
    fn make_move(&mut self, mv: Move) -> Result<(), RulesError> {
        debug_assert!(self.is_legal(mv), "{}", self.illegal(mv));

        self.history.push(self.game);
        self.game.make_move(mv);
        Ok(())
    }

    fn unmake_move(&mut self) -> Result<(), RulesError> {
        self.game = self.history.pop().ok_or(RulesError::NothingToUndo)?;
        Ok(())
    }

    fn board_view(&self) -> BoardView {
        let mut view = [[None; 8]; 8];

        for (row, rank) in Rank::iter().rev().enumerate() {
            for (col, file) in File::iter().enumerate() {
                view[row][col] = self.game.piece_at(Square::new(file, rank));
            }
        }

        view
    }

    #[inline(always)]
    fn side_to_move(&self) -> Color {
        self.game.side_to_move()
    }

    #[inline(always)]
    fn is_in_check(&self) -> bool {
        self.game.is_in_check()
    }

    #[inline(always)]
    fn is_fifty_move_draw(&self) -> bool {
        self.game.can_draw_by_fifty()
    }

    fn is_threefold_repetition(&self) -> bool {
        let current = Self::repetition_key(&self.game);

        let earlier = self
            .history
            .iter()
            .filter(|game| Self::repetition_key(game) == current)
            .count();

        earlier + 1 >= 3
    }
}

impl Default for ChessRules {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ChessRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.game)
    }
}
