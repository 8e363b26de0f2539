/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use chessie::{Color, File, Piece, PieceKind, Rank};

use crate::{BoardView, Psqt, Score};

/// Encapsulates the logic of scoring a chess position.
///
/// Scores are always from White's perspective: a high score is good for White, and a low score is good for Black.
/// The evaluator does not look at whose turn it is.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'a> {
    /// The board whose pieces to evaluate.
    view: &'a BoardView,
}

impl<'a> Evaluator<'a> {
    /// Construct a new [`Evaluator`] over the provided [`BoardView`].
    #[inline(always)]
    pub fn new(view: &'a BoardView) -> Self {
        Self { view }
    }

    /// Evaluate this position from White's perspective.
    ///
    /// Every piece contributes its material value plus its positional bonus,
    /// positive for White and negative for Black.
    #[inline(always)]
    pub fn eval(self) -> Score {
        let mut score = Score::DRAW;

        for (row, rank) in self.view.iter().enumerate() {
            for (col, piece) in rank.iter().enumerate() {
                if let Some(piece) = piece {
                    score += contribution_of(*piece, row * 8 + col);
                }
            }
        }

        score
    }
}

/// Shorthand for `Evaluator::new(view).eval()`.
#[inline(always)]
pub fn evaluate(view: &BoardView) -> Score {
    Evaluator::new(view).eval()
}

/// Signed contribution of `piece` standing at `index` of a [`BoardView`].
#[inline(always)]
fn contribution_of(piece: Piece, index: usize) -> i32 {
    let value = value_of(piece.kind()) + Psqt::bonus(piece, index);

    match piece.color() {
        Color::White => value,
        Color::Black => -value,
    }
}

/// Returns the material value of the provided `PieceKind`.
///
/// Values are obtained from here: <https://www.chessprogramming.org/Simplified_Evaluation_Function>
#[inline(always)]
pub const fn value_of(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => 100,
        PieceKind::Knight => 320,
        PieceKind::Bishop => 330,
        PieceKind::Rook => 500,
        PieceKind::Queen => 900,
        PieceKind::King => 20_000,
    }
}

/// Total material of `color` in whole pawns, rounded down.
///
/// The King counts too, so a side with only a King still has 200.
pub fn material_of(view: &BoardView, color: Color) -> i32 {
    let total: i32 = view
        .iter()
        .flatten()
        .flatten()
        .filter(|piece| piece.color() == color)
        .map(|piece| value_of(piece.kind()))
        .sum();

    total.div_euclid(100)
}

impl fmt::Display for Evaluator<'_> {
    /// Prints the board with the signed contribution of every piece beneath it.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  +")?;
        for _ in File::iter() {
            write!(f, "-------+")?;
        }
        writeln!(f)?;

        for (row, rank) in Rank::iter().rev().enumerate() {
            write!(f, "{rank} |")?;

            // Step 1: Write the piece char
            for piece in &self.view[row] {
                let piece_char = piece.map(|p| p.char()).unwrap_or(' ');
                write!(f, "   {piece_char}   |")?;
            }
            writeln!(f)?;
            write!(f, "  |")?;

            // Step 2: Write the contribution of that piece
            for (col, piece) in self.view[row].iter().enumerate() {
                let cell = match piece {
                    Some(piece) => {
                        let val = contribution_of(*piece, row * 8 + col);
                        let s = if val > 0 {
                            format!("+{val}")
                        } else {
                            format!("{val}")
                        };
                        format!("{s:^7}")
                    }
                    None => String::from("       "),
                };
                write!(f, "{cell}|")?;
            }
            writeln!(f)?;

            write!(f, "  +")?;
            for _ in File::iter() {
                write!(f, "-------+")?;
            }
            writeln!(f)?;
        }
        for file in File::iter() {
            write!(f, "       {file}")?;
        }

        let score = self.eval();
        let winning_side = if score > Score::DRAW {
            Some(Color::White)
        } else if score < Score::DRAW {
            Some(Color::Black)
        } else {
            None
        };

        writeln!(f)?;
        writeln!(
            f,
            "\nWinning side: {}",
            winning_side.map(|c| c.name()).unwrap_or("N/A")
        )?;
        write!(f, "Score: {score}")
    }
}
