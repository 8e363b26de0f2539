/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use chessie::{Color, File, Piece, PieceKind, Rank};

/// Positional bonus for Pawns.
///
/// Laid out like a [`BoardView`](crate::BoardView): the first row is the 8th rank.
#[rustfmt::skip]
const PAWN: Psqt = Psqt::new(PieceKind::Pawn, [
     0,  0,  0,  0,  0,  0,  0,  0,
    50, 50, 50, 50, 50, 50, 50, 50,
    10, 10, 20, 30, 30, 20, 10, 10,
     5,  5, 10, 25, 25, 10,  5,  5,
     0,  0,  0, 20, 20,  0,  0,  0,
     5, -5,-10,  0,  0,-10, -5,  5,
     5, 10, 10,-20,-20, 10, 10,  5,
     0,  0,  0,  0,  0,  0,  0,  0,
]);

/// Positional bonus for Knights.
///
/// Unlike [`PAWN`], this table is read with the same index for both colors.
#[rustfmt::skip]
const KNIGHT: Psqt = Psqt::new(PieceKind::Knight, [
    -50,-40,-30,-30,-30,-30,-40,-50,
    -40,-20,  0,  0,  0,  0,-20,-40,
    -30,  0, 10, 15, 15, 10,  0,-30,
    -30,  5, 15, 20, 20, 15,  5,-30,
    -30,  0, 15, 20, 20, 15,  0,-30,
    -30,  5, 10, 15, 15, 10,  5,-30,
    -40,-20,  0,  5,  5,  0,-20,-40,
    -50,-40,-30,-30,-30,-30,-40,-50,
]);

/// Number of squares covered by a table.
pub const TABLE_SIZE: usize = 64;

/// A [Piece-Square Table](https://www.chessprogramming.org/Piece-Square_Tables) for use in evaluation.
///
/// Only Pawns and Knights have tables; every other piece is scored by material alone.
#[derive(Debug)]
pub struct Psqt {
    kind: PieceKind,
    values: [i32; TABLE_SIZE],
}

impl Psqt {
    const fn new(kind: PieceKind, values: [i32; TABLE_SIZE]) -> Self {
        Self { kind, values }
    }

    /// Fetch the Piece-Square Table for the provided [`PieceKind`], if it has one.
    #[inline(always)]
    pub fn get_table_for(kind: PieceKind) -> Option<&'static Self> {
        match kind {
            PieceKind::Pawn => Some(&PAWN),
            PieceKind::Knight => Some(&KNIGHT),
            _ => None,
        }
    }

    /// Fetch the positional bonus for `piece` standing at `index` of a [`BoardView`](crate::BoardView),
    /// where `index = row * 8 + col`.
    ///
    /// White Pawns read the table at `63 - index`, Black Pawns at `index`.
    /// Knights of either color read it at `index`.
    #[inline(always)]
    pub fn bonus(piece: Piece, index: usize) -> i32 {
        Self::get_table_for(piece.kind())
            .map(|table| table.get_relative(index, piece.color()))
            .unwrap_or(0)
    }

    /// Get the raw value of this table at `index`.
    #[inline(always)]
    pub const fn get(&self, index: usize) -> i32 {
        self.values[index]
    }

    /// Get the value of this table at `index` for a piece of `color`.
    #[inline(always)]
    pub fn get_relative(&self, index: usize, color: Color) -> i32 {
        match (self.kind, color) {
            (PieceKind::Pawn, Color::White) => self.get(TABLE_SIZE - 1 - index),
            _ => self.get(index),
        }
    }
}

impl fmt::Display for Psqt {
    /// Printing a [`Psqt`] displays the bonus a White piece receives on each square.
    ///
    /// If the alternate formatter is used (`#`), it will print the bonus for a Black piece instead.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let color = if f.alternate() {
            Color::Black
        } else {
            Color::White
        };

        for (row, rank) in Rank::iter().rev().enumerate() {
            write!(f, "{rank}| ")?;
            for col in 0..8 {
                let value = self.get_relative(row * 8 + col, color);
                write!(f, "{value:3} ")?;
            }
            writeln!(f)?;
        }

        write!(f, " +")?;
        for _ in File::iter() {
            write!(f, "----")?;
        }
        write!(f, "\n    ")?;
        for file in File::iter() {
            write!(f, "{file}   ")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pawn_table_mirrors_between_colors() {
        for index in 0..TABLE_SIZE {
            let white = Psqt::bonus(Piece::new(Color::White, PieceKind::Pawn), index);
            let black = Psqt::bonus(Piece::new(Color::Black, PieceKind::Pawn), 63 - index);
            assert_eq!(white, black, "pawn bonus differs at index {index}");
        }
    }

    #[test]
    fn test_knight_table_is_not_mirrored() {
        let white = Piece::new(Color::White, PieceKind::Knight);
        let black = Piece::new(Color::Black, PieceKind::Knight);

        for index in 0..TABLE_SIZE {
            assert_eq!(Psqt::bonus(white, index), Psqt::bonus(black, index));
        }

        // b3 (row 5) and b6 (row 2) are mirror images but score differently.
        assert_eq!(Psqt::bonus(white, 5 * 8 + 1), 5);
        assert_eq!(Psqt::bonus(black, 2 * 8 + 1), 0);
    }

    #[test]
    fn test_only_pawns_and_knights_have_tables() {
        for kind in [
            PieceKind::Bishop,
            PieceKind::Rook,
            PieceKind::Queen,
            PieceKind::King,
        ] {
            assert!(Psqt::get_table_for(kind).is_none());
            for index in 0..TABLE_SIZE {
                assert_eq!(Psqt::bonus(Piece::new(Color::White, kind), index), 0);
            }
        }
    }
}
