/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use tadpole::{evaluate, ChessRules, RulesEngine, Score, BENCHMARK_FENS};

#[test]
fn test_startpos_is_balanced() {
    assert_eq!(evaluate(&ChessRules::new().board_view()), Score::DRAW);
}

#[test]
fn test_extra_pawn_is_worth_100() {
    // Extra White Pawn on h5, where the Pawn table is zero.
    let rules =
        ChessRules::from_fen("rnbqkbnr/pppppppp/8/7P/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap();
    assert_eq!(evaluate(&rules.board_view()), Score(100));
}

#[test]
fn test_apply_then_undo_restores_every_position() {
    for fen in BENCHMARK_FENS {
        let mut rules = ChessRules::from_fen(fen).unwrap();
        let fen = rules.to_fen();
        let view = rules.board_view();
        let moves = rules.legal_moves();

        for mv in moves.iter().copied() {
            rules.make_move(mv).unwrap();
            rules.unmake_move().unwrap();

            assert_eq!(rules.to_fen(), fen, "after {mv}");
            assert_eq!(rules.board_view(), view, "after {mv}");
            assert_eq!(rules.legal_moves(), moves, "after {mv}");
        }
    }
}
