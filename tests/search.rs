/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use chessie::{Color, Piece, PieceKind};
use tadpole::{evaluate, select_move, BoardView, ChessRules, RulesEngine, RulesError, Score, Search};

/// Plain minimax over the same leaf scores and sentinels, without any pruning.
fn minimax<R: RulesEngine>(
    rules: &mut R,
    depth: usize,
    maximizing: bool,
    nodes: &mut u64,
) -> Score {
    *nodes += 1;

    if depth == 0 {
        return -evaluate(&rules.board_view());
    }

    let mut best = if maximizing {
        -Score::SENTINEL
    } else {
        Score::SENTINEL
    };

    for mv in rules.legal_moves() {
        rules.make_move(mv).unwrap();
        let score = minimax(rules, depth - 1, !maximizing, nodes);
        rules.unmake_move().unwrap();

        best = if maximizing {
            best.max(score)
        } else {
            best.min(score)
        };
    }

    best
}

/// Root selection over [`minimax`], breaking ties in favor of the last move.
fn minimax_root<R: RulesEngine>(rules: &mut R, depth: usize) -> (Option<R::Move>, Score, u64) {
    let mut nodes = 0;
    let mut best = -Score::SENTINEL;
    let mut bestmove = None;

    for mv in rules.legal_moves() {
        rules.make_move(mv).unwrap();
        let score = minimax(rules, depth - 1, false, &mut nodes);
        rules.unmake_move().unwrap();

        if score >= best {
            best = score;
            bestmove = Some(mv);
        }
    }

    (bestmove, best, nodes)
}

const POSITIONS: [&str; 4] = [
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "rnbqkbnr/pppp1ppp/8/4p3/6P1/5P2/PPPPP2P/RNBQKBNR b KQkq g3 0 2",
];

#[test]
fn test_pruning_matches_plain_minimax() {
    for fen in POSITIONS {
        for depth in 1..=3 {
            let mut rules = ChessRules::from_fen(fen).unwrap();
            let before = rules.to_fen();

            let (expected_move, expected_score, minimax_nodes) = minimax_root(&mut rules, depth);
            let res = Search::new(&mut rules).select_move(depth).unwrap();

            assert_eq!(res.bestmove, expected_move, "{fen} at depth {depth}");
            assert_eq!(res.score, expected_score, "{fen} at depth {depth}");
            assert!(res.nodes <= minimax_nodes, "{fen} at depth {depth}");
            assert_eq!(rules.to_fen(), before);
        }
    }
}

#[test]
fn test_search_is_deterministic() {
    for fen in POSITIONS {
        let mut rules = ChessRules::from_fen(fen).unwrap();

        let first = Search::new(&mut rules).select_move(3).unwrap();
        let second = Search::new(&mut rules).select_move(3).unwrap();

        assert_eq!(first, second, "{fen}");
    }
}

#[test]
fn test_opening_move_is_legal() {
    let mut rules = ChessRules::new();
    let legal = rules.legal_moves();
    assert_eq!(legal.len(), 20);

    let mv = select_move(&mut rules, 1).unwrap().unwrap();
    assert!(legal.contains(&mv));
    assert_eq!(rules.ply(), 0);
}

/// A hand-built game tree, where each move is the index of the node it leads to.
struct Tree {
    nodes: Vec<TreeNode>,
    path: Vec<usize>,
    made: usize,
    unmade: usize,
}

struct TreeNode {
    children: Vec<usize>,
    view: BoardView,
}

impl Tree {
    fn new(root: BoardView) -> Self {
        Self {
            nodes: vec![TreeNode {
                children: Vec::new(),
                view: root,
            }],
            path: vec![0],
            made: 0,
            unmade: 0,
        }
    }

    fn add(&mut self, parent: usize, view: BoardView) -> usize {
        let index = self.nodes.len();
        self.nodes.push(TreeNode {
            children: Vec::new(),
            view,
        });
        self.nodes[parent].children.push(index);
        index
    }

    fn current(&self) -> &TreeNode {
        &self.nodes[self.path[self.path.len() - 1]]
    }

    fn assert_balanced(&self) {
        assert_eq!(self.made, self.unmade);
        assert_eq!(self.path, [0]);
    }
}

impl RulesEngine for Tree {
    type Move = usize;

    fn legal_moves(&self) -> Vec<usize> {
        self.current().children.clone()
    }

    fn make_move(&mut self, mv: usize) -> Result<(), RulesError> {
        if !self.current().children.contains(&mv) {
            return Err(RulesError::IllegalMove {
                mv: mv.to_string(),
                fen: format!("{self}"),
            });
        }

        self.made += 1;
        self.path.push(mv);
        Ok(())
    }

    fn unmake_move(&mut self) -> Result<(), RulesError> {
        if self.path.len() <= 1 {
            return Err(RulesError::NothingToUndo);
        }

        self.unmade += 1;
        self.path.pop();
        Ok(())
    }

    fn board_view(&self) -> BoardView {
        self.current().view
    }

    fn side_to_move(&self) -> Color {
        if self.path.len() % 2 == 1 {
            Color::White
        } else {
            Color::Black
        }
    }

    fn is_in_check(&self) -> bool {
        false
    }

    fn is_fifty_move_draw(&self) -> bool {
        false
    }

    fn is_threefold_repetition(&self) -> bool {
        false
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tree node {:?}", self.path)
    }
}

/// Both Kings on their starting squares, plus `extra`.
fn view_with(extra: &[(usize, usize, Piece)]) -> BoardView {
    let mut view: BoardView = [[None; 8]; 8];
    view[0][4] = Some(Piece::new(Color::Black, PieceKind::King));
    view[7][4] = Some(Piece::new(Color::White, PieceKind::King));

    for &(row, col, piece) in extra {
        view[row][col] = Some(piece);
    }

    view
}

fn kings_only() -> BoardView {
    view_with(&[])
}

#[test]
fn test_ties_go_to_last_move() {
    let mut tree = Tree::new(kings_only());
    for _ in 0..3 {
        tree.add(0, kings_only());
    }

    let res = Search::new(&mut tree).select_move(1).unwrap();

    assert_eq!(res.bestmove, Some(3));
    assert_eq!(res.score, Score::DRAW);
    assert_eq!(res.nodes, 3);
    tree.assert_balanced();
}

#[test]
fn test_node_without_moves_returns_sentinel() {
    let mut tree = Tree::new(kings_only());
    let stuck = tree.add(0, kings_only());
    let open = tree.add(0, kings_only());
    tree.add(open, kings_only());

    let res = Search::new(&mut tree).select_move(2).unwrap();

    // The minimizing node without children keeps its sentinel, which beats the open line's 0.
    assert_eq!(res.bestmove, Some(stuck));
    assert_eq!(res.score, Score::SENTINEL);
    tree.assert_balanced();
}

#[test]
fn test_beta_cutoff_skips_remaining_children() {
    let queen = Piece::new(Color::Black, PieceKind::Queen);

    let mut tree = Tree::new(kings_only());
    let x = tree.add(0, kings_only());
    let y1 = tree.add(x, kings_only());
    tree.add(y1, kings_only());
    tree.add(y1, kings_only());
    let y2 = tree.add(x, kings_only());
    tree.add(y2, view_with(&[(3, 3, queen)]));
    tree.add(y2, kings_only());

    let (expected_move, expected_score, minimax_nodes) = minimax_root(&mut tree, 3);
    let res = Search::new(&mut tree).select_move(3).unwrap();

    assert_eq!(res.bestmove, expected_move);
    assert_eq!(res.score, expected_score);
    assert_eq!(res.score, Score::DRAW);

    // The first child of `y2` scores 900, which is already above what `x` can get from `y1`.
    assert_eq!(minimax_nodes, 7);
    assert_eq!(res.nodes, 6);
    tree.assert_balanced();
}

#[test]
fn test_root_scores_below_sentinel_select_no_move() {
    // Without a Black King, every leaf evaluates to roughly +20000, so every root move scores
    // roughly -20000. That is below the -9999 a root move must reach, so nothing is selected
    // even though legal moves exist.
    let mut lone_king: BoardView = [[None; 8]; 8];
    lone_king[7][4] = Some(Piece::new(Color::White, PieceKind::King));

    let mut tree = Tree::new(lone_king);
    tree.add(0, lone_king);
    tree.add(0, lone_king);

    let res = Search::new(&mut tree).select_move(1).unwrap();

    assert_eq!(res.bestmove, None);
    assert_eq!(res.score, -Score::SENTINEL);
    assert_eq!(res.nodes, 2);
    tree.assert_balanced();
}

#[test]
fn test_every_applied_move_is_reverted() {
    let pawn = Piece::new(Color::White, PieceKind::Pawn);

    let mut tree = Tree::new(kings_only());
    for i in 0..3 {
        let child = tree.add(0, kings_only());
        for j in 0..3 {
            let grandchild = tree.add(child, view_with(&[(6, i + j, pawn)]));
            for _ in 0..2 {
                tree.add(grandchild, view_with(&[(5, j, pawn)]));
            }
        }
    }

    for depth in 1..=3 {
        Search::new(&mut tree).select_move(depth).unwrap();
        assert!(tree.made > 0);
        tree.assert_balanced();
    }

    // Nothing to revert at the root.
    assert!(tree.unmake_move().is_err());
}
