/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Shallowest depth a search may be run at.
pub const MIN_DIFFICULTY: usize = 1;

/// Deepest depth a search may be run at.
///
/// There is no time control, so anything deeper than this takes too long to be playable.
pub const MAX_DIFFICULTY: usize = 5;

/// Depth used when none was requested.
pub const DEFAULT_DIFFICULTY: usize = 3;

/// Default depth at which to run the benchmark searches.
pub const BENCH_DEPTH: usize = 3;

/// Positions searched by the `bench` command.
pub const BENCHMARK_FENS: [&str; 6] = [
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3",
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
    "4k3/8/8/8/8/8/4P3/4K3 w - - 0 1",
];
