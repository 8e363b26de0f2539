/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    io::{self, BufRead},
    sync::mpsc::{channel, Receiver, Sender},
    thread,
    time::{Duration, Instant},
};

use anyhow::{anyhow, bail, Context, Result};
use chessie::{Color, PieceKind};
use uci_parser::{UciCommand, UciInfo, UciOption, UciParseError, UciResponse, UciSearchOptions};

use crate::{
    evaluate, Difficulty, EngineCommand, Evaluator, GameStatus, Psqt, RulesEngine, SearchConfig,
    Session, BENCHMARK_FENS, BENCH_DEPTH, DEFAULT_DIFFICULTY, MAX_DIFFICULTY, MIN_DIFFICULTY,
};

/// Name of the only UCI option, controlling search depth.
const DIFFICULTY_OPTION: &str = "Difficulty";

/// The Tadpole chess engine.
///
/// Commands arrive over a channel, either queued up front with [`Engine::send_command`]
/// or read from `stdin` once [`Engine::run`] starts, and are executed one at a time.
#[derive(Debug)]
pub struct Engine {
    /// The game currently being played.
    session: Session,

    /// Handed to the input thread, and used to queue commands before the loop starts.
    sender: Sender<EngineCommand>,

    /// Commands waiting to be executed.
    receiver: Receiver<EngineCommand>,
}

impl Engine {
    /// Creates an engine on the starting position. Nothing happens until [`Engine::run`] is called.
    pub fn new() -> Self {
        let (sender, receiver) = channel();

        Self {
            session: Session::new(),
            sender,
            receiver,
        }
    }

    /// `<package> <version>`, as reported to `uci`.
    pub fn name(&self) -> String {
        format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }

    /// Authors from the package manifest, comma separated.
    pub fn authors(&self) -> String {
        env!("CARGO_PKG_AUTHORS").split(':').collect::<Vec<_>>().join(", ")
    }

    /// The game being played.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Queues `command` for execution.
    pub fn send_command(&self, command: EngineCommand) {
        // The receiver lives in `self`, so it cannot have hung up yet.
        self.sender.send(command).unwrap();
    }

    /// Reads commands from `stdin` on a background thread and executes them until `exit`, `quit` or end of input.
    ///
    /// Commands queued earlier with [`Engine::send_command`] run first. A failing command is reported
    /// on `stderr` and does not stop the loop.
    pub fn run(&mut self) -> Result<()> {
        let sender = self.sender.clone();
        thread::spawn(move || {
            if let Err(err) = input_handler(sender) {
                tracing::debug!("input thread finished: {err:#}");
            }
        });

        while let Ok(cmd) = self.receiver.recv() {
            if matches!(cmd, EngineCommand::Exit) {
                break;
            }

            if let Err(err) = self.handle_command(cmd) {
                eprintln!("Error: {err:#}");
            }
        }

        Ok(())
    }

    /// Executes a single [`EngineCommand`].
    pub fn handle_command(&mut self, cmd: EngineCommand) -> Result<()> {
        match cmd {
            EngineCommand::Bench { depth, pretty } => self.bench(depth, pretty)?,

            EngineCommand::Difficulty { depth } => {
                if let Some(depth) = depth {
                    self.session.set_difficulty(depth)?;
                }
                println!("difficulty := {}", self.session.difficulty());
            }

            EngineCommand::Display => println!("{}", self.session.rules()),

            EngineCommand::Eval { pretty } => self.eval(pretty),

            // Handled by the event loop
            EngineCommand::Exit => {}

            EngineCommand::Fen => println!("{}", self.session.rules().to_fen()),

            EngineCommand::Moves => self.moves(),

            EngineCommand::Play { mv_string } => self.play(&mv_string)?,

            EngineCommand::Psqt { piece, black } => self.psqt(piece.into(), black),

            EngineCommand::Reply => self.reply()?,

            EngineCommand::Side { color } => {
                let previous = self.session.engine_color();
                if let Some(color) = color {
                    self.session.set_engine_color(color.into());
                }
                println!("engine plays {}", self.session.engine_color().name());

                if self.session.engine_color() != previous {
                    self.new_game()?;
                }
            }

            EngineCommand::Status => self.status(),

            EngineCommand::Takeback => {
                self.session.takeback()?;
                println!("{}", self.session.rules());
            }

            EngineCommand::Uci { cmd } => self.handle_uci_command(cmd)?,
        }

        Ok(())
    }

    /// Executes a single [`UciCommand`].
    fn handle_uci_command(&mut self, uci: UciCommand) -> Result<()> {
        match uci {
            UciCommand::Uci => self.uci(),

            UciCommand::IsReady => println!("{}", UciResponse::<&str>::ReadyOk),

            UciCommand::SetOption { name, value } => self.set_option(&name, value)?,

            UciCommand::UciNewGame => self.session.new_game(),

            UciCommand::Position { fen, moves } => self.session.set_position(fen, moves)?,

            UciCommand::Go(options) => self.go(options)?,

            // A search has always finished by the time the next command is read.
            UciCommand::Stop => tracing::debug!("stop received with no search running"),

            UciCommand::Quit => self.send_command(EngineCommand::Exit),

            other => bail!("Unsupported UCI command: {other:?}"),
        }

        Ok(())
    }

    /// Searches the current position and reports `info` followed by `bestmove`.
    ///
    /// The position itself is left as it was.
    fn go(&mut self, options: UciSearchOptions) -> Result<()> {
        let config = SearchConfig::new(options, self.session.difficulty())?;

        let start = Instant::now();
        let res = self.session.think(config)?;
        let elapsed = start.elapsed();

        let info = UciInfo::new()
            .depth(config.depth.depth())
            .nodes(res.nodes)
            .score(res.score.into_uci())
            .nps(nodes_per_second(res.nodes, elapsed).trunc())
            .time(elapsed.as_millis());
        println!("{}", UciResponse::<String>::Info(Box::new(info)));

        println!(
            "{}",
            UciResponse::BestMove {
                bestmove: res.bestmove,
                ponder: None,
            }
        );

        Ok(())
    }

    /// Searches every position in [`BENCHMARK_FENS`] and reports the total node count and speed.
    ///
    /// The current game is left exactly as it was.
    fn bench(&mut self, depth: Option<usize>, pretty: bool) -> Result<()> {
        let config = SearchConfig {
            depth: Difficulty::new(depth.unwrap_or(BENCH_DEPTH))?,
        };

        let game = self.session.clone();
        let start = Instant::now();
        let result = self.bench_positions(config);
        self.session = game;

        let per_position = result?;
        let elapsed = start.elapsed();
        let nodes: u64 = per_position.iter().sum();
        let nps = nodes_per_second(nodes, elapsed);

        if pretty {
            println!();
            println!("{:<4} {:>10}  FEN", "#", "nodes");
            for (i, (fen, nodes)) in BENCHMARK_FENS.iter().zip(&per_position).enumerate() {
                println!("{:<4} {nodes:>10}  {fen}", i + 1);
            }
            println!();
            println!("depth      : {}", config.depth);
            println!("total nodes: {nodes}");
            println!("time (ms)  : {}", elapsed.as_millis());
            println!("nps        : {}", nps as u64);
        } else {
            println!("{nodes} nodes {} nps", nps as u64);
        }

        Ok(())
    }

    /// Number of nodes searched on each benchmark position.
    fn bench_positions(&mut self, config: SearchConfig) -> Result<Vec<u64>> {
        BENCHMARK_FENS
            .iter()
            .map(|fen| -> Result<u64> {
                self.session.set_position(Some(*fen), [])?;
                Ok(self.session.think(config)?.nodes)
            })
            .collect()
    }

    fn eval(&self, pretty: bool) {
        let view = self.session.rules().board_view();

        if pretty {
            println!("{}", Evaluator::new(&view));
        } else {
            println!("{}", evaluate(&view));
        }
    }

    /// Prints every legal move, in the order the search visits them.
    fn moves(&self) {
        let moves = self.session.rules().legal_moves();

        if moves.is_empty() {
            println!("(none)");
        } else {
            let moves = moves.iter().map(ToString::to_string).collect::<Vec<_>>();
            println!("{}", moves.join(", "));
        }
    }

    /// Plays a move for the side to move, and lets the engine answer if that hands it the move.
    fn play(&mut self, mv_string: &str) -> Result<()> {
        self.session.play(mv_string)?;

        if self.session.is_engine_turn() && !self.session.status().is_over() {
            self.reply()
        } else {
            self.report_status();
            Ok(())
        }
    }

    /// Starts over from the starting position, opening for the engine if it plays White.
    fn new_game(&mut self) -> Result<()> {
        self.session.new_game();

        if self.session.is_engine_turn() {
            self.reply()
        } else {
            Ok(())
        }
    }

    /// Lets the engine play for the side to move.
    fn reply(&mut self) -> Result<()> {
        match self.session.engine_move()? {
            Some(mv) => println!("{mv}"),
            None => println!("(none)"),
        }

        self.report_status();
        Ok(())
    }

    /// Prints the game status if it is anything other than "in progress".
    fn report_status(&self) {
        let status = self.session.status();
        if status != GameStatus::InProgress {
            println!("{status}");
        }
    }

    fn psqt(&self, kind: PieceKind, black: bool) {
        let Some(table) = Psqt::get_table_for(kind) else {
            println!("no table for {kind:?}");
            return;
        };

        if black {
            println!("{table:#}");
        } else {
            println!("{table}");
        }
    }

    fn status(&self) {
        let session = &self.session;

        println!("status     : {}", session.status());
        println!("turn       : {}", session.rules().side_to_move().name());
        println!(
            "material   : White {} / Black {}",
            session.material(Color::White),
            session.material(Color::Black)
        );
        println!("moves      : {}", session.full_moves());
        println!(
            "difficulty : {} (engine plays {})",
            session.difficulty(),
            session.engine_color().name()
        );
    }

    /// Replies to `uci` with the engine's identity and options, then `uciok`.
    fn uci(&self) {
        println!("id name {}", self.name());
        println!("id author {}", self.authors());

        println!("{}", UciResponse::Option(difficulty_option()));

        println!("{}", UciResponse::<&str>::UciOk);
    }

    /// Applies `setoption name <name> value <value>`.
    fn set_option(&mut self, name: &str, value: Option<String>) -> Result<()> {
        if !name.eq_ignore_ascii_case(DIFFICULTY_OPTION) {
            bail!("{} has no option named {name:?}", self.name());
        }

        let value = value.ok_or_else(|| anyhow!("Option {name:?} requires a value"))?;
        let depth = value
            .trim()
            .parse::<usize>()
            .with_context(|| format!("Invalid value {value:?} for option {name:?}"))?;

        self.session.set_difficulty(depth)?;
        Ok(())
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

/// The `Difficulty` spin option, advertised in response to `uci`.
fn difficulty_option() -> UciOption<&'static str> {
    UciOption::spin(
        DIFFICULTY_OPTION,
        DEFAULT_DIFFICULTY as i32,
        MIN_DIFFICULTY as i32,
        MAX_DIFFICULTY as i32,
    )
}

#[inline(always)]
fn nodes_per_second(nodes: u64, elapsed: Duration) -> f32 {
    nodes as f32 / elapsed.as_secs_f32()
}

/// Reads `stdin` line by line, forwarding every command that parses.
///
/// UCI is tried first. Lines that are not UCI are parsed as [`EngineCommand`]s.
/// At end of input an `exit` is sent and the thread stops.
fn input_handler(sender: Sender<EngineCommand>) -> Result<()> {
    for line in io::stdin().lock().lines() {
        let line = line.context("Failed to read from stdin")?;
        let input = line.trim();

        if input.is_empty() {
            continue;
        }

        let cmd = match UciCommand::new(input) {
            Ok(cmd) => EngineCommand::Uci { cmd },

            Err(UciParseError::UnrecognizedCommand { .. }) => match input.parse() {
                Ok(cmd) => cmd,
                Err(err) => {
                    tracing::warn!(input, "unrecognized command");
                    eprintln!("{err}");
                    continue;
                }
            },

            // Recognized as UCI, but malformed
            Err(err) => {
                eprintln!("{err}");
                continue;
            }
        };

        sender
            .send(cmd)
            .context("Engine stopped while input was still arriving")?;
    }

    sender
        .send(EngineCommand::Exit)
        .context("Engine stopped before end of input")?;

    Ok(())
}
