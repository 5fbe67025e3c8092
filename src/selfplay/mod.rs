use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use indicatif::ProgressBar;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Outcome, Result};
use crate::game::{Game, StartPosition};
use crate::rules::Rules;
use crate::search::SearchParams;

#[derive(Clone, Debug)]
pub struct SelfPlayParams {
    pub games: usize,
    pub max_plies: usize,
    /// Uniformly random moves played before the engine takes over.
    pub random_plies: usize,
    pub seed: u64,
    pub search: SearchParams,
    pub start: StartPosition,
}

impl Default for SelfPlayParams {
    fn default() -> Self {
        Self {
            games: 1,
            max_plies: 40,
            random_plies: 0,
            seed: 42,
            search: SearchParams::default(),
            start: StartPosition::default(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GameRecord {
    pub start_fen: String,
    pub moves: Vec<String>,
    /// `None` when the ply limit ran out first.
    pub outcome: Option<Outcome>,
    /// Search nodes spent over the engine's moves.
    pub nodes: u64,
}

pub fn play_game(params: &SelfPlayParams, rng: &mut SmallRng, progress: &ProgressBar) -> Result<GameRecord> {
    let mut game = Game::new(params.start.clone(), params.search)?;
    let mut record = GameRecord { start_fen: game.board().fen(), moves: Vec::new(), outcome: None, nodes: 0 };
    for ply in 0..params.max_plies {
        if ply < params.random_plies {
            let moves = game.board().legal_moves();
            if moves.is_empty() {
                record.outcome = game.board().outcome();
                break;
            }
            let uci = moves[rng.gen_range(0..moves.len())].to_string();
            game.play_uci(&uci)?;
            record.moves.push(uci);
        } else {
            match game.play_best_move() {
                Ok(report) => {
                    record.nodes += report.nodes;
                    record.moves.push(report.uci);
                }
                Err(EngineError::TerminalPosition { outcome }) => {
                    record.outcome = Some(outcome);
                    break;
                }
                Err(e) => return Err(e),
            }
        }
        progress.inc(1);
    }
    if record.outcome.is_none() {
        record.outcome = game.board().outcome();
    }
    Ok(record)
}

pub fn generate_games(params: &SelfPlayParams, progress: &ProgressBar) -> Result<Vec<GameRecord>> {
    let mut rng = SmallRng::seed_from_u64(params.seed);
    let mut games = Vec::with_capacity(params.games);
    for gi in 0..params.games {
        let record = play_game(params, &mut rng, progress)?;
        log::info!(
            "game {gi}: {} plies, outcome {:?}, {} nodes",
            record.moves.len(),
            record.outcome,
            record.nodes
        );
        games.push(record);
    }
    Ok(games)
}

/// One JSON object per line.
pub fn write_records<W: Write>(games: &[GameRecord], mut out: W) -> std::io::Result<()> {
    for g in games {
        serde_json::to_writer(&mut out, g)?;
        out.write_all(b"\n")?;
    }
    out.flush()
}

pub fn write_records_to_path<P: AsRef<Path>>(games: &[GameRecord], path: P) -> std::io::Result<()> {
    write_records(games, BufWriter::new(File::create(path)?))
}
