use std::path::PathBuf;

use alphabot::game::StartPosition;
use alphabot::search::{Perspective, SearchParams};
use alphabot::selfplay::{generate_games, write_records, write_records_to_path, SelfPlayParams};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

#[derive(Parser, Debug)]
#[command(name = "alphabot-selfplay", about = "Let the bot play itself and print the games as JSON lines")]
struct Args {
    #[arg(long, default_value_t = 1)]
    games: usize,
    #[arg(long, default_value_t = 40)]
    max_plies: usize,
    /// Random opening moves before the engine plays
    #[arg(long, default_value_t = 0)]
    random_plies: usize,
    #[arg(long, default_value_t = 42)]
    seed: u64,
    #[arg(long, default_value_t = 3)]
    depth: u32,
    #[arg(long, default_value = "side")]
    perspective: Perspective,
    #[arg(long)]
    fen: Option<String>,
    /// Write records here instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let a = Args::parse();
    let params = SelfPlayParams {
        games: a.games,
        max_plies: a.max_plies,
        random_plies: a.random_plies,
        seed: a.seed,
        search: SearchParams { depth: a.depth, perspective: a.perspective, alpha_beta: true },
        start: StartPosition { fen: a.fen, moves: Vec::new() },
    };

    let progress = ProgressBar::new((a.games * a.max_plies) as u64);
    progress.set_style(ProgressStyle::with_template("{bar:40} {pos}/{len} plies [{elapsed_precise}]")?);
    eprintln!("Playing {} games (depth={}, random_plies={}, seed={})", a.games, a.depth, a.random_plies, a.seed);
    let games = generate_games(&params, &progress)?;
    progress.finish_and_clear();

    match a.out {
        Some(path) => {
            write_records_to_path(&games, &path)?;
            eprintln!("Wrote {} games to {}", games.len(), path.display());
        }
        None => write_records(&games, std::io::stdout().lock())?,
    }
    Ok(())
}
