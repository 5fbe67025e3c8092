use alphabot::api;
use alphabot::game::{Game, StartPosition};
use alphabot::rules::Rules;
use alphabot::search::{Perspective, SearchParams};
use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;

#[derive(Parser, Debug)]
#[command(author, version, about = "Serve fixed-depth alpha-beta moves over HTTP", long_about = None)]
struct Args {
    /// Address to bind
    #[arg(long, env = "ALPHABOT_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(long, env = "ALPHABOT_PORT", default_value_t = 3000)]
    port: u16,

    /// Plies searched below each root move (deeper is stronger but much slower)
    #[arg(long, env = "ALPHABOT_DEPTH", default_value_t = 3)]
    depth: u32,

    /// Leaf scoring: 'side' (for the side to move at the leaf) or 'root' (for the side choosing the move)
    #[arg(long, env = "ALPHABOT_PERSPECTIVE", default_value = "side")]
    perspective: Perspective,

    /// Search every branch instead of pruning with alpha-beta
    #[arg(long)]
    no_alpha_beta: bool,

    /// Starting FEN (standard start position if omitted)
    #[arg(long, env = "ALPHABOT_FEN")]
    fen: Option<String>,

    /// Moves played from the starting position before serving, e.g. e2e4 e7e5 d1h5 b8c6
    #[arg(long, num_args = 1.., value_delimiter = ' ')]
    moves: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let params = SearchParams {
        depth: args.depth,
        perspective: args.perspective,
        alpha_beta: !args.no_alpha_beta,
    };
    let start = StartPosition { fen: args.fen, moves: args.moves };
    let game = Game::new(start, params).context("building starting position")?;
    log::info!("starting position {}", game.board().fen());
    log::info!("search: {params:?}");

    let listener = TcpListener::bind((args.host.as_str(), args.port))
        .await
        .with_context(|| format!("binding {}:{}", args.host, args.port))?;
    log::info!("App listening at http://{}", listener.local_addr()?);
    axum::serve(listener, api::router(game)).await?;
    Ok(())
}
