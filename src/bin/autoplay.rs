use clap::Parser;
use dualboard::arena::{generate_games_with, summarize, ArenaParams};
use dualboard::opponent::OpponentPolicy;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "dualboard-autoplay", about = "Play opponent-vs-opponent games through the move gate")]
struct Args {
    #[arg(long, default_value_t = 20)]
    games: usize,
    #[arg(long, default_value_t = 200)]
    max_plies: usize,
    #[arg(long, default_value = "greedy")]
    white: OpponentPolicy,
    #[arg(long, default_value = "random")]
    black: OpponentPolicy,
    #[arg(long, default_value_t = 42)]
    seed: u64,
    #[arg(long)]
    openings: Option<PathBuf>,
    /// Optional: write every game record as JSON to this path
    #[arg(long)]
    json_out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let a = Args::parse();
    let params = ArenaParams {
        games: a.games,
        max_plies: a.max_plies,
        white: a.white,
        black: a.black,
        seed: a.seed,
        openings_path: a.openings,
    };
    eprintln!("Playing {} games ({} vs {}, max_plies={})", a.games, a.white, a.black, a.max_plies);
    let pb = ProgressBar::new(a.games as u64);
    pb.set_style(ProgressStyle::with_template("{bar:40} {pos}/{len} games {elapsed}")?);
    let games = generate_games_with(&params, |_| pb.inc(1));
    pb.finish();
    if let Some(path) = a.json_out {
        std::fs::write(&path, serde_json::to_string_pretty(&games)?)?;
        eprintln!("Wrote {} games to {}", games.len(), path.display());
    }
    println!("{}", serde_json::to_string_pretty(&summarize(&games))?);
    Ok(())
}
