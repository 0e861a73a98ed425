use anyhow::Result;
use clap::Parser;
use dualboard::board::cozy::parse_color;
use dualboard::config::SessionConfig;
use dualboard::console::Console;
use dualboard::opponent::OpponentPolicy;
use dualboard::view::ViewMode;
use std::io;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Play chess against a synthetic opponent in a 2D or 3D board view", long_about = None)]
struct Args {
    /// JSON session config; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Your color: 'w' for white, 'b' for black
    #[arg(long)]
    color: Option<String>,

    /// Opponent policy: random or greedy
    #[arg(long)]
    policy: Option<OpponentPolicy>,

    /// Opponent "thinking" delay in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Seed for the opponent's random choices
    #[arg(long)]
    seed: Option<u64>,

    /// Board view: 2d or 3d
    #[arg(long)]
    view: Option<ViewMode>,

    /// Starting FEN position
    #[arg(long)]
    fen: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut cfg = SessionConfig::load_or_default(args.config.as_ref());
    if let Some(c) = args.color.as_deref() {
        cfg.player = parse_color(c).ok_or_else(|| anyhow::anyhow!("Invalid color: use 'w' or 'b'"))?.into();
    }
    if let Some(p) = args.policy { cfg.policy = p; }
    if let Some(d) = args.delay_ms { cfg.delay_ms = d; }
    if let Some(s) = args.seed { cfg.seed = s; }
    if let Some(v) = args.view { cfg.view = v; }
    if args.fen.is_some() { cfg.start_fen = args.fen; }
    log::info!("starting session: {cfg:?}");

    let mut console = Console::new(&cfg)?;
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    console.run_loop(stdin.lock(), &mut stdout)?;
    Ok(())
}
