use std::error::Error;
use std::path::PathBuf;

use clap::Parser;

mod app;
mod config;
mod error;
mod game;
mod io;
mod leaderboard;
mod logger;
mod ui;

pub use config::{DEFAULT_CONFIG_PATH, NAME_LEN, RESULTS_PER_PAGE, SIDEBAR_W};

#[derive(Parser, Debug)]
#[command(name = "gridsnake", about = "Snake on a checkerboard with a persistent leaderboard")]
struct Args {
    /// YAML settings file; defaults apply when it does not exist
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Record file, overriding the one in the settings
    #[arg(long)]
    leaderboard: Option<PathBuf>,

    /// Print a leaderboard page and exit
    #[arg(long)]
    scores: bool,

    /// Zero-based page for --scores
    #[arg(long, default_value_t = 0)]
    page: usize,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let mut settings = config::load_settings(&args.config)?;
    if let Some(path) = args.leaderboard {
        settings.leaderboard_path = path;
    }

    if args.scores {
        let store = leaderboard::LeaderboardStore::new(&settings.leaderboard_path);
        app::print_scores(&store, args.page)?;
        return Ok(());
    }

    logger::init_logger(&settings.log_path)?;
    log!(
        "starting: {}x{} @ {}px cells, leaderboard {}",
        settings.resolution.width,
        settings.resolution.height,
        settings.cell_size,
        settings.leaderboard_path.display()
    );
    app::run(settings)
}
