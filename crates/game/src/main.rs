mod app;
mod game_window;
mod player;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use engine::{DEFAULT_ARCHIVE, EngineConfig, FrameDriver, LoadState, pack_directory};
use winit::event_loop::EventLoop;

use crate::{app::App, player::Player};

#[derive(Parser)]
#[command(version, about = "Top-down action RPG")]
struct Cli {
    /// Game data: a packaged archive or an unpacked project directory.
    #[arg(long, default_value = DEFAULT_ARCHIVE)]
    data: PathBuf,

    /// Start with the debug overlay shown.
    #[arg(long)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Pack a project directory into a game data archive.
    Pack {
        project_dir: PathBuf,

        #[arg(short, long, default_value = DEFAULT_ARCHIVE)]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Some(Command::Pack { project_dir, out }) = cli.command {
        let written = pack_directory(&project_dir, &out)?;
        log::info!("Packed {} entries into {:?}", written, out);
        return Ok(());
    }

    log::info!("Starting engine...");

    let load = LoadState::open(&cli.data);
    let config = EngineConfig {
        debug: cli.debug,
        ..EngineConfig::default()
    };
    let driver = FrameDriver::new(config, load, Player::new());

    let event_loop = EventLoop::new()?;
    let mut app = App::new(driver);

    log::info!("Entering main loop...");
    event_loop.run_app(&mut app)?;

    app.into_result()
}
