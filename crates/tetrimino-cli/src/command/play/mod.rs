use std::{path::PathBuf, sync::mpsc, thread};

use anyhow::Context as _;
use rand::Rng as _;
use serde::Serialize;
use tetrimino_engine::{Game, GameConfig, GameLoop, GameStats, PieceSeed};

use crate::{logging, tui::Runtime, util};

use self::{app::PlayApp, renderer::ChannelRenderer, screen::PlayScreen};

mod app;
mod keymap;
mod renderer;
mod screen;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Seed of the piece sequence, 32 hexadecimal digits (random if omitted)
    #[clap(long, value_name = "HEX")]
    seed: Option<PieceSeed>,
    /// Game configuration file (JSON)
    #[clap(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Seconds to count down before the first piece
    #[clap(long, value_name = "N")]
    countdown: Option<u32>,
    /// Write log messages to this file
    #[clap(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
    /// Write the seed and final statistics to this file as JSON
    #[clap(long, value_name = "PATH")]
    report: Option<PathBuf>,
}

/// Final report written by `--report`.
#[derive(Debug, Serialize)]
struct Report<'a> {
    seed: PieceSeed,
    stats: &'a GameStats,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        seed,
        config,
        countdown,
        log_file,
        report,
    } = arg;

    logging::init(log_file.as_deref())?;

    let mut config = match config {
        Some(path) => util::read_config_file(path)?,
        None => GameConfig::default(),
    };
    if let Some(countdown) = countdown {
        config.countdown_secs = i64::from(*countdown);
    }
    let seed = seed
        .or(config.seed)
        .unwrap_or_else(|| rand::rng().random());
    config.seed = Some(seed);
    log::info!("piece seed {seed}");

    let game = Game::new(config).context("Invalid game configuration")?;
    let (tx, rx) = mpsc::channel();
    let game_loop = GameLoop::new(game.clone(), ChannelRenderer::new(tx));
    let input = game_loop.sender();
    let worker = thread::Builder::new()
        .name("game-loop".to_owned())
        .spawn(move || game_loop.run())
        .context("Failed to start the game loop")?;

    let mut app = PlayApp::new(PlayScreen::new(game, input.clone(), rx));
    let ui_result = Runtime::new().run(&mut app);

    // no-op when the game already ended
    _ = input.send_exit();
    let stats = worker
        .join()
        .map_err(|_| anyhow::anyhow!("Game loop thread panicked"))?;
    ui_result.context("Terminal error")?;

    log::info!(
        "final score {}, lines {}, level {}",
        stats.score(),
        stats.total_cleared_lines(),
        stats.display_level()
    );
    if let Some(path) = report {
        let report = Report {
            seed,
            stats: &stats,
        };
        util::Output::save_json(&report, Some(path.as_path()))?;
    }
    Ok(())
}
