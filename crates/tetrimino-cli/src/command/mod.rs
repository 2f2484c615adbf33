use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tetrimino_engine::GameConfig;

use crate::util::Output;

use self::play::PlayArg;

mod play;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play a game in the terminal (default)
    Play(#[clap(flatten)] PlayArg),
    /// Print the default game configuration as JSON
    DefaultConfig {
        /// Write to this file instead of stdout
        #[clap(long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Play(PlayArg::default())) {
        Mode::Play(arg) => play::run(&arg)?,
        Mode::DefaultConfig { output } => {
            Output::save_json(&GameConfig::default(), output.as_deref())?;
        }
    }
    Ok(())
}
