use anyhow::Result;
use clap::Parser;
use log::debug;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Train DQN agents for several independent rounds
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// Environment name
    #[arg(long, default_value = "CartPole-v1")]
    pub env: String,

    /// Number of episodes after which a round stops
    #[arg(long, default_value_t = 200)]
    pub episodes: usize,

    /// Number of rounds
    #[arg(long, default_value_t = 10)]
    pub rounds: usize,

    /// Directory of logs and trained models
    #[arg(long, default_value = "./logs/")]
    pub logdir: PathBuf,
}

/// Settings of a run, fixed once the command line is parsed.
#[derive(Clone, Debug, PartialEq)]
pub struct RunConfig {
    pub env_name: String,
    pub target_episodes: usize,
    pub num_rounds: usize,
    pub log_dir: PathBuf,
}

impl From<Args> for RunConfig {
    fn from(args: Args) -> Self {
        Self {
            env_name: args.env,
            target_episodes: args.episodes,
            num_rounds: args.rounds,
            log_dir: args.logdir,
        }
    }
}

impl RunConfig {
    /// Prints the settings.
    pub fn print(&self) {
        println!("Environment    : {}", self.env_name);
        println!("No.of episodes : {}", self.target_episodes);
        println!("No.of rounds   : {}", self.num_rounds);
        println!("Log directory  : {}", self.log_dir.display());
    }
}

/// Creates the log directory and its parents if they do not exist.
pub fn ensure_log_dir(log_dir: &Path) -> Result<()> {
    fs::create_dir_all(log_dir)?;
    debug!("Log directory: {}", log_dir.display());
    Ok(())
}
