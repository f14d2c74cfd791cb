use anyhow::Result;
use clap::Parser;
use rounds::{run, Args, RunConfig};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = RunConfig::from(Args::parse());
    run(&config)
}
