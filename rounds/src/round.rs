use crate::{
    agent::create_agent_config,
    config::{ensure_log_dir, RunConfig},
    types::{Env, ReplayBuffer, RoundAgent, StepProc},
};
use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use log::debug;
use rounds_classic_env::ClassicEnvConfig;
use rounds_core::{
    generic_replay_buffer::{SimpleReplayBufferConfig, SimpleStepProcessorConfig},
    record::LoggingRecorder,
    Agent, Configurable, Env as _, EpisodeStopCallback, MonitorConfig, ReplayBufferBase,
    StepProcessor, TrainReport, Trainer, TrainerConfig,
};
use std::path::{Path, PathBuf};

/// Upper bound of environment steps in a round.
pub const TOTAL_TIMESTEPS: usize = 100_000;
const WARMUP_PERIOD: usize = 1000;
const OPT_INTERVAL: usize = 1;
const FLUSH_RECORD_INTERVAL: usize = 1000;
const REPLAY_BUFFER_CAPACITY: usize = 50_000;

/// Prefix of the files of round `i`, e.g. `./logs/007`.
pub fn log_prefix(log_dir: &Path, i: usize) -> PathBuf {
    log_dir.join(format!("{:03}", i))
}

/// Path of the trained model, `<prefix>.model`.
pub fn model_path(prefix: &Path) -> PathBuf {
    let mut path = prefix.as_os_str().to_owned();
    path.push(".model");
    PathBuf::from(path)
}

fn create_trainer_config() -> TrainerConfig {
    TrainerConfig::default()
        .total_timesteps(TOTAL_TIMESTEPS)
        .warmup_period(WARMUP_PERIOD)
        .opt_interval(OPT_INTERVAL)
        .flush_record_interval(FLUSH_RECORD_INTERVAL)
}

/// Trains a fresh agent on a fresh environment and saves it.
///
/// Round `i` uses `i` as the seed of the environment, the replay buffer and
/// the agent. Training stops after `config.target_episodes` episodes or
/// [`TOTAL_TIMESTEPS`] steps, whichever comes first.
pub fn run_round(config: &RunConfig, i: usize) -> Result<TrainReport> {
    let prefix = log_prefix(&config.log_dir, i);
    let env_config = MonitorConfig::new(
        ClassicEnvConfig::default().name(config.env_name.as_str()),
        prefix.clone(),
    )
    .env_id(config.env_name.as_str())
    .allow_early_resets(true);
    let env = Env::build(&env_config, i as i64)?;
    let env_id = env.inner().env_id();

    let step_proc = StepProc::build(&SimpleStepProcessorConfig::default());
    let mut buffer = ReplayBuffer::build(
        &SimpleReplayBufferConfig::default()
            .capacity(REPLAY_BUFFER_CAPACITY)
            .seed(i as u64),
    );
    let mut agent = RoundAgent::build(create_agent_config(
        env_id.obs_dim() as i64,
        env_id.n_actions() as i64,
        i as u64,
    ))?;
    let mut callback = EpisodeStopCallback::new(config.target_episodes);
    let mut recorder = LoggingRecorder::new(format!("round {:03}", i));
    let mut trainer = Trainer::build(create_trainer_config());

    let report = trainer.train(
        env,
        step_proc,
        &mut agent,
        &mut buffer,
        &mut recorder,
        &mut callback,
    )?;

    let path = model_path(&prefix);
    agent.save_params(&path)?;
    debug!(
        "Round {:03}: {} episodes in {} steps, model saved to {}",
        i,
        report.episodes,
        report.env_steps,
        path.display()
    );

    Ok(report)
}

/// Runs all rounds sequentially. Any error aborts the run.
pub fn run(config: &RunConfig) -> Result<()> {
    config.print();
    ensure_log_dir(&config.log_dir)?;

    let pb = ProgressBar::new(config.num_rounds as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} rounds")?
            .progress_chars("#>-"),
    );

    for i in 0..config.num_rounds {
        run_round(config, i)?;
        pb.inc(1);
    }
    pb.finish();

    Ok(())
}
