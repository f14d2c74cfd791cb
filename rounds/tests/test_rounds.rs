use anyhow::Result;
use clap::Parser;
use rounds::{log_prefix, model_path, run, run_round, Args, RunConfig};
use rounds_core::{error::RoundsError, monitor::read_monitor_csv};
use std::fs;
use tempdir::TempDir;

fn run_config(log_dir: &std::path::Path, env: &str, episodes: usize) -> RunConfig {
    RunConfig {
        env_name: env.to_string(),
        target_episodes: episodes,
        num_rounds: 1,
        log_dir: log_dir.to_path_buf(),
    }
}

#[test]
fn test_two_rounds_one_episode() -> Result<()> {
    let tmp_dir = TempDir::new("rounds")?;
    let log_dir = tmp_dir.path().join("x");
    let log_dir_str = log_dir.to_str().expect("temporary path is not UTF-8");
    let args = Args::parse_from([
        "rounds",
        "--rounds",
        "2",
        "--episodes",
        "1",
        "--logdir",
        log_dir_str,
    ]);
    run(&RunConfig::from(args))?;

    let mut models = fs::read_dir(&log_dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".model"))
        .collect::<Vec<_>>();
    models.sort();
    assert_eq!(models, vec!["000.model", "001.model"]);

    for i in 0..2 {
        let prefix = log_prefix(&log_dir, i);
        let (header, rows) = read_monitor_csv(format!("{}.monitor.csv", prefix.display()))?;
        assert_eq!(header.env_id, "CartPole-v1");
        assert_eq!(rows.len(), 1);

        // Header line plus one line per step of the single episode
        let steps = fs::read_to_string(format!("{}.steps.csv", prefix.display()))?;
        assert_eq!(steps.lines().count(), 1 + rows[0].l);
    }
    Ok(())
}

#[test]
fn test_zero_episodes_runs_one_episode() -> Result<()> {
    let tmp_dir = TempDir::new("rounds")?;
    let config = run_config(tmp_dir.path(), "MountainCar-v0", 0);
    let report = run_round(&config, 0)?;
    assert!(report.stopped_by_hook);
    assert_eq!(report.episodes, 1);
    // The time limit ends the first episode
    assert_eq!(report.env_steps, 200);
    assert!(model_path(&log_prefix(tmp_dir.path(), 0)).exists());
    Ok(())
}

#[test]
fn test_unknown_env_aborts() -> Result<()> {
    let tmp_dir = TempDir::new("rounds")?;
    let mut config = run_config(tmp_dir.path(), "Pong-v0", 1);
    config.num_rounds = 2;
    let err = run(&config).err().expect("unknown environment must fail");
    assert!(matches!(
        err.downcast_ref::<RoundsError>(),
        Some(RoundsError::UnknownEnv(_))
    ));
    assert!(!model_path(&log_prefix(tmp_dir.path(), 0)).exists());
    Ok(())
}

#[test]
fn test_default_flow_writes_ten_models() -> Result<()> {
    let tmp_dir = TempDir::new("rounds")?;
    let log_dir = tmp_dir.path().join("logs");
    let log_dir_str = log_dir.to_str().expect("temporary path is not UTF-8");
    let defaults = RunConfig::from(Args::parse_from(["rounds", "--logdir", log_dir_str]));
    assert_eq!(defaults.num_rounds, 10);

    // Default round count, one episode per round
    let config = RunConfig {
        target_episodes: 1,
        ..defaults
    };
    run(&config)?;

    let mut models = fs::read_dir(&log_dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".model"))
        .collect::<Vec<_>>();
    models.sort();
    let expected = (0..10).map(|i| format!("{:03}.model", i)).collect::<Vec<_>>();
    assert_eq!(models, expected);
    Ok(())
}
