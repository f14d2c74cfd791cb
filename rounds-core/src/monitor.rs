//! Episode-logging wrapper of environments.
//!
//! [`Monitor`] wraps any [`Env`] and writes two files sharing a prefix:
//!
//! * `<prefix>.monitor.csv`: a JSON header line
//!   `#{"t_start": <unix seconds>, "env_id": "<id>"}` followed by CSV rows
//!   `r,l,t` (return, length and elapsed seconds of each completed episode).
//! * `<prefix>.steps.csv`: CSV rows `episode,step,reward,terminated,truncated`,
//!   one per environment step.
use crate::{
    error::RoundsError,
    record::{Record, RecordValue},
    Env, Step,
};
use anyhow::Result;
use csv::{Writer, WriterBuilder};
use log::trace;
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    time::{Instant, SystemTime, UNIX_EPOCH},
};

/// Configuration of [`Monitor`].
#[derive(Clone, Debug)]
pub struct MonitorConfig<C> {
    /// Configuration of the wrapped environment.
    pub env_config: C,

    /// Path prefix of the log files.
    pub prefix: PathBuf,

    /// Environment identifier written in the header of the monitor file.
    pub env_id: String,

    /// If `true`, resetting before the end of an episode is not an error.
    pub allow_early_resets: bool,
}

impl<C> MonitorConfig<C> {
    /// Constructs a configuration. Early resets are not allowed by default.
    pub fn new(env_config: C, prefix: impl Into<PathBuf>) -> Self {
        Self {
            env_config,
            prefix: prefix.into(),
            env_id: String::new(),
            allow_early_resets: false,
        }
    }

    /// Sets the environment identifier.
    pub fn env_id(mut self, env_id: impl Into<String>) -> Self {
        self.env_id = env_id.into();
        self
    }

    /// Allows or disallows early resets.
    pub fn allow_early_resets(mut self, v: bool) -> Self {
        self.allow_early_resets = v;
        self
    }

    /// Path of the episode statistics file.
    pub fn monitor_path(&self) -> PathBuf {
        with_suffix(&self.prefix, "monitor.csv")
    }

    /// Path of the raw step log.
    pub fn steps_path(&self) -> PathBuf {
        with_suffix(&self.prefix, "steps.csv")
    }
}

fn with_suffix(prefix: &Path, suffix: &str) -> PathBuf {
    let mut s = prefix.as_os_str().to_owned();
    s.push(".");
    s.push(suffix);
    PathBuf::from(s)
}

/// The first line of a monitor file.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MonitorHeader {
    /// Creation time of the monitor in seconds since the unix epoch.
    pub t_start: f64,

    /// Environment identifier.
    pub env_id: String,
}

/// A row of a monitor file.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct EpisodeRow {
    /// Episode return.
    pub r: f32,

    /// Episode length.
    pub l: usize,

    /// Seconds elapsed since the monitor was created.
    pub t: f64,
}

#[derive(Serialize)]
struct StepRow {
    episode: usize,
    step: usize,
    reward: f32,
    terminated: i8,
    truncated: i8,
}

/// Reads a file written by [`Monitor`].
pub fn read_monitor_csv(path: impl AsRef<Path>) -> Result<(MonitorHeader, Vec<EpisodeRow>)> {
    let content = fs::read_to_string(path)?;
    let (first, rest) = content.split_once('\n').unwrap_or((content.as_str(), ""));
    let header: MonitorHeader = serde_json::from_str(first.trim_start_matches('#'))?;
    let mut rdr = csv::Reader::from_reader(rest.as_bytes());
    let rows = rdr.deserialize().collect::<Result<Vec<EpisodeRow>, _>>()?;
    Ok((header, rows))
}

/// Records episode statistics of the wrapped environment.
pub struct Monitor<E: Env> {
    env: E,
    allow_early_resets: bool,
    needs_reset: bool,
    timer: Instant,
    rewards: Vec<f32>,
    episode_rewards: Vec<f32>,
    episode_lengths: Vec<usize>,
    total_steps: usize,
    monitor_wtr: Writer<File>,
    steps_wtr: Writer<File>,
}

impl<E: Env> Monitor<E> {
    /// Returns of the completed episodes.
    pub fn episode_rewards(&self) -> &[f32] {
        &self.episode_rewards
    }

    /// Lengths of the completed episodes.
    pub fn episode_lengths(&self) -> &[usize] {
        &self.episode_lengths
    }

    /// The number of environment steps so far, over all episodes.
    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    /// The wrapped environment.
    pub fn inner(&self) -> &E {
        &self.env
    }

    fn check_reset(&mut self) -> Result<()> {
        if !self.allow_early_resets && !self.needs_reset {
            return Err(RoundsError::EarlyReset.into());
        }
        self.rewards.clear();
        self.needs_reset = false;
        Ok(())
    }

    fn end_episode(&mut self, record: &mut Record) -> Result<()> {
        let r: f32 = self.rewards.iter().sum();
        let l = self.rewards.len();
        let t = self.timer.elapsed().as_secs_f64();
        self.monitor_wtr.serialize(EpisodeRow { r, l, t })?;
        self.monitor_wtr.flush()?;
        self.steps_wtr.flush()?;
        self.episode_rewards.push(r);
        self.episode_lengths.push(l);
        trace!("Episode {} ended: return={}, length={}", self.episode_rewards.len(), r, l);

        record.insert("episode_return", RecordValue::Scalar(r));
        record.insert("episode_length", RecordValue::Scalar(l as f32));
        Ok(())
    }
}

impl<E: Env> Env for Monitor<E> {
    type Config = MonitorConfig<E::Config>;
    type Obs = E::Obs;
    type Act = E::Act;
    type Info = E::Info;

    /// Builds the wrapped environment and creates the log files.
    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        let env = E::build(&config.env_config, seed)?;
        let t_start = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs_f64();
        let header = MonitorHeader {
            t_start,
            env_id: config.env_id.clone(),
        };

        let mut file = File::create(config.monitor_path())?;
        writeln!(file, "#{}", serde_json::to_string(&header)?)?;
        let mut monitor_wtr = WriterBuilder::new().has_headers(false).from_writer(file);
        monitor_wtr.write_record(["r", "l", "t"])?;
        monitor_wtr.flush()?;

        let mut steps_wtr = WriterBuilder::new()
            .has_headers(false)
            .from_path(config.steps_path())?;
        steps_wtr.write_record(["episode", "step", "reward", "terminated", "truncated"])?;
        steps_wtr.flush()?;

        Ok(Self {
            env,
            allow_early_resets: config.allow_early_resets,
            needs_reset: true,
            timer: Instant::now(),
            rewards: vec![],
            episode_rewards: vec![],
            episode_lengths: vec![],
            total_steps: 0,
            monitor_wtr,
            steps_wtr,
        })
    }

    fn step(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)> {
        if self.needs_reset {
            return Err(RoundsError::StepAfterDone.into());
        }

        let (step, mut record) = self.env.step(a)?;
        let reward = step.reward[0];
        self.rewards.push(reward);
        self.total_steps += 1;
        self.steps_wtr.serialize(StepRow {
            episode: self.episode_rewards.len(),
            step: self.rewards.len() - 1,
            reward,
            terminated: step.is_terminated[0],
            truncated: step.is_truncated[0],
        })?;

        if step.is_done() {
            self.needs_reset = true;
            self.end_episode(&mut record)?;
        }

        let step = Step::new(
            step.obs,
            step.act,
            step.reward,
            step.is_terminated,
            step.is_truncated,
            step.info,
            step.init_obs,
        );
        Ok((step, record))
    }

    fn reset(&mut self, is_done: Option<&Vec<i8>>) -> Result<Self::Obs> {
        self.check_reset()?;
        self.env.reset(is_done)
    }

    fn reset_with_index(&mut self, ix: usize) -> Result<Self::Obs> {
        self.check_reset()?;
        self.env.reset_with_index(ix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Act, Obs};
    use tempdir::TempDir;

    #[derive(Clone, Debug)]
    struct CounterObs(usize);

    impl Obs for CounterObs {
        fn dummy(_n: usize) -> Self {
            Self(0)
        }

        fn len(&self) -> usize {
            1
        }
    }

    #[derive(Clone, Debug)]
    struct NoopAct;

    impl Act for NoopAct {}

    /// Episodes end after `len` steps with reward 1 per step.
    struct FixedLengthEnv {
        len: usize,
        t: usize,
    }

    impl Env for FixedLengthEnv {
        type Config = usize;
        type Obs = CounterObs;
        type Act = NoopAct;
        type Info = ();

        fn build(config: &Self::Config, _seed: i64) -> Result<Self> {
            Ok(Self { len: *config, t: 0 })
        }

        fn step(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)> {
            self.t += 1;
            let terminated = (self.t >= self.len) as i8;
            let step = Step::new(
                CounterObs(self.t),
                a.clone(),
                vec![1.0],
                vec![terminated],
                vec![0],
                (),
                None,
            );
            Ok((step, Record::empty()))
        }

        fn reset(&mut self, _is_done: Option<&Vec<i8>>) -> Result<Self::Obs> {
            self.t = 0;
            Ok(CounterObs(0))
        }

        fn reset_with_index(&mut self, _ix: usize) -> Result<Self::Obs> {
            self.reset(None)
        }
    }

    fn config(dir: &TempDir, allow_early_resets: bool) -> MonitorConfig<usize> {
        MonitorConfig::new(3, dir.path().join("000"))
            .env_id("Fixed-v0")
            .allow_early_resets(allow_early_resets)
    }

    #[test]
    fn test_writes_episode_rows() -> Result<()> {
        let dir = TempDir::new("monitor")?;
        let config = config(&dir, false);
        let mut env = Monitor::<FixedLengthEnv>::build(&config, 0)?;
        env.reset(None)?;
        for _ in 0..6 {
            let (step, record) = env.step_with_reset(&NoopAct)?;
            if step.is_done() {
                assert_eq!(record.get_scalar("episode_length")?, 3.0);
                assert!(step.init_obs.is_some());
            }
        }
        assert_eq!(env.episode_rewards(), &[3.0, 3.0]);
        assert_eq!(env.episode_lengths(), &[3, 3]);
        assert_eq!(env.total_steps(), 6);

        let (header, rows) = read_monitor_csv(config.monitor_path())?;
        assert_eq!(header.env_id, "Fixed-v0");
        assert!(header.t_start > 0.0);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].r, 3.0);
        assert_eq!(rows[1].l, 3);
        assert!(rows[1].t >= rows[0].t);

        drop(env);
        let steps = fs::read_to_string(config.steps_path())?;
        let lines = steps.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], "episode,step,reward,terminated,truncated");
        assert_eq!(lines[3], "0,2,1.0,1,0");
        assert_eq!(lines[4], "1,0,1.0,0,0");
        Ok(())
    }

    #[test]
    fn test_early_reset() -> Result<()> {
        let dir = TempDir::new("monitor")?;
        let mut env = Monitor::<FixedLengthEnv>::build(&config(&dir, false), 0)?;
        env.reset(None)?;
        env.step(&NoopAct)?;
        let err = env.reset(None).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RoundsError>(),
            Some(RoundsError::EarlyReset)
        ));

        let mut env = Monitor::<FixedLengthEnv>::build(&config(&dir, true), 0)?;
        env.reset(None)?;
        env.step(&NoopAct)?;
        env.reset(None)?;
        assert!(env.episode_rewards().is_empty());
        Ok(())
    }

    #[test]
    fn test_step_after_done() -> Result<()> {
        let dir = TempDir::new("monitor")?;
        let mut env = Monitor::<FixedLengthEnv>::build(&config(&dir, true), 0)?;
        assert!(env.step(&NoopAct).is_err());
        env.reset(None)?;
        for _ in 0..3 {
            env.step(&NoopAct)?;
        }
        let err = env.step(&NoopAct).err().expect("step after done must fail");
        assert!(matches!(
            err.downcast_ref::<RoundsError>(),
            Some(RoundsError::StepAfterDone)
        ));
        Ok(())
    }
}
