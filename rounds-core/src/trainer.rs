//! Train [`Agent`].
mod config;
mod sampler;
use crate::{
    callback::{StepContext, StepHook},
    record::{AggregateRecorder, Record, RecordValue::Scalar},
    Agent, Env, ExperienceBufferBase, ReplayBufferBase, StepProcessor,
};
use anyhow::Result;
pub use config::TrainerConfig;
use log::debug;
pub use sampler::Sampler;
use std::time::Instant;

/// Summary of a call to [`Trainer::train()`].
#[derive(Clone, Debug, PartialEq)]
pub struct TrainReport {
    /// The number of environment steps.
    pub env_steps: usize,

    /// The number of optimization steps.
    pub opt_steps: usize,

    /// The number of completed episodes.
    pub episodes: usize,

    /// `true` if the hook stopped training before the step budget was used up.
    pub stopped_by_hook: bool,

    /// Mean return of the completed episodes.
    pub mean_return: Option<f32>,
}

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Manages training loop and related objects.
///
/// # Training loop
///
/// For `t` in `0..total_timesteps`:
///
/// 1. Call the [`StepHook`] with [`StepContext`] `{step: t, done}`, where
///    `done` tells if the previous environment step ended an episode.
///    If the hook returns `false`, training stops without a further environment step.
/// 2. Do an environment step with [`Sampler`] and push a transition to the
///    replay buffer. The environment is reset at the end of each episode.
/// 3. `env_steps += 1`
/// 4. If `env_steps > warmup_period` and `env_steps % opt_interval == 0`,
///    do an optimization step of the agent with batches sampled from the
///    replay buffer.
/// 5. Store the records of the environment and the agent in the recorder and
///    flush them every `flush_record_interval` environment steps.
///
/// # Interaction of objects
///
/// ```mermaid
/// graph LR
///     H[StepHook]-->|continue?|T[Trainer]
///     A[Agent]-->|Env::Act|B[Env]
///     B -->|Env::Obs|A
///     B -->|"Step&lt;E: Env&gt;"|C[StepProcessor]
///     C -->|ExperienceBufferBase::Item|D[ReplayBufferBase]
///     D -->|ReplayBufferBase::Batch|A
/// ```
pub struct Trainer {
    /// The maximum number of environment steps.
    total_timesteps: usize,

    /// Warmup period, for filling replay buffer, in environment steps.
    warmup_period: usize,

    /// Interval of optimization in environment steps.
    opt_interval: usize,

    /// Interval of flushing records in environment steps.
    flush_records_interval: usize,
}

impl Trainer {
    /// Constructs a trainer.
    pub fn build(config: TrainerConfig) -> Self {
        Self {
            total_timesteps: config.total_timesteps,
            warmup_period: config.warmup_period,
            opt_interval: config.opt_interval.max(1),
            flush_records_interval: config.flush_record_interval.max(1),
        }
    }

    /// Trains the agent until the step budget is used up or the hook returns `false`.
    pub fn train<E, P, A, R, H>(
        &mut self,
        env: E,
        step_proc: P,
        agent: &mut A,
        buffer: &mut R,
        recorder: &mut dyn AggregateRecorder,
        hook: &mut H,
    ) -> Result<TrainReport>
    where
        E: Env,
        P: StepProcessor<E>,
        A: Agent<E, R>,
        R: ExperienceBufferBase<Item = P::Output> + ReplayBufferBase,
        H: StepHook,
    {
        let mut sampler = Sampler::new(env, step_proc);
        let mut env_steps: usize = 0;
        let mut opt_steps: usize = 0;
        let mut done = false;
        let mut stopped_by_hook = false;
        let timer = Instant::now();
        agent.train();

        for t in 0..self.total_timesteps {
            if !hook.on_step(&StepContext::new(t, done)) {
                stopped_by_hook = true;
                break;
            }

            let (mut record, is_done) = sampler.sample_and_push(agent, buffer)?;
            env_steps += 1;
            done = is_done;

            if env_steps > self.warmup_period && env_steps % self.opt_interval == 0 {
                let record_agent = agent.opt_with_record(buffer)?;
                opt_steps += 1;
                record = record.merge(record_agent);
            }

            if !record.is_empty() {
                recorder.store(record);
            }

            if env_steps % self.flush_records_interval == 0 {
                let fps = env_steps as f32 / timer.elapsed().as_secs_f32();
                recorder.store(Record::from_slice(&[("fps", Scalar(fps))]));
                recorder.flush(env_steps as _);
            }
        }

        recorder.flush(env_steps as _);
        debug!(
            "Finished training: {} env steps, {} opt steps, {} episodes",
            env_steps,
            opt_steps,
            sampler.n_episodes()
        );

        Ok(TrainReport {
            env_steps,
            opt_steps,
            episodes: sampler.n_episodes(),
            stopped_by_hook,
            mean_return: sampler.mean_return(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{record::NullRecorder, Act, EpisodeStopCallback, Obs, Policy, Step};
    use std::path::Path;

    #[derive(Clone, Debug)]
    struct TestObs(usize);

    impl Obs for TestObs {
        fn dummy(_n: usize) -> Self {
            Self(0)
        }

        fn len(&self) -> usize {
            1
        }
    }

    #[derive(Clone, Debug)]
    struct TestAct;

    impl Act for TestAct {}

    /// Episodes of fixed length with reward 1 per step.
    struct TestEnv {
        len: usize,
        t: usize,
    }

    impl Env for TestEnv {
        type Config = usize;
        type Obs = TestObs;
        type Act = TestAct;
        type Info = ();

        fn build(config: &Self::Config, _seed: i64) -> Result<Self> {
            Ok(Self { len: *config, t: 0 })
        }

        fn step(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)> {
            self.t += 1;
            let step = Step::new(
                TestObs(self.t),
                a.clone(),
                vec![1.0],
                vec![(self.t >= self.len) as i8],
                vec![0],
                (),
                None,
            );
            Ok((step, Record::empty()))
        }

        fn reset(&mut self, _is_done: Option<&Vec<i8>>) -> Result<Self::Obs> {
            self.t = 0;
            Ok(TestObs(0))
        }

        fn reset_with_index(&mut self, _ix: usize) -> Result<Self::Obs> {
            self.reset(None)
        }
    }

    /// Emits the reward of each step.
    struct RewardProcessor;

    impl StepProcessor<TestEnv> for RewardProcessor {
        type Config = ();
        type Output = f32;

        fn build(_config: &Self::Config) -> Self {
            Self
        }

        fn reset(&mut self, _init_obs: TestObs) {}

        fn process(&mut self, step: Step<TestEnv>) -> f32 {
            step.reward[0]
        }
    }

    #[derive(Default)]
    struct TestBuffer(Vec<f32>);

    impl ExperienceBufferBase for TestBuffer {
        type Item = f32;

        fn push(&mut self, tr: f32) -> Result<()> {
            self.0.push(tr);
            Ok(())
        }

        fn len(&self) -> usize {
            self.0.len()
        }
    }

    impl ReplayBufferBase for TestBuffer {
        type Config = ();
        type Batch = ();

        fn build(_config: &Self::Config) -> Self {
            Self::default()
        }

        fn batch(&mut self, _size: usize) -> Result<()> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct TestAgent {
        n_opts: usize,
        train: bool,
    }

    impl Policy<TestEnv> for TestAgent {
        fn sample(&mut self, _obs: &TestObs) -> Result<TestAct> {
            Ok(TestAct)
        }
    }

    impl Agent<TestEnv, TestBuffer> for TestAgent {
        fn train(&mut self) {
            self.train = true;
        }

        fn eval(&mut self) {
            self.train = false;
        }

        fn is_train(&self) -> bool {
            self.train
        }

        fn opt_with_record(&mut self, buffer: &mut TestBuffer) -> Result<Record> {
            assert!(!buffer.is_empty());
            self.n_opts += 1;
            Ok(Record::from_scalar("loss", 0.0))
        }

        fn save_params(&self, _path: &Path) -> Result<()> {
            Ok(())
        }

        fn load_params(&mut self, _path: &Path) -> Result<()> {
            Ok(())
        }
    }

    fn train<H: StepHook>(
        config: TrainerConfig,
        episode_len: usize,
        hook: &mut H,
    ) -> Result<(TrainReport, TestAgent, TestBuffer)> {
        let env = TestEnv::build(&episode_len, 0)?;
        let mut agent = TestAgent::default();
        let mut buffer = TestBuffer::default();
        let mut recorder = NullRecorder::default();
        let report = Trainer::build(config).train(
            env,
            RewardProcessor,
            &mut agent,
            &mut buffer,
            &mut recorder,
            hook,
        )?;
        Ok((report, agent, buffer))
    }

    #[test]
    fn test_budget_and_warmup() -> Result<()> {
        let config = TrainerConfig::default()
            .total_timesteps(20)
            .warmup_period(5)
            .opt_interval(2);
        let (report, agent, buffer) = train(config, 4, &mut |_: &StepContext| true)?;

        assert_eq!(report.env_steps, 20);
        assert_eq!(buffer.len(), 20);
        // env steps 6, 8, ..., 20
        assert_eq!(report.opt_steps, 8);
        assert_eq!(agent.n_opts, 8);
        assert!(agent.is_train());
        assert_eq!(report.episodes, 5);
        assert_eq!(report.mean_return, Some(4.0));
        assert!(!report.stopped_by_hook);
        Ok(())
    }

    #[test]
    fn test_stop_after_episodes() -> Result<()> {
        let config = TrainerConfig::default().total_timesteps(1000).warmup_period(0);
        let mut hook = EpisodeStopCallback::new(3);
        let (report, _, _) = train(config, 5, &mut hook)?;

        // Stops right after the step that ends the third episode
        assert!(report.stopped_by_hook);
        assert_eq!(report.env_steps, 15);
        assert_eq!(report.episodes, 3);
        assert_eq!(hook.n_episodes(), 3);
        Ok(())
    }

    #[test]
    fn test_hook_sees_previous_done() -> Result<()> {
        let config = TrainerConfig::default().total_timesteps(7);
        let mut seen = vec![];
        let mut hook = |ctx: &StepContext| {
            seen.push((ctx.step, ctx.done));
            true
        };
        let (report, _, _) = train(config, 3, &mut hook)?;
        assert_eq!(report.opt_steps, 0);
        assert_eq!(report.mean_return, Some(3.0));
        assert_eq!(
            seen,
            vec![
                (0, false),
                (1, false),
                (2, false),
                (3, true),
                (4, false),
                (5, false),
                (6, true)
            ]
        );
        Ok(())
    }

    #[test]
    fn test_no_episode_end() -> Result<()> {
        let config = TrainerConfig::default().total_timesteps(3);
        let (report, _, _) = train(config, 100, &mut |_: &StepContext| true)?;
        assert_eq!(report.episodes, 0);
        assert_eq!(report.mean_return, None);
        Ok(())
    }
}
