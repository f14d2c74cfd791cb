//! Experience sampling.
//!
//! [`Sampler`] takes an action from the agent, applies it to the environment,
//! converts the resulting step into a transition and pushes it into the
//! replay buffer. It also keeps returns of the completed episodes.
use crate::{record::Record, Agent, Env, ExperienceBufferBase, ReplayBufferBase, StepProcessor};
use anyhow::{anyhow, Result};

/// Manages the sampling of experiences from the environment.
pub struct Sampler<E, P>
where
    E: Env,
    P: StepProcessor<E>,
{
    env: E,

    /// Previous observation from the environment.
    prev_obs: Option<E::Obs>,

    step_processor: P,

    /// Return of the ongoing episode.
    episode_return: f32,

    /// Returns of the completed episodes.
    episode_returns: Vec<f32>,
}

impl<E, P> Sampler<E, P>
where
    E: Env,
    P: StepProcessor<E>,
{
    /// Creates a new sampler with the given environment and step processor.
    pub fn new(env: E, step_processor: P) -> Self {
        Self {
            env,
            prev_obs: None,
            step_processor,
            episode_return: 0.0,
            episode_returns: vec![],
        }
    }

    /// Samples an experience and pushes it to the replay buffer.
    ///
    /// The environment is reset on the first call and after every episode end.
    /// The second value of the returned tuple is `true` if the step ended an episode.
    pub fn sample_and_push<A, R>(&mut self, agent: &mut A, buffer: &mut R) -> Result<(Record, bool)>
    where
        A: Agent<E, R>,
        R: ExperienceBufferBase<Item = P::Output> + ReplayBufferBase,
    {
        let prev_obs = match self.prev_obs.take() {
            Some(obs) => obs,
            None => {
                let obs = self.env.reset(None)?;
                self.step_processor.reset(obs.clone());
                obs
            }
        };

        let act = agent.sample(&prev_obs)?;
        let (step, record) = self.env.step_with_reset(&act)?;
        let is_done = step.is_done(); // not support vectorized env
        self.episode_return += step.reward[0];

        self.prev_obs = match is_done {
            true => Some(
                step.init_obs
                    .clone()
                    .ok_or_else(|| anyhow!("Environment was not reset after an episode end"))?,
            ),
            false => Some(step.obs.clone()),
        };

        let transition = self.step_processor.process(step);
        buffer.push(transition)?;

        if is_done {
            if let Some(obs) = self.prev_obs.as_ref() {
                self.step_processor.reset(obs.clone());
            }
            self.episode_returns.push(self.episode_return);
            self.episode_return = 0.0;
        }

        Ok((record, is_done))
    }

    /// The number of completed episodes.
    pub fn n_episodes(&self) -> usize {
        self.episode_returns.len()
    }

    /// Returns of the completed episodes.
    pub fn episode_returns(&self) -> &[f32] {
        &self.episode_returns
    }

    /// Mean of the returns of the completed episodes, `None` before the first episode end.
    pub fn mean_return(&self) -> Option<f32> {
        match self.episode_returns.is_empty() {
            true => None,
            false => Some(self.episode_returns.iter().sum::<f32>() / self.n_episodes() as f32),
        }
    }
}
