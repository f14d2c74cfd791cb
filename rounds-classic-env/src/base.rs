//! Environment wrapping the classic-control dynamics.
use crate::{ClassicEnvConfig, Dynamics, EnvId};
use anyhow::Result;
use log::trace;
use ndarray::{ArrayD, IxDyn};
use rand::{rngs::StdRng, SeedableRng};
use rounds_core::{error::RoundsError, record::Record, Act, Env, Info, Obs, Step};
use std::marker::PhantomData;

/// Information given at every step of the interaction with the environment.
///
/// Currently, it is empty and used to match the type signature.
pub struct ClassicInfo {}

impl Info for ClassicInfo {}

/// A classic-control environment with a time limit.
///
/// Reaching the time limit sets `is_truncated`; reaching a terminal state of
/// the dynamics sets `is_terminated`.
pub struct ClassicEnv<O, A> {
    env_id: EnvId,
    dynamics: Box<dyn Dynamics>,
    rng: StdRng,
    count_steps: usize,
    max_steps: usize,
    phantom: PhantomData<(O, A)>,
}

impl<O, A> ClassicEnv<O, A>
where
    O: Obs + From<ArrayD<f32>>,
    A: Act + Into<Vec<i32>>,
{
    /// Identifier of the environment.
    pub fn env_id(&self) -> EnvId {
        self.env_id
    }

    /// Time limit of an episode.
    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    fn to_obs(v: Vec<f32>) -> Result<O> {
        let n = v.len();
        Ok(ArrayD::from_shape_vec(IxDyn(&[1, n]), v)?.into())
    }

    fn action_index(&self, a: &A) -> Result<usize> {
        let n_actions = self.env_id.n_actions();
        let act: Vec<i32> = a.clone().into();
        match act.first() {
            Some(&v) if v >= 0 && (v as usize) < n_actions => Ok(v as usize),
            Some(&v) => Err(RoundsError::InvalidAction {
                action: v,
                n_actions,
            }
            .into()),
            None => Err(RoundsError::InvalidAction {
                action: -1,
                n_actions,
            }
            .into()),
        }
    }
}

impl<O, A> Env for ClassicEnv<O, A>
where
    O: Obs + From<ArrayD<f32>>,
    A: Act + Into<Vec<i32>>,
{
    type Config = ClassicEnvConfig;
    type Obs = O;
    type Act = A;
    type Info = ClassicInfo;

    /// Builds the environment. Fails if the name is not one of [`EnvId`].
    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        let env_id: EnvId = config.name.parse()?;
        Ok(Self {
            env_id,
            dynamics: env_id.dynamics(),
            rng: StdRng::seed_from_u64(seed as u64),
            count_steps: 0,
            max_steps: config.max_steps.unwrap_or(env_id.max_episode_steps()),
            phantom: PhantomData,
        })
    }

    /// Resets the environment if `is_done[0] == 1` or `is_done.is_none()`.
    ///
    /// Otherwise a dummy observation is returned.
    fn reset(&mut self, is_done: Option<&Vec<i8>>) -> Result<O> {
        trace!("ClassicEnv::reset()");
        let reset = match is_done {
            None => true,
            Some(v) => {
                debug_assert_eq!(v.len(), 1);
                v[0] != 0
            }
        };

        if !reset {
            return Ok(O::dummy(1));
        }

        self.count_steps = 0;
        Self::to_obs(self.dynamics.reset(&mut self.rng))
    }

    /// Reseeds the random number generator with `ix` and resets the environment.
    fn reset_with_index(&mut self, ix: usize) -> Result<O> {
        self.rng = StdRng::seed_from_u64(ix as u64);
        self.reset(None)
    }

    fn step(&mut self, a: &A) -> Result<(Step<Self>, Record)> {
        trace!("ClassicEnv::step()");
        let action = self.action_index(a)?;
        let (obs, reward, terminated) = self.dynamics.step(action);
        self.count_steps += 1;
        let truncated = !terminated && self.count_steps >= self.max_steps;

        let step = Step::new(
            Self::to_obs(obs)?,
            a.clone(),
            vec![reward],
            vec![terminated as i8],
            vec![truncated as i8],
            ClassicInfo {},
            None,
        );

        Ok((step, Record::empty()))
    }
}
