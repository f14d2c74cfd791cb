//! Outcome of a single environment step.
use super::Env;

/// Extra data an environment attaches to each [`Step`].
pub trait Info {}

impl Info for () {}

/// What an environment returns after applying an action.
///
/// Holds the applied action `a_t`, the next observation `o_t+1`, the reward
/// `r_t` and the end-of-episode flags. Environments here are not vectorized,
/// so every vector has length 1.
pub struct Step<E: Env> {
    /// The applied action.
    pub act: E::Act,

    /// Observation after the action.
    pub obs: E::Obs,

    /// Reward of the step.
    pub reward: Vec<f32>,

    /// `1` if the episode reached a terminal state.
    pub is_terminated: Vec<i8>,

    /// `1` if the episode was cut by a time limit.
    pub is_truncated: Vec<i8>,

    /// Environment-specific data.
    pub info: E::Info,

    /// First observation of the next episode.
    ///
    /// Filled by [`Env::step_with_reset()`] when the step ended an episode.
    pub init_obs: Option<E::Obs>,
}

impl<E: Env> Step<E> {
    /// Bundles the outcome of a step.
    pub fn new(
        obs: E::Obs,
        act: E::Act,
        reward: Vec<f32>,
        is_terminated: Vec<i8>,
        is_truncated: Vec<i8>,
        info: E::Info,
        init_obs: Option<E::Obs>,
    ) -> Self {
        Step {
            act,
            obs,
            reward,
            is_terminated,
            is_truncated,
            info,
            init_obs,
        }
    }

    /// `true` if the episode ended, either terminated or truncated.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.is_terminated[0] == 1 || self.is_truncated[0] == 1
    }
}

/// Turns each [`Step`] into an item for the replay buffer.
///
/// [`Trainer`](crate::Trainer) feeds every step to the processor and pushes
/// the [`StepProcessor::Output`] into a buffer whose
/// [`ExperienceBufferBase::Item`](crate::ExperienceBufferBase::Item) is the
/// same type.
pub trait StepProcessor<E: Env> {
    /// Configuration.
    type Config: Clone;

    /// Transition type pushed into the buffer.
    type Output;

    /// Builds the processor.
    fn build(config: &Self::Config) -> Self;

    /// Starts a new episode from its first observation.
    fn reset(&mut self, init_obs: E::Obs);

    /// Converts a step into a transition.
    fn process(&mut self, step: Step<E>) -> Self::Output;
}
