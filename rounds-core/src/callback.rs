//! Per-step hooks of the training loop.
//!
//! [`Trainer::train()`](crate::Trainer::train) calls a [`StepHook`] before
//! every environment step and stops as soon as the hook returns `false`.

/// Information given to a [`StepHook`] before an environment step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepContext {
    /// Zero-based index of the environment step about to be executed.
    pub step: usize,

    /// Whether the previous environment step ended an episode.
    ///
    /// Always `false` for step 0.
    pub done: bool,
}

impl StepContext {
    /// Constructs a step context.
    pub fn new(step: usize, done: bool) -> Self {
        Self { step, done }
    }
}

/// A hook called by the training loop before each environment step.
pub trait StepHook {
    /// Returns `true` to continue training, `false` to stop.
    fn on_step(&mut self, ctx: &StepContext) -> bool;
}

impl<F> StepHook for F
where
    F: FnMut(&StepContext) -> bool,
{
    fn on_step(&mut self, ctx: &StepContext) -> bool {
        self(ctx)
    }
}

/// Stops training after a given number of completed episodes.
///
/// The first invocation (step 0) happens before any step was executed and
/// never counts as an episode end. Once the hook has returned `false` it keeps
/// returning `false` until [`EpisodeStopCallback::reset()`]. With
/// `max_episodes == 0` the hook still returns `true` until the first episode
/// end is observed.
///
/// ```
/// use rounds_core::{EpisodeStopCallback, StepContext, StepHook};
///
/// let mut cb = EpisodeStopCallback::new(1);
/// assert!(cb.on_step(&StepContext::new(0, true)));
/// assert!(cb.on_step(&StepContext::new(1, false)));
/// assert!(!cb.on_step(&StepContext::new(2, true)));
/// assert!(!cb.on_step(&StepContext::new(3, false)));
/// ```
#[derive(Clone, Debug)]
pub struct EpisodeStopCallback {
    max_episodes: usize,
    n_episodes: usize,
}

impl EpisodeStopCallback {
    /// Constructs a callback stopping after `max_episodes` episodes.
    pub fn new(max_episodes: usize) -> Self {
        Self {
            max_episodes,
            n_episodes: 0,
        }
    }

    /// Sets the episode counter back to zero.
    pub fn reset(&mut self) {
        self.n_episodes = 0;
    }

    /// The number of episodes observed so far.
    pub fn n_episodes(&self) -> usize {
        self.n_episodes
    }

    /// The number of episodes after which training stops.
    pub fn max_episodes(&self) -> usize {
        self.max_episodes
    }
}

impl StepHook for EpisodeStopCallback {
    fn on_step(&mut self, ctx: &StepContext) -> bool {
        if ctx.step > 0 && ctx.done {
            self.n_episodes += 1;
        }
        // Zero episodes still waits for the first episode end
        self.n_episodes < self.max_episodes.max(1)
    }
}
