//! Trainable policies.
use super::{Env, Policy, ReplayBufferBase};
use crate::record::Record;
use anyhow::Result;
use std::path::Path;

/// A [`Policy`] that learns from batches of a replay buffer `R`.
///
/// [`Trainer`](crate::Trainer) switches the agent to training mode and calls
/// [`Agent::opt_with_record()`] once warmup is over.
pub trait Agent<E: Env, R: ReplayBufferBase>: Policy<E> {
    /// Enables exploration and learning.
    fn train(&mut self);

    /// Switches to greedy action selection.
    fn eval(&mut self);

    /// `true` in training mode.
    fn is_train(&self) -> bool;

    /// Runs one optimization step, discarding its metrics.
    fn opt(&mut self, buffer: &mut R) -> Result<()> {
        self.opt_with_record(buffer).map(|_| ())
    }

    /// Runs one optimization step on a batch drawn from `buffer` and returns
    /// metrics such as the loss.
    fn opt_with_record(&mut self, buffer: &mut R) -> Result<Record>;

    /// Writes the model parameters to the file `path`.
    fn save_params(&self, path: &Path) -> Result<()>;

    /// Restores the model parameters from the file `path`.
    fn load_params(&mut self, path: &Path) -> Result<()>;
}
