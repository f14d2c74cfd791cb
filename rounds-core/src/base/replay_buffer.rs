//! Storage of transitions.
use anyhow::Result;

/// Write side of a replay buffer.
pub trait ExperienceBufferBase {
    /// Transition type accepted by the buffer.
    type Item;

    /// Stores a transition.
    fn push(&mut self, tr: Self::Item) -> Result<()>;

    /// Number of stored transitions.
    fn len(&self) -> usize;

    /// `true` if nothing was stored yet.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Read side of a replay buffer: draws training batches.
pub trait ReplayBufferBase {
    /// Configuration type.
    type Config: Clone;

    /// Batch handed to [`Agent::opt_with_record()`](crate::Agent::opt_with_record).
    type Batch;

    /// Builds an empty buffer.
    fn build(config: &Self::Config) -> Self;

    /// Draws a batch of `size` transitions. Fails on an empty buffer.
    fn batch(&mut self, size: usize) -> Result<Self::Batch>;
}
