//! Generic implementation of replay buffers.
//!
//! The buffer stores transitions of arbitrary observation and action types,
//! as long as their batch representations implement [`BatchBase`].
//!
//! - [`SimpleReplayBuffer`]: a ring buffer with uniform sampling
//! - [`GenericTransitionBatch`]: a batch of transitions
//! - [`SimpleStepProcessor`]: converts environment steps into transitions
mod base;
mod batch;
mod config;
mod step_proc;
pub use base::SimpleReplayBuffer;
pub use batch::{BatchBase, GenericTransitionBatch};
pub use config::SimpleReplayBufferConfig;
pub use step_proc::{SimpleStepProcessor, SimpleStepProcessorConfig};
