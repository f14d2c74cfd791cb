#![warn(missing_docs)]
//! Core components for running DQN training rounds.
//!
//! This crate provides the interfaces shared by environments and agents
//! ([`Env`], [`Agent`], [`Policy`]), the training loop ([`Trainer`]) with its
//! per-step hook ([`StepHook`]), the episode-count stop rule
//! ([`EpisodeStopCallback`]) and the episode-logging wrapper ([`Monitor`]).
pub mod callback;
pub mod error;
pub mod generic_replay_buffer;
pub mod monitor;
pub mod record;

mod base;
pub use base::{
    Act, Agent, Configurable, Env, ExperienceBufferBase, Info, Obs, Policy, ReplayBufferBase,
    Step, StepProcessor, TransitionBatch,
};

pub use callback::{EpisodeStopCallback, StepContext, StepHook};
pub use monitor::{Monitor, MonitorConfig};

mod trainer;
pub use trainer::{Sampler, TrainReport, Trainer, TrainerConfig};
