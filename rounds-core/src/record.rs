//! Types and traits for recording training metrics.
//!
//! # Basic Usage
//!
//! ```rust
//! use rounds_core::record::{Record, RecordValue};
//!
//! // following values are obtained with some process in reality
//! let step = 1;
//! let obs = vec![1f32, 2.0, 3.0, 4.0];
//! let reward = 1f32;
//!
//! let mut record = Record::empty();
//! record.insert("step", RecordValue::Scalar(step as f32));
//! record.insert("reward", RecordValue::Scalar(reward));
//! record.insert("obs", RecordValue::Array1(obs));
//! ```
//!
//! The [`Trainer`](crate::Trainer) stores records produced by environments
//! and agents into an [`AggregateRecorder`], which flushes aggregated values
//! periodically.
mod base;
mod logging_recorder;
mod null_recorder;
mod recorder;
mod storage;

pub use base::{Record, RecordValue};
pub use logging_recorder::LoggingRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::{AggregateRecorder, Recorder};
pub use storage::RecordStorage;
