//! DQN agent implemented with [candle](https://crates.io/crates/candle-core).
mod array_batch;
pub mod dqn;
pub mod mlp;
pub mod model;
pub mod opt;
pub mod util;
pub use array_batch::ArrayBatch;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Copy, Deserialize, Serialize, PartialEq)]
/// Device for using candle.
///
/// This enum is added because [`candle_core::Device`] does not support serialization.
pub enum Device {
    /// The main CPU device.
    Cpu,

    /// The main GPU device.
    Cuda(usize),
}

impl TryFrom<Device> for candle_core::Device {
    type Error = candle_core::Error;

    /// Fails for [`Device::Cuda`] if candle was built without CUDA support.
    fn try_from(device: Device) -> Result<Self, Self::Error> {
        match device {
            Device::Cpu => Ok(candle_core::Device::Cpu),
            Device::Cuda(n) => candle_core::Device::new_cuda(n),
        }
    }
}
