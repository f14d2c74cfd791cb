//! Utilities.
use anyhow::{anyhow, Result};
use candle_core::{DType, Device, Tensor, WithDType};
use candle_nn::VarMap;
use log::trace;
use ndarray::ArrayD;
use num_traits::AsPrimitive;
use serde::{Deserialize, Serialize};

/// Critic loss type.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub enum CriticLoss {
    /// Mean squared error.
    Mse,

    /// Smooth L1 loss.
    SmoothL1,
}

/// Apply soft update on variables.
///
/// Variables are identified by their names.
///
/// dest = tau * src + (1.0 - tau) * dest
pub fn track(dest: &VarMap, src: &VarMap, tau: f64) -> Result<()> {
    trace!("dest");
    let dest = dest
        .data()
        .lock()
        .map_err(|_| anyhow!("Failed to lock the destination VarMap"))?;
    trace!("src");
    let src = src
        .data()
        .lock()
        .map_err(|_| anyhow!("Failed to lock the source VarMap"))?;

    for (k_dest, v_dest) in dest.iter() {
        let v_src = src
            .get(k_dest)
            .ok_or_else(|| anyhow!("Variable {} is not in the source VarMap", k_dest))?;
        let t_src = v_src.as_tensor();
        let t_dest = v_dest.as_tensor();
        let t_dest = ((tau * t_src)? + ((1.0 - tau) * t_dest)?)?;
        v_dest.set(&t_dest)?;
    }

    Ok(())
}

/// Interface for handling output dimensions.
pub trait OutDim {
    /// Returns the output dimension.
    fn get_out_dim(&self) -> i64;

    /// Sets the  output dimension.
    fn set_out_dim(&mut self, v: i64);
}

/// See <https://pytorch.org/docs/stable/generated/torch.nn.SmoothL1Loss.html>.
pub fn smooth_l1_loss(x: &Tensor, y: &Tensor) -> Result<Tensor, candle_core::Error> {
    let device = x.device();
    let d = (x - y)?.abs()?;
    let m1 = d.lt(1.0)?.to_dtype(DType::F32)?.to_device(device)?;
    let m2 = Tensor::new(1f32, device)?.broadcast_sub(&m1)?;
    (((0.5 * m1)? * d.powf(2.0))? + m2 * (d - 0.5))?.mean_all()
}

/// Converts [`ArrayD`] into [`Tensor`] on the given device, keeping its shape.
pub fn arrayd_to_tensor<T1, T2>(a: ArrayD<T1>, device: &Device) -> Result<Tensor>
where
    T1: AsPrimitive<T2>,
    T2: WithDType,
{
    let shape = a.shape().to_vec();
    let v = a.iter().map(|e| e.as_()).collect::<Vec<T2>>();
    Ok(Tensor::from_vec(v, shape, device)?)
}

/// Returns `1 - is_terminated` as an f32 tensor.
///
/// Truncated transitions are not masked, so the value of their next state is bootstrapped.
pub fn not_terminated(is_terminated: &[i8], device: &Device) -> Result<Tensor> {
    let v = is_terminated
        .iter()
        .map(|e| 1f32 - *e as f32)
        .collect::<Vec<_>>();
    Ok(Tensor::from_slice(&v[..], (v.len(),), device)?)
}
