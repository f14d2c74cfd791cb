//! Optimizers of the Q-network.
use anyhow::Result;
use candle_core::{Tensor, Var};
use candle_nn::{AdamW, Optimizer as _, ParamsAdamW};
use candle_optimisers::adam::{Adam, ParamsAdam};
use serde::{Deserialize, Serialize};

/// Optimizer settings, stored in the agent's YAML configuration.
///
/// Unspecified AdamW coefficients fall back to candle's defaults.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub enum OptimizerConfig {
    /// Adam with decoupled weight decay.
    AdamW {
        lr: f64,
        #[serde(default = "adamw_defaults::beta1")]
        beta1: f64,
        #[serde(default = "adamw_defaults::beta2")]
        beta2: f64,
        #[serde(default = "adamw_defaults::eps")]
        eps: f64,
        #[serde(default = "adamw_defaults::weight_decay")]
        weight_decay: f64,
    },

    /// Plain Adam.
    Adam { lr: f64 },
}

mod adamw_defaults {
    use candle_nn::ParamsAdamW;

    pub fn beta1() -> f64 {
        ParamsAdamW::default().beta1
    }

    pub fn beta2() -> f64 {
        ParamsAdamW::default().beta2
    }

    pub fn eps() -> f64 {
        ParamsAdamW::default().eps
    }

    pub fn weight_decay() -> f64 {
        ParamsAdamW::default().weight_decay
    }
}

impl Default for OptimizerConfig {
    /// Adam with learning rate 5e-4.
    fn default() -> Self {
        Self::Adam { lr: 5e-4 }
    }
}

impl OptimizerConfig {
    /// Creates an optimizer updating `vars`.
    pub fn build(&self, vars: Vec<Var>) -> Result<Optimizer> {
        Ok(match *self {
            Self::AdamW {
                lr,
                beta1,
                beta2,
                eps,
                weight_decay,
            } => Optimizer::AdamW(AdamW::new(
                vars,
                ParamsAdamW {
                    lr,
                    beta1,
                    beta2,
                    eps,
                    weight_decay,
                },
            )?),
            Self::Adam { lr } => Optimizer::Adam(Adam::new(
                vars,
                ParamsAdam {
                    lr,
                    ..Default::default()
                },
            )?),
        })
    }

    /// Replaces the learning rate, keeping the other coefficients.
    pub fn learning_rate(mut self, v: f64) -> Self {
        match &mut self {
            Self::AdamW { lr, .. } | Self::Adam { lr } => *lr = v,
        }
        self
    }
}

/// An optimizer built from [`OptimizerConfig`].
pub enum Optimizer {
    AdamW(AdamW),
    Adam(Adam),
}

impl Optimizer {
    /// Backpropagates `loss` and updates the variables.
    pub fn backward_step(&mut self, loss: &Tensor) -> Result<()> {
        match self {
            Self::AdamW(opt) => opt.backward_step(loss)?,
            Self::Adam(opt) => opt.backward_step(loss)?,
        }
        Ok(())
    }
}
