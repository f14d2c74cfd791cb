use super::{mlp_forward, MlpConfig};
use crate::model::SubModel1;
use anyhow::{Context, Result};
use candle_core::{Device, Tensor, D};
use candle_nn::{linear, Linear, Module, VarBuilder};

/// Returns the hidden layers of [`MlpConfig`] followed by the output layer(s).
fn create_linear_layers(
    prefix: &str,
    vs: VarBuilder,
    config: &MlpConfig,
) -> Result<(Vec<Linear>, Head)> {
    let vs = vs.pp(prefix);
    let mut in_out_pairs: Vec<(usize, usize)> = config
        .units
        .windows(2)
        .map(|w| (w[0] as usize, w[1] as usize))
        .collect();
    let first = *config.units.first().context("MLP needs at least one hidden layer")?;
    in_out_pairs.insert(0, (config.in_dim as usize, first as usize));
    let last = *config.units.last().context("MLP needs at least one hidden layer")? as usize;

    let hidden = in_out_pairs
        .iter()
        .enumerate()
        .map(|(i, &(in_dim, out_dim))| linear(in_dim, out_dim, vs.pp(format!("ln{}", i))))
        .collect::<candle_core::Result<Vec<_>>>()?;

    let n = hidden.len();
    let out_dim = config.out_dim as usize;
    let head = match config.dueling {
        false => Head::Single(linear(last, out_dim, vs.pp(format!("ln{}", n)))?),
        true => Head::Dueling {
            value: linear(last, 1, vs.pp("value"))?,
            advantage: linear(last, out_dim, vs.pp("advantage"))?,
        },
    };

    Ok((hidden, head))
}

enum Head {
    Single(Linear),
    Dueling { value: Linear, advantage: Linear },
}

impl Head {
    fn forward(&self, xs: &Tensor) -> candle_core::Result<Tensor> {
        match self {
            Self::Single(ln) => ln.forward(xs),
            Self::Dueling { value, advantage } => {
                let v = value.forward(xs)?;
                let a = advantage.forward(xs)?;
                let a = a.broadcast_sub(&a.mean_keepdim(D::Minus1)?)?;
                a.broadcast_add(&v)
            }
        }
    }
}

/// Multilayer perceptron with ReLU activation function.
///
/// With [`MlpConfig::dueling`], the output is `V(s) + A(s, a) - mean_a A(s, a)`.
pub struct Mlp {
    config: MlpConfig,
    device: Device,
    layers: Vec<Linear>,
    head: Head,
}

impl SubModel1 for Mlp {
    type Config = MlpConfig;
    type Input = Tensor;
    type Output = Tensor;

    fn forward(&self, xs: &Self::Input) -> Result<Tensor> {
        let xs = xs.to_device(&self.device)?;
        let xs = mlp_forward(xs, &self.layers)?;
        let xs = self.head.forward(&xs)?;

        Ok(match self.config.activation_out {
            false => xs,
            true => xs.relu()?,
        })
    }

    fn build(vs: VarBuilder, config: Self::Config) -> Result<Self> {
        let device = vs.device().clone();
        let (layers, head) = create_linear_layers("mlp", vs, &config)?;

        Ok(Self {
            config,
            device,
            layers,
            head,
        })
    }
}
