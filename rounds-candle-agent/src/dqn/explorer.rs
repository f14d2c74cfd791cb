//! Exploration strategy of DQN.
use anyhow::Result;
use candle_core::{shape::D, Tensor};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Epsilon-greedy explorer for DQN.
///
/// Epsilon is linearly annealed from `eps_start` to `eps_final` over
/// `final_step` action selections and stays at `eps_final` afterwards.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct EpsilonGreedy {
    pub n_steps: usize,
    pub eps_start: f64,
    pub eps_final: f64,
    pub final_step: usize,
}

impl Default for EpsilonGreedy {
    fn default() -> Self {
        Self {
            n_steps: 0,
            eps_start: 1.0,
            eps_final: 0.02,
            final_step: 10_000,
        }
    }
}

impl EpsilonGreedy {
    /// Constructs epsilon-greedy explorer annealed over `final_step` steps.
    pub fn with_final_step(final_step: usize) -> Self {
        Self {
            final_step,
            ..Self::default()
        }
    }

    /// Current value of epsilon.
    pub fn eps(&self) -> f64 {
        let d = (self.eps_start - self.eps_final) / (self.final_step.max(1) as f64);
        (self.eps_start - d * self.n_steps as f64).max(self.eps_final)
    }

    /// Takes an action based on action values of shape `[n_samples, n_actions]`.
    pub fn action(&mut self, a: &Tensor, rng: &mut impl Rng) -> Result<Vec<i32>> {
        let is_random = rng.gen::<f64>() < self.eps();
        self.n_steps += 1;

        if is_random {
            let (n_samples, n_actions) = a.dims2()?;
            Ok((0..n_samples)
                .map(|_| rng.gen_range(0..n_actions) as i32)
                .collect())
        } else {
            greedy(a)
        }
    }

    /// Set the epsilon value at the final step.
    pub fn eps_final(mut self, v: f64) -> Self {
        self.eps_final = v;
        self
    }

    /// Set the epsilon value at the start.
    pub fn eps_start(mut self, v: f64) -> Self {
        self.eps_start = v;
        self
    }
}

/// Returns the actions with the largest values.
pub(super) fn greedy(a: &Tensor) -> Result<Vec<i32>> {
    Ok(a.argmax(D::Minus1)?
        .to_vec1::<u32>()?
        .into_iter()
        .map(|v| v as i32)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::Device;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_schedule() {
        let mut explorer = EpsilonGreedy::with_final_step(100);
        assert_eq!(explorer.eps(), 1.0);
        explorer.n_steps = 50;
        assert!((explorer.eps() - 0.51).abs() < 1e-9);
        explorer.n_steps = 100;
        assert!((explorer.eps() - 0.02).abs() < 1e-9);
        explorer.n_steps = 1000;
        assert!((explorer.eps() - 0.02).abs() < 1e-9);
    }

    #[test]
    fn test_greedy_after_annealing() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(0);
        let mut explorer = EpsilonGreedy::with_final_step(1).eps_final(0.0);
        explorer.n_steps = 1;
        let q = Tensor::from_slice(&[0.1f32, 0.9, 0.3, 0.5, 0.2, 0.1], (2, 3), &Device::Cpu)?;
        for _ in 0..10 {
            assert_eq!(explorer.action(&q, &mut rng)?, vec![1, 0]);
        }
        assert_eq!(explorer.n_steps, 11);
        Ok(())
    }

    #[test]
    fn test_random_actions_in_range() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(0);
        let mut explorer = EpsilonGreedy::default();
        let q = Tensor::zeros((1, 3), candle_core::DType::F32, &Device::Cpu)?;
        for _ in 0..100 {
            let act = explorer.action(&q, &mut rng)?;
            assert_eq!(act.len(), 1);
            assert!((0..3).contains(&act[0]));
        }
        Ok(())
    }
}
