use crate::Dynamics;
use rand::{rngs::StdRng, Rng};

const GRAVITY: f64 = 9.8;
const MASS_CART: f64 = 1.0;
const MASS_POLE: f64 = 0.1;
const TOTAL_MASS: f64 = MASS_CART + MASS_POLE;
/// Half the pole's length.
const LENGTH: f64 = 0.5;
const POLE_MASS_LENGTH: f64 = MASS_POLE * LENGTH;
const FORCE_MAG: f64 = 10.0;
const TAU: f64 = 0.02;
const THETA_THRESHOLD: f64 = 12.0 * 2.0 * std::f64::consts::PI / 360.0;
const X_THRESHOLD: f64 = 2.4;

/// A pole attached to a cart moving along a frictionless track.
///
/// State is `[x, x_dot, theta, theta_dot]`, integrated with the explicit Euler method.
#[derive(Default)]
pub(crate) struct CartPole {
    state: [f64; 4],
}

impl CartPole {
    fn obs(&self) -> Vec<f32> {
        self.state.iter().map(|v| *v as f32).collect()
    }
}

impl Dynamics for CartPole {
    fn reset(&mut self, rng: &mut StdRng) -> Vec<f32> {
        for v in self.state.iter_mut() {
            *v = rng.gen_range(-0.05..0.05);
        }
        self.obs()
    }

    fn step(&mut self, action: usize) -> (Vec<f32>, f32, bool) {
        let [x, x_dot, theta, theta_dot] = self.state;
        let force = if action == 1 { FORCE_MAG } else { -FORCE_MAG };
        let (sin_theta, cos_theta) = theta.sin_cos();

        let temp = (force + POLE_MASS_LENGTH * theta_dot.powi(2) * sin_theta) / TOTAL_MASS;
        let theta_acc = (GRAVITY * sin_theta - cos_theta * temp)
            / (LENGTH * (4.0 / 3.0 - MASS_POLE * cos_theta.powi(2) / TOTAL_MASS));
        let x_acc = temp - POLE_MASS_LENGTH * theta_acc * cos_theta / TOTAL_MASS;

        self.state = [
            x + TAU * x_dot,
            x_dot + TAU * x_acc,
            theta + TAU * theta_dot,
            theta_dot + TAU * theta_acc,
        ];

        let [x, _, theta, _] = self.state;
        let terminated = x.abs() > X_THRESHOLD || theta.abs() > THETA_THRESHOLD;

        (self.obs(), 1.0, terminated)
    }
}
