use crate::Dynamics;
use rand::{rngs::StdRng, Rng};
use std::f64::consts::PI;

const DT: f64 = 0.2;
const LINK_LENGTH_1: f64 = 1.0;
const LINK_MASS_1: f64 = 1.0;
const LINK_MASS_2: f64 = 1.0;
const LINK_COM_POS_1: f64 = 0.5;
const LINK_COM_POS_2: f64 = 0.5;
const LINK_MOI: f64 = 1.0;
const MAX_VEL_1: f64 = 4.0 * PI;
const MAX_VEL_2: f64 = 9.0 * PI;
const GRAVITY: f64 = 9.8;
const TORQUES: [f64; 3] = [-1.0, 0.0, 1.0];

/// Two links connected linearly with an actuated joint between them.
///
/// State is `[theta1, theta2, dtheta1, dtheta2]`; the observation is
/// `[cos theta1, sin theta1, cos theta2, sin theta2, dtheta1, dtheta2]`.
/// The equations of motion follow Sutton and Barto's book and are integrated
/// with a single fourth-order Runge-Kutta step.
#[derive(Default)]
pub(crate) struct Acrobot {
    state: [f64; 4],
}

fn wrap(mut x: f64, m: f64, big_m: f64) -> f64 {
    let diff = big_m - m;
    while x > big_m {
        x -= diff;
    }
    while x < m {
        x += diff;
    }
    x
}

/// Time derivative of `[theta1, theta2, dtheta1, dtheta2]` under torque `a`.
fn dsdt(s: [f64; 4], a: f64) -> [f64; 4] {
    let (m1, m2) = (LINK_MASS_1, LINK_MASS_2);
    let l1 = LINK_LENGTH_1;
    let (lc1, lc2) = (LINK_COM_POS_1, LINK_COM_POS_2);
    let (i1, i2) = (LINK_MOI, LINK_MOI);
    let g = GRAVITY;
    let [theta1, theta2, dtheta1, dtheta2] = s;

    let d1 = m1 * lc1.powi(2)
        + m2 * (l1.powi(2) + lc2.powi(2) + 2.0 * l1 * lc2 * theta2.cos())
        + i1
        + i2;
    let d2 = m2 * (lc2.powi(2) + l1 * lc2 * theta2.cos()) + i2;
    let phi2 = m2 * lc2 * g * (theta1 + theta2 - PI / 2.0).cos();
    let phi1 = -m2 * l1 * lc2 * dtheta2.powi(2) * theta2.sin()
        - 2.0 * m2 * l1 * lc2 * dtheta2 * dtheta1 * theta2.sin()
        + (m1 * lc1 + m2 * l1) * g * (theta1 - PI / 2.0).cos()
        + phi2;
    let ddtheta2 = (a + d2 / d1 * phi1 - m2 * l1 * lc2 * dtheta1.powi(2) * theta2.sin() - phi2)
        / (m2 * lc2.powi(2) + i2 - d2.powi(2) / d1);
    let ddtheta1 = -(d2 * ddtheta2 + phi1) / d1;

    [dtheta1, dtheta2, ddtheta1, ddtheta2]
}

fn rk4(s: [f64; 4], a: f64, dt: f64) -> [f64; 4] {
    let add = |x: [f64; 4], k: [f64; 4], h: f64| {
        let mut y = x;
        for i in 0..4 {
            y[i] += h * k[i];
        }
        y
    };
    let k1 = dsdt(s, a);
    let k2 = dsdt(add(s, k1, dt / 2.0), a);
    let k3 = dsdt(add(s, k2, dt / 2.0), a);
    let k4 = dsdt(add(s, k3, dt), a);

    let mut y = s;
    for i in 0..4 {
        y[i] += dt / 6.0 * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]);
    }
    y
}

impl Acrobot {
    fn obs(&self) -> Vec<f32> {
        let [theta1, theta2, dtheta1, dtheta2] = self.state;
        [
            theta1.cos(),
            theta1.sin(),
            theta2.cos(),
            theta2.sin(),
            dtheta1,
            dtheta2,
        ]
        .iter()
        .map(|v| *v as f32)
        .collect()
    }

    fn is_terminal(&self) -> bool {
        let [theta1, theta2, _, _] = self.state;
        -theta1.cos() - (theta2 + theta1).cos() > 1.0
    }
}

impl Dynamics for Acrobot {
    fn reset(&mut self, rng: &mut StdRng) -> Vec<f32> {
        for v in self.state.iter_mut() {
            *v = rng.gen_range(-0.1..0.1);
        }
        self.obs()
    }

    fn step(&mut self, action: usize) -> (Vec<f32>, f32, bool) {
        let ns = rk4(self.state, TORQUES[action], DT);
        self.state = [
            wrap(ns[0], -PI, PI),
            wrap(ns[1], -PI, PI),
            ns[2].clamp(-MAX_VEL_1, MAX_VEL_1),
            ns[3].clamp(-MAX_VEL_2, MAX_VEL_2),
        ];

        let terminated = self.is_terminal();
        let reward = if terminated { 0.0 } else { -1.0 };

        (self.obs(), reward, terminated)
    }
}
