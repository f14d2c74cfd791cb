use crate::Dynamics;
use rand::{rngs::StdRng, Rng};

const MIN_POSITION: f64 = -1.2;
const MAX_POSITION: f64 = 0.6;
const MAX_SPEED: f64 = 0.07;
const GOAL_POSITION: f64 = 0.5;
const GOAL_VELOCITY: f64 = 0.0;
const FORCE: f64 = 0.001;
const GRAVITY: f64 = 0.0025;

/// An underpowered car in a valley, which must build momentum to reach the hilltop.
///
/// State is `[position, velocity]`. Actions are push left, no push and push right.
#[derive(Default)]
pub(crate) struct MountainCar {
    position: f64,
    velocity: f64,
}

impl MountainCar {
    fn obs(&self) -> Vec<f32> {
        vec![self.position as f32, self.velocity as f32]
    }
}

impl Dynamics for MountainCar {
    fn reset(&mut self, rng: &mut StdRng) -> Vec<f32> {
        self.position = rng.gen_range(-0.6..-0.4);
        self.velocity = 0.0;
        self.obs()
    }

    fn step(&mut self, action: usize) -> (Vec<f32>, f32, bool) {
        self.velocity += (action as f64 - 1.0) * FORCE - (3.0 * self.position).cos() * GRAVITY;
        self.velocity = self.velocity.clamp(-MAX_SPEED, MAX_SPEED);
        self.position += self.velocity;
        self.position = self.position.clamp(MIN_POSITION, MAX_POSITION);
        if self.position == MIN_POSITION && self.velocity < 0.0 {
            self.velocity = 0.0;
        }

        let terminated = self.position >= GOAL_POSITION && self.velocity >= GOAL_VELOCITY;

        (self.obs(), -1.0, terminated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_no_push_stays_in_valley() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut car = MountainCar::default();
        car.reset(&mut rng);
        for _ in 0..200 {
            let (obs, reward, terminated) = car.step(1);
            assert_eq!(reward, -1.0);
            assert!(!terminated);
            assert!(obs[0] < 0.0);
        }
    }

    #[test]
    fn test_swing_reaches_goal() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut car = MountainCar::default();
        car.reset(&mut rng);

        // Push in the direction of the velocity
        let mut velocity = 0.0;
        let reached = (0..1000).any(|_| {
            let action = if velocity < 0.0 { 0 } else { 2 };
            let (obs, _, terminated) = car.step(action);
            velocity = obs[1];
            terminated
        });
        assert!(reached);
    }
}
