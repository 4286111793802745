//! Spring physics
//!
//! RK4 integration of a damped harmonic oscillator:
//! `acceleration = -spring * displacement - friction * velocity`.
//!
//! The integrator is a pure function of its inputs. Callers advance their own
//! state by `derivative * dt`.

use crate::vector::Interpolatable;
use lightbox_core::TransitionConfig;

/// Rates of change produced by one integration step
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Derivative<T> {
    /// Position rate (weighted velocity)
    pub dpdt: T,
    /// Velocity rate (weighted acceleration)
    pub dvdt: T,
}

/// Damped spring constants
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringIntegrator {
    pub spring: f32,
    pub friction: f32,
}

impl SpringIntegrator {
    pub fn new(spring: f32, friction: f32) -> Self {
        Self { spring, friction }
    }

    /// Constants tuned for photo transitions
    pub fn from_config(config: &TransitionConfig) -> Self {
        Self::new(config.spring, config.friction)
    }

    /// Friction at which the spring stops oscillating (unit mass)
    pub fn critical_friction(&self) -> f32 {
        2.0 * self.spring.sqrt()
    }

    /// Check if the spring overshoots before settling
    pub fn is_underdamped(&self) -> bool {
        self.friction < self.critical_friction()
    }

    /// One RK4 step from `displacement` (current minus target) and `velocity`
    pub fn integrate<T: Interpolatable>(&self, displacement: T, velocity: T, dt: f32) -> Derivative<T> {
        let k1_x = velocity;
        let k1_v = self.acceleration(displacement, velocity);

        let k2_x = velocity + k1_v * (dt * 0.5);
        let k2_v = self.acceleration(
            displacement + k1_x * (dt * 0.5),
            velocity + k1_v * (dt * 0.5),
        );

        let k3_x = velocity + k2_v * (dt * 0.5);
        let k3_v = self.acceleration(
            displacement + k2_x * (dt * 0.5),
            velocity + k2_v * (dt * 0.5),
        );

        let k4_x = velocity + k3_v * dt;
        let k4_v = self.acceleration(displacement + k3_x * dt, velocity + k3_v * dt);

        Derivative {
            dpdt: (k1_x + (k2_x + k3_x) * 2.0 + k4_x) * (1.0 / 6.0),
            dvdt: (k1_v + (k2_v + k3_v) * 2.0 + k4_v) * (1.0 / 6.0),
        }
    }

    fn acceleration<T: Interpolatable>(&self, x: T, v: T) -> T {
        -(x * self.spring) - v * self.friction
    }
}

impl Default for SpringIntegrator {
    fn default() -> Self {
        Self::from_config(&TransitionConfig::default())
    }
}
