//! Berendsen weak-coupling thermostat

use super::states::ParticleSystem;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Berendsen {
    pub target: f64, // target temperature
    pub tau: f64,    // coupling time constant
}

impl Berendsen {
    pub fn new(target: f64, tau: f64) -> Self {
        Self { target, tau }
    }

    /// Velocity scale factor `λ = sqrt(1 + (dt/τ)(T0/T - 1))` for the
    /// instantaneous temperature `t`. `None` when `t == 0`.
    pub fn lambda(&self, t: f64, dt: f64) -> Option<f64> {
        if t == 0.0 {
            return None;
        }
        // can only go negative for dt > τ with T far above target
        let radicand = 1.0 + (dt / self.tau) * (self.target / t - 1.0);
        Some(radicand.max(0.0).sqrt())
    }

    /// Rescale all velocities toward the target temperature.
    /// Returns the applied factor, or `None` if the system is at T = 0.
    pub fn apply(&self, sys: &mut ParticleSystem, dt: f64) -> Option<f64> {
        let lambda = self.lambda(sys.temperature(), dt)?;
        for v in sys.velocities_mut() {
            *v *= lambda;
        }
        sys.refresh_kinetic_energy();
        Some(lambda)
    }
}
