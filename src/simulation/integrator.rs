//! Fixed-step position/velocity updates for the particle system
//!
//! Provides the velocity-Verlet step used by equilibration and production,
//! the normalized steepest-descent step used by minimization, and the
//! periodic wrap applied after every position update

use super::forces::ForceField;
use super::states::{NVec2, ParticleSystem};

/// Map one coordinate into `[0, boxsize)`
///
/// `rem_euclid` can round a tiny negative value up to exactly `boxsize`,
/// which is folded back to 0
pub fn wrap_coordinate(x: f64, boxsize: f64) -> f64 {
    let w = x.rem_euclid(boxsize);
    if w >= boxsize {
        0.0
    } else {
        w
    }
}

/// Component-wise periodic wrap of a position
pub fn wrap_position(x: NVec2, boxsize: f64) -> NVec2 {
    x.map(|c| wrap_coordinate(c, boxsize))
}

/// Wrap every position in place
pub fn wrap_positions(positions: &mut [NVec2], boxsize: f64) {
    for x in positions.iter_mut() {
        *x = wrap_position(*x, boxsize);
    }
}

/// Advance the system by one velocity-Verlet step of size `dt`
///
/// Expects `sys` accelerations to hold a(t) for the current positions.
/// Leaves forces, potential energies and accelerations at t + dt, and the
/// kinetic energy refreshed
pub fn verlet_step(sys: &mut ParticleSystem, field: &dyn ForceField, dt: f64, boxsize: f64) {
    if sys.is_empty() {
        return;
    }
    let half_dt = 0.5 * dt;

    // x(t+dt) = x(t) + v(t) dt + 1/2 a(t) dt^2, then fold back into the box
    {
        let (positions, velocities, accelerations) = sys.drift_view();
        for ((x, v), a) in positions.iter_mut().zip(velocities).zip(accelerations) {
            *x += dt * *v + half_dt * dt * *a;
            *x = wrap_position(*x, boxsize);
        }
    }

    // F(t+dt) at the new positions
    sys.update_forces(field);

    // v(t+dt) = v(t) + 1/2 (a(t) + a(t+dt)) dt, then a(t) <- a(t+dt)
    {
        let (velocities, accelerations, forces, masses) = sys.kick_view();
        for (((v, a), f), m) in velocities
            .iter_mut()
            .zip(accelerations.iter_mut())
            .zip(forces)
            .zip(masses)
        {
            let a_new = *f / *m;
            *v += half_dt * (*a + a_new);
            *a = a_new;
        }
    }

    sys.refresh_kinetic_energy();
}

/// Move every particle by `dt` along its unit force direction
///
/// Forces must already be evaluated at the current positions. A particle
/// with zero force uses a norm of 1, so it does not move.
pub fn steepest_descent_step(sys: &mut ParticleSystem, dt: f64, boxsize: f64) {
    let (positions, forces) = sys.descent_view();
    for (x, f) in positions.iter_mut().zip(forces) {
        let norm = f.norm();
        let norm = if norm == 0.0 { 1.0 } else { norm };
        *x += dt * (*f / norm);
        *x = wrap_position(*x, boxsize);
    }
}
