//! Core state types for the Lennard-Jones simulation.
//!
//! `ParticleSystem` is a structure-of-arrays over N particles using `NVec2`:
//! positions, velocities, accelerations, forces and masses share one length,
//! alongside the per-particle potential energy and the derived scalar energies.
//!
//! Arrays only grow through [`ParticleSystem::add_particle`]. Once the system
//! is handed to an [`Engine`](crate::simulation::engine::Engine) it is owned
//! exclusively by it and nothing outside can resize it.

use nalgebra::Vector2;

use crate::error::Result;
use crate::simulation::atoms::AtomKind;
use crate::simulation::forces::ForceField;

pub type NVec2 = Vector2<f64>;

#[derive(Debug, Clone, Default)]
pub struct ParticleSystem {
    kinds: Vec<AtomKind>,
    positions: Vec<NVec2>,
    velocities: Vec<NVec2>,
    accelerations: Vec<NVec2>,
    forces: Vec<NVec2>,
    masses: Vec<f64>,
    potentials: Vec<f64>, // per-particle potential energy
    potential_energy: f64,
    kinetic_energy: f64,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one particle at rest. Returns its index.
    ///
    /// Fails with [`SimError::InvalidParticleType`](crate::error::SimError) when
    /// `symbol` is not in the type table; nothing is appended in that case.
    pub fn add_particle(&mut self, symbol: &str, position: NVec2) -> Result<usize> {
        let kind: AtomKind = symbol.parse()?;
        Ok(self.push(kind, position))
    }

    /// Append one particle of an already-resolved kind
    pub fn push(&mut self, kind: AtomKind, position: NVec2) -> usize {
        self.kinds.push(kind);
        self.positions.push(position);
        self.velocities.push(NVec2::zeros());
        self.accelerations.push(NVec2::zeros());
        self.forces.push(NVec2::zeros());
        self.masses.push(kind.mass());
        self.potentials.push(0.0);
        self.kinds.len() - 1
    }

    /// Overwrite the velocity of particle `i` (initial conditions only)
    pub fn set_velocity(&mut self, i: usize, v: NVec2) {
        self.velocities[i] = v;
        self.refresh_kinetic_energy();
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn kinds(&self) -> &[AtomKind] {
        &self.kinds
    }

    pub fn positions(&self) -> &[NVec2] {
        &self.positions
    }

    pub fn velocities(&self) -> &[NVec2] {
        &self.velocities
    }

    pub fn accelerations(&self) -> &[NVec2] {
        &self.accelerations
    }

    pub fn forces(&self) -> &[NVec2] {
        &self.forces
    }

    pub fn masses(&self) -> &[f64] {
        &self.masses
    }

    pub fn potentials(&self) -> &[f64] {
        &self.potentials
    }

    pub fn potential_energy(&self) -> f64 {
        self.potential_energy
    }

    pub fn kinetic_energy(&self) -> f64 {
        self.kinetic_energy
    }

    pub fn total_energy(&self) -> f64 {
        self.potential_energy + self.kinetic_energy
    }

    /// Instantaneous temperature `KE / (0.5 * dof)` with `dof = 2N` (k_B = 1)
    pub fn temperature(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let dof = 2.0 * self.len() as f64;
        self.kinetic_energy / (0.5 * dof)
    }

    /// Sum of per-particle force norms
    pub fn force_norm(&self) -> f64 {
        self.forces.iter().map(|f| f.norm()).sum()
    }

    pub fn acceleration_norm(&self) -> f64 {
        self.accelerations.iter().map(|a| a.norm()).sum()
    }

    pub fn velocity_norm(&self) -> f64 {
        self.velocities.iter().map(|v| v.norm()).sum()
    }

    /// Largest single-particle force norm (minimization convergence measure)
    pub fn max_force_norm(&self) -> f64 {
        self.forces.iter().map(|f| f.norm()).fold(0.0, f64::max)
    }

    // ---------------------------------------------------------------------
    // Mutation used by the engine components. Lengths never change here.
    // ---------------------------------------------------------------------

    /// Re-evaluate forces and potential energies at the current positions
    pub(crate) fn update_forces(&mut self, field: &dyn ForceField) {
        self.potential_energy = field.compute(&self.positions, &mut self.forces, &mut self.potentials);
    }

    /// a = F / m for every particle
    pub(crate) fn update_accelerations(&mut self) {
        for ((a, f), m) in self.accelerations.iter_mut().zip(&self.forces).zip(&self.masses) {
            *a = *f / *m;
        }
    }

    pub(crate) fn refresh_kinetic_energy(&mut self) {
        self.kinetic_energy = self
            .velocities
            .iter()
            .zip(&self.masses)
            .map(|(v, m)| 0.5 * m * v.norm_squared())
            .sum();
    }

    pub(crate) fn positions_mut(&mut self) -> &mut [NVec2] {
        &mut self.positions
    }

    pub(crate) fn velocities_mut(&mut self) -> &mut [NVec2] {
        &mut self.velocities
    }

    /// Split borrow for the Verlet drift: positions to move, velocities and
    /// accelerations to read
    pub(crate) fn drift_view(&mut self) -> (&mut [NVec2], &[NVec2], &[NVec2]) {
        (&mut self.positions, &self.velocities, &self.accelerations)
    }

    /// Split borrow for the Verlet kick
    pub(crate) fn kick_view(&mut self) -> (&mut [NVec2], &mut [NVec2], &[NVec2], &[f64]) {
        (&mut self.velocities, &mut self.accelerations, &self.forces, &self.masses)
    }

    /// Split borrow for steepest descent: positions to move, forces to follow
    pub(crate) fn descent_view(&mut self) -> (&mut [NVec2], &[NVec2]) {
        (&mut self.positions, &self.forces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;
    use approx::assert_relative_eq;

    #[test]
    fn add_particle_grows_every_array() {
        let mut sys = ParticleSystem::new();
        sys.add_particle("H", NVec2::new(0.5, 0.5)).unwrap();
        let idx = sys.add_particle("O", NVec2::new(1.0, 1.5)).unwrap();

        assert_eq!(idx, 1);
        assert_eq!(sys.len(), 2);
        assert_eq!(sys.velocities().len(), 2);
        assert_eq!(sys.accelerations().len(), 2);
        assert_eq!(sys.forces().len(), 2);
        assert_eq!(sys.potentials().len(), 2);
        assert_eq!(sys.masses(), &[1.0, 18.0]);
    }

    #[test]
    fn invalid_type_leaves_system_untouched() {
        let mut sys = ParticleSystem::new();
        sys.add_particle("C", NVec2::zeros()).unwrap();

        let err = sys.add_particle("Ar", NVec2::zeros()).unwrap_err();
        assert_eq!(err, SimError::InvalidParticleType("Ar".into()));
        assert_eq!(sys.len(), 1);
        assert_eq!(sys.masses().len(), 1);
    }

    #[test]
    fn kinetic_energy_and_temperature() {
        let mut sys = ParticleSystem::new();
        sys.add_particle("H", NVec2::zeros()).unwrap();
        sys.add_particle("C", NVec2::new(3.0, 0.0)).unwrap();
        sys.set_velocity(0, NVec2::new(2.0, 0.0)); // 0.5 * 1 * 4 = 2
        sys.set_velocity(1, NVec2::new(0.0, 0.5)); // 0.5 * 16 * 0.25 = 2

        assert_relative_eq!(sys.kinetic_energy(), 4.0);
        // dof = 4, T = 4 / 2
        assert_relative_eq!(sys.temperature(), 2.0);
        assert_relative_eq!(sys.velocity_norm(), 2.5);
    }

    #[test]
    fn empty_system_has_zero_temperature() {
        let sys = ParticleSystem::new();
        assert_eq!(sys.temperature(), 0.0);
        assert_eq!(sys.max_force_norm(), 0.0);
    }
}
