//! Pairwise force / energy kernels for the particle engine
//!
//! Defines the [`ForceField`] trait and the Lennard-Jones 12-6 model,
//! evaluated by direct O(N^2) summation over every unordered pair

use crate::simulation::states::NVec2;

/// Trait for force models operating on the stored positions
/// Implementations overwrite `forces` and `potentials` (one entry per particle)
/// and return the total potential energy
pub trait ForceField {
    fn compute(&self, positions: &[NVec2], forces: &mut [NVec2], potentials: &mut [f64]) -> f64;
}

/// Lennard-Jones 12-6 potential, `V(r) = 4ε((σ/r)^12 - (σ/r)^6)`
///
/// No cutoff and no minimum-image correction: separations are taken
/// directly from the stored (already wrapped) positions, so two particles
/// near opposite edges of the box do not see each other across the boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LennardJones {
    pub sigma: f64,   // zero-crossing distance
    pub epsilon: f64, // well depth
}

impl Default for LennardJones {
    /// Reduced units, σ = ε = 1
    fn default() -> Self {
        Self {
            sigma: 1.0,
            epsilon: 1.0,
        }
    }
}

impl LennardJones {
    pub fn new(sigma: f64, epsilon: f64) -> Self {
        Self { sigma, epsilon }
    }

    /// Energy and radial force magnitude of one pair at separation `r`.
    /// Positive magnitude means repulsion.
    pub fn pair(&self, r: f64) -> (f64, f64) {
        let sr6 = (self.sigma / r).powi(6);
        let sr12 = sr6 * sr6;

        // V(r) = 4ε((σ/r)^12 - (σ/r)^6)
        let v = 4.0 * self.epsilon * (sr12 - sr6);

        // F(r) = -dV/dr = 24ε(2(σ/r)^12 - (σ/r)^6) / r
        let f = 24.0 * self.epsilon * (2.0 * sr12 - sr6) / r;

        (v, f)
    }
}

impl ForceField for LennardJones {
    fn compute(&self, positions: &[NVec2], forces: &mut [NVec2], potentials: &mut [f64]) -> f64 {
        // Zero buffers
        for f in forces.iter_mut() {
            *f = NVec2::zeros();
        }
        for p in potentials.iter_mut() {
            *p = 0.0;
        }

        let n = positions.len();
        let mut total = 0.0;

        // Loop over each unordered pair (i, j) with i < j, the diagonal never enters
        for i in 0..n {
            let xi = positions[i];

            for j in (i + 1)..n {
                // r_vec points from i to j
                let r_vec = positions[j] - xi;
                let r = r_vec.norm();

                // Coincident particles are treated as infinitely far apart:
                // no energy, no force, no NaN
                if r == 0.0 {
                    continue;
                }

                let (v, f) = self.pair(r);
                total += v;

                // each endpoint owns half of the pair energy
                potentials[i] += 0.5 * v;
                potentials[j] += 0.5 * v;

                // Equal and opposite: repulsion pushes j along +r_vec and i along -r_vec
                let f_vec = (f / r) * r_vec;
                forces[i] -= f_vec;
                forces[j] += f_vec;
            }
        }

        total
    }
}
