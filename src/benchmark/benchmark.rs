use std::time::Instant;

use crate::simulation::atoms::AtomKind;
use crate::simulation::forces::{ForceField, LennardJones};
use crate::simulation::integrator::verlet_step;
use crate::simulation::states::{NVec2, ParticleSystem};

const BOXSIZE: f64 = 1000.0;

/// Helper to build a deterministic system of size `n` on a jittered lattice
/// (no rand needed, no overlapping pairs)
fn make_system(n: usize) -> ParticleSystem {
    let side = (n as f64).sqrt().ceil() as usize;
    let mut sys = ParticleSystem::new();

    for i in 0..n {
        let i_f = i as f64;
        let x = NVec2::new(
            1.0 + 1.2 * (i % side) as f64 + 0.05 * (i_f * 0.37).sin(),
            1.0 + 1.2 * (i / side) as f64 + 0.05 * (i_f * 0.13).cos(),
        );
        sys.push(AtomKind::H, x);
    }
    sys.update_forces(&LennardJones::default());
    sys.update_accelerations();
    sys
}

/// Time one O(N^2) force evaluation for increasing N
pub fn bench_forces() {
    let ns = [100, 200, 400, 800, 1600, 3200];
    let lj = LennardJones::default();

    for n in ns {
        let sys = make_system(n);
        let mut forces = vec![NVec2::zeros(); n];
        let mut potentials = vec![0.0; n];

        // Warm up
        lj.compute(sys.positions(), &mut forces, &mut potentials);

        let t0 = Instant::now();
        let epot = lj.compute(sys.positions(), &mut forces, &mut potentials);
        let dt_forces = t0.elapsed().as_secs_f64();

        println!("N = {n:5}, forces = {:8.6} s, Epot = {:12.4}", dt_forces, epot);
    }
}

/// Time full velocity-Verlet steps for increasing N
pub fn bench_verlet() {
    let ns = [100, 200, 400, 800, 1600];
    let steps = 5; // number of integrator steps per size
    let lj = LennardJones::default();

    for n in ns {
        let mut sys = make_system(n);

        // Warm-up
        verlet_step(&mut sys, &lj, 0.001, BOXSIZE);

        let t0 = Instant::now();
        for _ in 0..steps {
            verlet_step(&mut sys, &lj, 0.001, BOXSIZE);
        }
        let per_step = t0.elapsed().as_secs_f64() / steps as f64;

        println!("N = {:5}, verlet step = {:8.6} s, Etot = {:12.4}", n, per_step, sys.total_energy());
    }
}
