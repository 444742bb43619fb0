use ljsim::{Engine, ForceField, LennardJones, Metric, NVec2, ParticleSystem, SeriesRecorder};
use ljsim::{Phase, PhaseOutcome, Scenario, ScenarioConfig, SimError, SimulationParameters};

use approx::{assert_abs_diff_eq, assert_relative_eq};

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

/// Build a 2-particle system separated by `dist` along x, centred in a box of 10
pub fn two_body_system(dist: f64) -> ParticleSystem {
    let mut sys = ParticleSystem::new();
    sys.add_particle("H", NVec2::new(5.0 - dist / 2.0, 5.0)).unwrap();
    sys.add_particle("H", NVec2::new(5.0 + dist / 2.0, 5.0)).unwrap();
    sys
}

/// `side` x `side` square lattice starting at `origin`
pub fn lattice_system(symbol: &str, side: usize, spacing: f64, origin: f64) -> ParticleSystem {
    let mut sys = ParticleSystem::new();
    for i in 0..side {
        for j in 0..side {
            let x = NVec2::new(origin + spacing * i as f64, origin + spacing * j as f64);
            sys.add_particle(symbol, x).unwrap();
        }
    }
    sys
}

/// Parameters with every phase disabled, tests switch on what they need
pub fn test_params(boxsize: f64) -> SimulationParameters {
    let mut p = SimulationParameters {
        boxsize,
        temperature: 0.0,
        seed: Some(42),
        ..Default::default()
    };
    p.minimize.enabled = false;
    p.equilibrate.enabled = false;
    p.produce.enabled = false;
    p
}

fn evaluate(positions: &[NVec2]) -> (Vec<NVec2>, Vec<f64>, f64) {
    let mut forces = vec![NVec2::zeros(); positions.len()];
    let mut potentials = vec![0.0; positions.len()];
    let total = LennardJones::default().compute(positions, &mut forces, &mut potentials);
    (forces, potentials, total)
}

// ==================================================================================
// Force field tests
// ==================================================================================

#[test]
fn forces_obey_newton_third_law() {
    // jittered lattice, mixed spacing, no coincident pairs
    let positions: Vec<NVec2> = (0..25)
        .map(|i| {
            let i_f = i as f64;
            NVec2::new(
                2.0 + 1.1 * (i % 5) as f64 + 0.15 * (i_f * 0.37).sin(),
                2.0 + 1.1 * (i / 5) as f64 + 0.15 * (i_f * 0.13).cos(),
            )
        })
        .collect();

    let (forces, _, _) = evaluate(&positions);

    let net = forces.iter().fold(NVec2::zeros(), |acc, f| acc + f);
    let scale: f64 = forces.iter().map(|f| f.norm()).sum();

    assert!(scale > 0.0);
    assert!(net.norm() <= 1e-10 * scale, "Net force not zero: {:?}", net);
}

#[test]
fn single_particle_feels_nothing() {
    let mut sys = ParticleSystem::new();
    sys.add_particle("O", NVec2::new(3.0, 3.0)).unwrap();

    let mut params = test_params(10.0);
    params.produce.enabled = true;
    params.produce.max_steps = 3;

    let mut engine = Engine::new(params, sys).unwrap();
    assert_eq!(engine.system().forces()[0], NVec2::zeros());
    assert_eq!(engine.system().potential_energy(), 0.0);

    let mut rec = SeriesRecorder::unbounded();
    engine.run(&mut rec);

    assert_eq!(engine.system().forces()[0], NVec2::zeros());
    assert_eq!(engine.system().potentials()[0], 0.0);
    assert!(rec.series(Metric::PotentialEnergy).iter().all(|e| *e == 0.0));
    assert_eq!(engine.system().positions()[0], NVec2::new(3.0, 3.0));
}

#[test]
fn two_body_at_sigma() {
    let sys = two_body_system(1.0);
    let (forces, potentials, total) = evaluate(sys.positions());

    // V(σ) = 4(1 - 1) = 0, |F(σ)| = 24(2 - 1)/1
    assert_abs_diff_eq!(total, 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(potentials[0], 0.0, epsilon = 1e-12);

    // repulsive: particle 1 pushed along +x (away from 0), particle 0 along -x
    assert_relative_eq!(forces[1].x, 24.0, epsilon = 1e-12);
    assert_relative_eq!(forces[0].x, -24.0, epsilon = 1e-12);
    assert_abs_diff_eq!(forces[0].y, 0.0);
    assert_abs_diff_eq!(forces[1].y, 0.0);
}

#[test]
fn two_body_matches_closed_form() {
    let r: f64 = 1.5;
    let sys = two_body_system(r);
    let (forces, potentials, total) = evaluate(sys.positions());

    let v = 4.0 * (r.powi(-12) - r.powi(-6));
    let f = 24.0 * (2.0 * r.powi(-12) - r.powi(-6)) / r;

    assert_relative_eq!(total, v, epsilon = 1e-12);
    assert_relative_eq!(potentials[0], 0.5 * v, epsilon = 1e-12);
    assert_relative_eq!(potentials[1], 0.5 * v, epsilon = 1e-12);
    // attractive beyond the minimum: particle 1 pulled toward particle 0
    assert_relative_eq!(forces[1].x, f, epsilon = 1e-12);
    assert!(forces[1].x < 0.0);
}

#[test]
fn no_minimum_image_across_the_boundary() {
    // 0.2 apart through the periodic boundary, 9.8 apart in stored coordinates
    let positions = vec![NVec2::new(0.1, 5.0), NVec2::new(9.9, 5.0)];
    let (forces, _, total) = evaluate(&positions);

    let r: f64 = 9.8;
    assert_relative_eq!(total, 4.0 * (r.powi(-12) - r.powi(-6)), epsilon = 1e-15);
    assert!(forces[0].norm() < 1e-4);
}

// ==================================================================================
// Engine / integrator tests
// ==================================================================================

#[test]
fn positions_stay_inside_the_box() {
    let boxsize = 10.0;
    let mut sys = ParticleSystem::new();
    sys.add_particle("H", NVec2::new(0.05, 2.0)).unwrap();
    sys.add_particle("H", NVec2::new(9.9, 8.0)).unwrap();
    sys.add_particle("O", NVec2::new(5.0, 9.97)).unwrap();
    sys.set_velocity(0, NVec2::new(-3.0, 0.0));
    sys.set_velocity(1, NVec2::new(2.5, 0.5));
    sys.set_velocity(2, NVec2::new(0.0, 2.0));

    let mut params = test_params(boxsize);
    params.produce.enabled = true;
    params.produce.dt = 0.01;
    params.produce.max_steps = 200;

    let mut engine = Engine::new(params, sys).unwrap();
    let mut rec = SeriesRecorder::unbounded();

    while !engine.is_done() {
        engine.tick(&mut rec);
        for x in engine.system().positions() {
            assert!((0.0..boxsize).contains(&x.x), "x out of box: {:?}", x);
            assert!((0.0..boxsize).contains(&x.y), "y out of box: {:?}", x);
        }
    }

    // particle 0 moved left from x = 0.05, so anything larger means it wrapped
    assert!(engine.system().positions()[0].x > 1.0);
}

#[test]
fn random_scenario_stays_inside_the_box_through_all_phases() {
    let yaml = r#"
parameters:
  boxsize: 15.0
  temperature: 0.5
  seed: 2024
phases:
  minimize: { steps: 2000, convergence: 5.0 }
  equilibrate: { steps: 200, tau: 0.05 }
  produce: { steps: 200 }
atoms:
  - { symbol: C, count: 6 }
  - { symbol: O, count: 6 }
"#;
    let cfg: ScenarioConfig = serde_yaml::from_str(yaml).unwrap();
    let mut engine = Scenario::build_scenario(cfg).unwrap().into_engine().unwrap();
    let mut rec = SeriesRecorder::with_capacity(16);

    while !engine.is_done() {
        engine.tick(&mut rec);
        for x in rec.positions() {
            assert!((0.0..15.0).contains(&x.x) && (0.0..15.0).contains(&x.y));
        }
    }
    assert_eq!(rec.len(), 16);
    assert_eq!(engine.outcomes().len(), 3);
}

#[test]
fn production_conserves_energy() {
    let mut sys = lattice_system("H", 4, 1.12, 8.0);
    // small deterministic kick so the lattice does not sit still
    for i in 0..sys.len() {
        let i_f = i as f64;
        sys.set_velocity(i, NVec2::new(0.2 * (i_f * 1.7).sin(), 0.2 * (i_f * 0.9).cos()));
    }

    let mut params = test_params(20.0);
    params.produce.enabled = true;
    params.produce.dt = 0.001;
    params.produce.max_steps = 1000;

    let mut engine = Engine::new(params, sys).unwrap();
    let e0 = engine.system().total_energy();

    let mut rec = SeriesRecorder::unbounded();
    engine.run(&mut rec);

    let drift = rec
        .series(Metric::TotalEnergy)
        .iter()
        .map(|e| (e - e0).abs())
        .fold(0.0, f64::max);

    assert_eq!(rec.len(), 1000);
    assert!(drift < 1e-3 * e0.abs().max(1.0), "Energy drift {drift} from {e0}");
}

#[test]
fn shipped_dimer_scenario_conserves_energy() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join("dimer.yaml");
    let cfg: ScenarioConfig = serde_yaml::from_reader(BufReader::new(File::open(path).unwrap())).unwrap();

    let mut engine = Scenario::build_scenario(cfg).unwrap().into_engine().unwrap();
    let e0 = engine.system().total_energy();
    assert_abs_diff_eq!(e0, 0.0, epsilon = 1e-12);

    let mut rec = SeriesRecorder::unbounded();
    engine.run(&mut rec);

    // the pair oscillates through the well: kinetic energy shows up, total stays put
    let ke_max = rec.series(Metric::KineticEnergy).iter().copied().fold(0.0, f64::max);
    assert!(ke_max > 0.5);
    for e in rec.series(Metric::TotalEnergy) {
        assert_abs_diff_eq!(*e, 0.0, epsilon = 1e-3);
    }
}

// ==================================================================================
// Minimization tests
// ==================================================================================

#[test]
fn minimization_relaxes_compressed_pair() {
    let mut params = test_params(10.0);
    params.minimize.enabled = true;
    params.minimize.dt = 0.01;
    params.minimize.max_steps = 100;
    params.minimize.convergence = 2.0;

    let mut engine = Engine::new(params, two_body_system(1.0)).unwrap();
    let mut rec = SeriesRecorder::unbounded();
    engine.run(&mut rec);

    let max_force: Vec<f64> = rec.series(Metric::MaxForce).iter().copied().collect();
    assert_relative_eq!(max_force[0], 24.0, epsilon = 1e-9);
    for w in max_force.windows(2) {
        assert!(w[1] <= w[0], "max force increased: {:?}", max_force);
    }

    match engine.outcomes() {
        [(Phase::Minimize, PhaseOutcome::Converged { steps, max_force })] => {
            assert!(*steps <= 100);
            assert!(*max_force < 2.0);
        }
        other => panic!("unexpected outcomes {:?}", other),
    }

    // the pair opened up toward the LJ minimum
    let sep = engine.system().positions()[1].x - engine.system().positions()[0].x;
    assert!(sep > 1.05 && sep < 1.2, "separation {sep}");
}

#[test]
fn minimization_budget_exhaustion_is_not_fatal() {
    let mut params = test_params(10.0);
    params.minimize.enabled = true;
    params.minimize.max_steps = 50;
    params.minimize.convergence = 1e-12;
    params.produce.enabled = true;
    params.produce.max_steps = 10;

    let mut engine = Engine::new(params, two_body_system(1.0)).unwrap();
    let mut rec = SeriesRecorder::unbounded();
    engine.run(&mut rec);

    let outcomes = engine.outcomes();
    assert_eq!(outcomes.len(), 2);
    assert!(matches!(outcomes[0], (Phase::Minimize, PhaseOutcome::NotConverged { steps: 50, .. })));
    assert_eq!(outcomes[1], (Phase::Produce, PhaseOutcome::Completed { steps: 10 }));
    assert!(engine.is_done());
}

// ==================================================================================
// Thermostat tests
// ==================================================================================

#[test]
fn equilibration_reaches_target_temperature() {
    let target = 0.5;
    let sys = lattice_system("C", 3, 1.2, 4.0);

    let mut params = test_params(12.0);
    params.temperature = target;
    params.equilibrate.enabled = true;
    params.equilibrate.dt = 0.001;
    params.equilibrate.max_steps = 3000;
    params.equilibrate.tau = 0.01;

    let mut engine = Engine::new(params, sys).unwrap();
    assert_eq!(engine.system().temperature(), 0.0);

    let mut rec = SeriesRecorder::unbounded();
    engine.run(&mut rec);

    let temps = rec.series(Metric::Temperature);
    assert_eq!(temps.len(), 3000);
    let tail: Vec<f64> = temps.iter().skip(2000).copied().collect();
    let mean = tail.iter().sum::<f64>() / tail.len() as f64;

    assert!((mean - target).abs() < 0.1 * target, "mean T = {mean}, target {target}");
    assert_eq!(engine.outcomes(), &[(Phase::Equilibrate, PhaseOutcome::Completed { steps: 3000 })]);
}

// ==================================================================================
// Phase sequencing tests
// ==================================================================================

#[test]
fn disabled_phase_is_never_entered() {
    let mut params = test_params(10.0);
    params.minimize.enabled = true;
    params.minimize.max_steps = 5;
    params.minimize.convergence = 1e-12;
    params.produce.enabled = true;
    params.produce.max_steps = 7;

    let mut engine = Engine::new(params, two_body_system(1.0)).unwrap();
    let mut rec = SeriesRecorder::unbounded();

    let mut visited = Vec::new();
    for _ in 0..20 {
        let report = engine.tick(&mut rec);
        if visited.last() != Some(&report.phase) {
            visited.push(report.phase);
        }
    }

    assert_eq!(visited, vec![Phase::Minimize, Phase::Produce, Phase::Done]);
    assert!(rec.phases().iter().all(|p| *p != Phase::Equilibrate));
    assert_eq!(rec.phases().iter().filter(|p| **p == Phase::Minimize).count(), 5);
    assert_eq!(rec.phases().iter().filter(|p| **p == Phase::Produce).count(), 7);
    assert_eq!(engine.ticks(), 12);
}

#[test]
fn empty_phase_list_is_a_no_op_run() {
    let mut engine = Engine::new(test_params(10.0), two_body_system(1.5)).unwrap();
    assert!(engine.is_done());

    let mut rec = SeriesRecorder::unbounded();
    assert!(engine.run(&mut rec).is_empty());
    assert!(rec.is_empty());
}

// ==================================================================================
// Error tests
// ==================================================================================

#[test]
fn unknown_particle_type_is_rejected() {
    let mut sys = ParticleSystem::new();
    let err = sys.add_particle("Xe", NVec2::new(1.0, 1.0)).unwrap_err();
    assert_eq!(err, SimError::InvalidParticleType("Xe".to_string()));
    assert!(sys.is_empty());
}

#[test]
fn invalid_configuration_is_rejected_before_the_run() {
    let mut params = test_params(-5.0);
    params.produce.enabled = true;
    assert!(matches!(
        Engine::new(params, two_body_system(1.0)),
        Err(SimError::InvalidConfiguration(_))
    ));

    assert!(matches!(
        Engine::new(test_params(10.0), ParticleSystem::new()),
        Err(SimError::InvalidConfiguration(_))
    ));
}
