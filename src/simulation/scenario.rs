//! Build fully-initialized simulation scenarios from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces a runtime bundle
//! containing:
//! - typed, validated parameters (`SimulationParameters`)
//! - the initial particle state (`ParticleSystem`)
//!
//! which is then turned into an [`Engine`] ready to tick.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use tracing::{debug, info};

use crate::configuration::config::ScenarioConfig;
use crate::error::{Result, SimError};
use crate::simulation::atoms::AtomKind;
use crate::simulation::engine::Engine;
use crate::simulation::params::SimulationParameters;
use crate::simulation::states::{NVec2, ParticleSystem};

pub struct Scenario {
    pub parameters: SimulationParameters,
    pub system: ParticleSystem,
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> Result<Self> {
        let n_atoms = cfg.n_atoms();
        let p_cfg = cfg.parameters;
        let parameters = SimulationParameters {
            boxsize: p_cfg.boxsize,
            temperature: p_cfg.temperature,
            seed: p_cfg.seed,
            minimize: cfg.phases.minimize.into(),
            equilibrate: cfg.phases.equilibrate.into(),
            produce: cfg.phases.produce.into(),
        };
        // Reject before touching the rng: a bad box would make placement panic
        parameters.validate(n_atoms)?;

        let mut rng = match parameters.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        // Atoms: explicit positions first, then random placement, group by group
        let mut system = ParticleSystem::new();
        for group in &cfg.atoms {
            let kind: AtomKind = group.symbol.parse()?;
            for &[x, y] in &group.positions {
                system.push(kind, NVec2::new(x, y));
            }
            for _ in 0..group.count {
                let x = NVec2::new(
                    rng.gen_range(0.0..parameters.boxsize),
                    rng.gen_range(0.0..parameters.boxsize),
                );
                system.push(kind, x);
            }
            debug!(symbol = %kind, count = group.count + group.positions.len(), "placed atoms");
        }

        if p_cfg.init_velocities {
            init_velocities(&mut system, parameters.temperature, &mut rng)?;
        }

        info!(
            n_atoms = system.len(),
            boxsize = parameters.boxsize,
            temperature = parameters.temperature,
            seeded = parameters.seed.is_some(),
            "scenario built"
        );

        Ok(Self { parameters, system })
    }

    pub fn into_engine(self) -> Result<Engine> {
        Engine::new(self.parameters, self.system)
    }
}

/// Draw each velocity component from `Normal(0, sqrt(T / m))`, then remove
/// the centre-of-mass velocity so the box does not drift
pub fn init_velocities<R: Rng + ?Sized>(sys: &mut ParticleSystem, temperature: f64, rng: &mut R) -> Result<()> {
    let n = sys.len();
    if n == 0 {
        return Ok(());
    }

    let mut velocities = Vec::with_capacity(n);
    for &m in sys.masses() {
        let normal = Normal::new(0.0, (temperature / m).sqrt())
            .map_err(|e| SimError::InvalidConfiguration(format!("initial velocities: {e}")))?;
        velocities.push(NVec2::new(normal.sample(rng), normal.sample(rng)));
    }

    let total_mass: f64 = sys.masses().iter().sum();
    let momentum = velocities
        .iter()
        .zip(sys.masses())
        .fold(NVec2::zeros(), |acc, (v, m)| acc + *m * *v);
    let v_com = momentum / total_mass;

    for (i, v) in velocities.into_iter().enumerate() {
        sys.set_velocity(i, v - v_com);
    }
    Ok(())
}
