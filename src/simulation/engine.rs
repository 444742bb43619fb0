//! Tick-driven simulation engine
//!
//! Owns the particle system, the force model, the thermostat and the phase
//! controller for the lifetime of a run. An external driver calls
//! [`Engine::tick`] once per time unit; each call runs exactly one step of
//! the active phase and pushes one snapshot into the driver's recorder.
//! Restarting a run means building a new engine.

use tracing::{debug, trace, warn};

use crate::error::Result;
use crate::simulation::forces::{ForceField, LennardJones};
use crate::simulation::integrator::{steepest_descent_step, verlet_step, wrap_positions};
use crate::simulation::params::SimulationParameters;
use crate::simulation::phases::{Phase, PhaseController, PhaseOutcome};
use crate::simulation::recorder::{Recorder, Snapshot};
use crate::simulation::states::ParticleSystem;
use crate::simulation::thermostat::Berendsen;

/// What a single tick did
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub phase: Phase,                      // phase that ran (Done if nothing ran)
    pub step: usize,                       // step number within that phase
    pub completed: Option<PhaseOutcome>,   // set on the tick that closed the phase
}

pub struct Engine {
    params: SimulationParameters,
    system: ParticleSystem,
    field: Box<dyn ForceField + Send + Sync>,
    thermostat: Berendsen,
    controller: PhaseController,
    ticks: u64,
}

impl Engine {
    /// Validate `params` against `system` and take ownership of both.
    ///
    /// Positions are folded into the box and forces, energies and
    /// accelerations are evaluated once so the initial state is consistent.
    pub fn new(params: SimulationParameters, system: ParticleSystem) -> Result<Self> {
        Self::with_force_field(params, system, LennardJones::default())
    }

    pub fn with_force_field<F>(params: SimulationParameters, mut system: ParticleSystem, field: F) -> Result<Self>
    where
        F: ForceField + Send + Sync + 'static,
    {
        params.validate(system.len())?;

        wrap_positions(system.positions_mut(), params.boxsize);
        system.update_forces(&field);
        system.update_accelerations();
        system.refresh_kinetic_energy();

        let thermostat = Berendsen::new(params.temperature, params.equilibrate.tau);
        let controller = PhaseController::from_params(&params);

        Ok(Self {
            params,
            system,
            field: Box::new(field),
            thermostat,
            controller,
            ticks: 0,
        })
    }

    pub fn system(&self) -> &ParticleSystem {
        &self.system
    }

    pub fn params(&self) -> &SimulationParameters {
        &self.params
    }

    pub fn phase(&self) -> Phase {
        self.controller.current()
    }

    pub fn controller(&self) -> &PhaseController {
        &self.controller
    }

    pub fn is_done(&self) -> bool {
        self.controller.is_done()
    }

    /// Ticks that actually ran a phase step
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn outcomes(&self) -> &[(Phase, PhaseOutcome)] {
        self.controller.outcomes()
    }

    /// Advance the active phase by one step. A no-op once the run is Done.
    pub fn tick(&mut self, recorder: &mut dyn Recorder) -> TickReport {
        let phase = self.controller.current();
        if phase == Phase::Done {
            return TickReport {
                phase,
                step: 0,
                completed: None,
            };
        }

        let first = self.controller.step() == 0;
        let step = self.controller.begin_step();
        self.ticks += 1;

        let completed = match phase {
            Phase::Minimize => self.minimize_step(step, recorder),
            Phase::Equilibrate => self.equilibrate_step(first, step, recorder),
            Phase::Produce => self.produce_step(first, step, recorder),
            Phase::Done => None,
        };

        if let Some(outcome) = &completed {
            self.controller.complete(outcome.clone());
        }

        TickReport { phase, step, completed }
    }

    /// Tick until every enabled phase has finished
    pub fn run(&mut self, recorder: &mut dyn Recorder) -> &[(Phase, PhaseOutcome)] {
        while !self.is_done() {
            self.tick(recorder);
        }
        self.outcomes()
    }

    fn emit(&self, phase: Phase, step: usize, recorder: &mut dyn Recorder) {
        let snapshot = Snapshot::capture(&self.system, phase, step, self.ticks);
        trace!(
            %phase,
            step,
            epot = snapshot.potential_energy,
            ekin = snapshot.kinetic_energy,
            "tick"
        );
        recorder.record(&snapshot);
    }

    /// Forces and accelerations at the current positions
    fn prime(&mut self) {
        self.system.update_forces(&*self.field);
        self.system.update_accelerations();
        self.system.refresh_kinetic_energy();
    }

    fn minimize_step(&mut self, step: usize, recorder: &mut dyn Recorder) -> Option<PhaseOutcome> {
        let p = &self.params.minimize;
        let (dt, max_steps, convergence) = (p.dt, p.max_steps, p.convergence);

        self.prime();
        let max_force = self.system.max_force_norm();
        steepest_descent_step(&mut self.system, dt, self.params.boxsize);
        self.emit(Phase::Minimize, step, recorder);

        if max_force < convergence {
            debug!(step, max_force, "minimization converged");
            Some(PhaseOutcome::Converged { steps: step, max_force })
        } else if step >= max_steps {
            warn!(
                steps = step,
                max_force,
                convergence,
                "minimization did not converge within its step budget"
            );
            Some(PhaseOutcome::NotConverged { steps: step, max_force })
        } else {
            None
        }
    }

    fn equilibrate_step(&mut self, first: bool, step: usize, recorder: &mut dyn Recorder) -> Option<PhaseOutcome> {
        let (dt, max_steps) = (self.params.equilibrate.dt, self.params.equilibrate.max_steps);

        if first {
            self.prime();
        }
        verlet_step(&mut self.system, &*self.field, dt, self.params.boxsize);
        if self.thermostat.apply(&mut self.system, dt).is_none() {
            trace!(step, "zero temperature, rescaling skipped");
        }
        self.emit(Phase::Equilibrate, step, recorder);

        (step >= max_steps).then_some(PhaseOutcome::Completed { steps: step })
    }

    fn produce_step(&mut self, first: bool, step: usize, recorder: &mut dyn Recorder) -> Option<PhaseOutcome> {
        let (dt, max_steps) = (self.params.produce.dt, self.params.produce.max_steps);

        if first {
            self.prime();
        }
        verlet_step(&mut self.system, &*self.field, dt, self.params.boxsize);
        self.emit(Phase::Produce, step, recorder);

        (step >= max_steps).then_some(PhaseOutcome::Completed { steps: step })
    }
}
