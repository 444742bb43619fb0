//! Phase state machine: Minimize -> Equilibrate -> Produce -> Done
//!
//! The enabled subset is fixed when the controller is built; disabled phases
//! are never entered. The controller only does bookkeeping, the engine runs
//! the per-phase step functions and reports completion back.

use std::fmt;

use tracing::info;

use super::params::SimulationParameters;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Minimize,
    Equilibrate,
    Produce,
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Minimize => "minimize",
            Phase::Equilibrate => "equilibrate",
            Phase::Produce => "produce",
            Phase::Done => "done",
        };
        f.write_str(name)
    }
}

/// How a phase ended
#[derive(Debug, Clone, PartialEq)]
pub enum PhaseOutcome {
    /// Minimization reached the force threshold
    Converged { steps: usize, max_force: f64 },
    /// Minimization used its whole budget; the run still continues
    NotConverged { steps: usize, max_force: f64 },
    /// Fixed-length phase ran all of its steps
    Completed { steps: usize },
}

impl PhaseOutcome {
    pub fn steps(&self) -> usize {
        match *self {
            PhaseOutcome::Converged { steps, .. }
            | PhaseOutcome::NotConverged { steps, .. }
            | PhaseOutcome::Completed { steps } => steps,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhaseState {
    pub current: Phase,
    pub step: usize,         // steps taken in the current phase
    pub enabled: Vec<Phase>, // in run order, never contains Done
    pub index: usize,        // position of `current` in `enabled`
}

#[derive(Debug, Clone)]
pub struct PhaseController {
    state: PhaseState,
    outcomes: Vec<(Phase, PhaseOutcome)>,
}

impl PhaseController {
    /// Build from an ordered list of phases. `Done` entries are ignored and
    /// the canonical order Minimize, Equilibrate, Produce is enforced.
    pub fn new(phases: &[Phase]) -> Self {
        let enabled: Vec<Phase> = [Phase::Minimize, Phase::Equilibrate, Phase::Produce]
            .into_iter()
            .filter(|p| phases.contains(p))
            .collect();

        let current = enabled.first().copied().unwrap_or(Phase::Done);
        if current == Phase::Done {
            info!("no simulation phase enabled, nothing to run");
        } else {
            info!(phase = %current, enabled = ?enabled, "starting run");
        }

        Self {
            state: PhaseState {
                current,
                step: 0,
                enabled,
                index: 0,
            },
            outcomes: Vec::new(),
        }
    }

    pub fn from_params(params: &SimulationParameters) -> Self {
        let mut phases = Vec::with_capacity(3);
        if params.minimize.enabled {
            phases.push(Phase::Minimize);
        }
        if params.equilibrate.enabled {
            phases.push(Phase::Equilibrate);
        }
        if params.produce.enabled {
            phases.push(Phase::Produce);
        }
        Self::new(&phases)
    }

    pub fn current(&self) -> Phase {
        self.state.current
    }

    /// Steps already taken in the current phase
    pub fn step(&self) -> usize {
        self.state.step
    }

    pub fn is_done(&self) -> bool {
        self.state.current == Phase::Done
    }

    pub fn state(&self) -> &PhaseState {
        &self.state
    }

    pub fn outcomes(&self) -> &[(Phase, PhaseOutcome)] {
        &self.outcomes
    }

    /// Count one more step in the current phase and return its 1-based number
    pub fn begin_step(&mut self) -> usize {
        self.state.step += 1;
        self.state.step
    }

    /// Close the current phase and move to the next enabled one (or Done)
    pub fn complete(&mut self, outcome: PhaseOutcome) {
        let finished = self.state.current;
        if finished == Phase::Done {
            return;
        }
        info!(phase = %finished, ?outcome, "phase finished");
        self.outcomes.push((finished, outcome));

        self.state.index += 1;
        self.state.step = 0;
        self.state.current = self
            .state
            .enabled
            .get(self.state.index)
            .copied()
            .unwrap_or(Phase::Done);

        if self.state.current == Phase::Done {
            info!("all phases finished");
        } else {
            info!(phase = %self.state.current, "entering phase");
        }
    }
}
