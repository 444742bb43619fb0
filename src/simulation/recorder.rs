//! Per-tick snapshots and the sinks that receive them
//!
//! The engine pushes one [`Snapshot`] per tick into a caller-owned
//! [`Recorder`] and never reads anything back. [`Metric`] is the closed
//! table of scalar observables a plot can be bound to by name.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use super::phases::Phase;
use super::states::{NVec2, ParticleSystem};

/// Read-only view of the system right after a tick
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub phase: Phase,
    pub step: usize, // 1-based step within `phase`
    pub tick: u64,   // 1-based tick since the engine was built
    pub positions: &'a [NVec2],
    pub velocities: &'a [NVec2],
    pub accelerations: &'a [NVec2],
    pub forces: &'a [NVec2],
    pub potentials: &'a [f64],
    pub potential_energy: f64,
    pub kinetic_energy: f64,
    pub total_energy: f64,
    pub temperature: f64,
    pub force_norm: f64,
    pub acceleration_norm: f64,
    pub velocity_norm: f64,
    pub max_force: f64,
}

impl<'a> Snapshot<'a> {
    pub fn capture(sys: &'a ParticleSystem, phase: Phase, step: usize, tick: u64) -> Self {
        Self {
            phase,
            step,
            tick,
            positions: sys.positions(),
            velocities: sys.velocities(),
            accelerations: sys.accelerations(),
            forces: sys.forces(),
            potentials: sys.potentials(),
            potential_energy: sys.potential_energy(),
            kinetic_energy: sys.kinetic_energy(),
            total_energy: sys.total_energy(),
            temperature: sys.temperature(),
            force_norm: sys.force_norm(),
            acceleration_norm: sys.acceleration_norm(),
            velocity_norm: sys.velocity_norm(),
            max_force: sys.max_force_norm(),
        }
    }
}

/// Sink for per-tick snapshots, owned by whoever drives the engine
pub trait Recorder {
    fn record(&mut self, snapshot: &Snapshot<'_>);
}

/// Scalar observables addressable by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    PotentialEnergy,
    KineticEnergy,
    TotalEnergy,
    Temperature,
    ForceNorm,
    AccelerationNorm,
    VelocityNorm,
    MaxForce,
}

impl Metric {
    pub const ALL: [Metric; 8] = [
        Metric::PotentialEnergy,
        Metric::KineticEnergy,
        Metric::TotalEnergy,
        Metric::Temperature,
        Metric::ForceNorm,
        Metric::AccelerationNorm,
        Metric::VelocityNorm,
        Metric::MaxForce,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Metric::PotentialEnergy => "potential_energy",
            Metric::KineticEnergy => "kinetic_energy",
            Metric::TotalEnergy => "total_energy",
            Metric::Temperature => "temperature",
            Metric::ForceNorm => "force_norm",
            Metric::AccelerationNorm => "acceleration_norm",
            Metric::VelocityNorm => "velocity_norm",
            Metric::MaxForce => "max_force",
        }
    }

    /// Plot title
    pub fn label(self) -> &'static str {
        match self {
            Metric::PotentialEnergy => "LJ potential",
            Metric::KineticEnergy => "Kinetic energy",
            Metric::TotalEnergy => "Total energy",
            Metric::Temperature => "Temperature",
            Metric::ForceNorm => "Force norm",
            Metric::AccelerationNorm => "Acceleration norm",
            Metric::VelocityNorm => "Velocity norm",
            Metric::MaxForce => "Max force",
        }
    }

    pub fn value(self, s: &Snapshot<'_>) -> f64 {
        match self {
            Metric::PotentialEnergy => s.potential_energy,
            Metric::KineticEnergy => s.kinetic_energy,
            Metric::TotalEnergy => s.total_energy,
            Metric::Temperature => s.temperature,
            Metric::ForceNorm => s.force_norm,
            Metric::AccelerationNorm => s.acceleration_norm,
            Metric::VelocityNorm => s.velocity_norm,
            Metric::MaxForce => s.max_force,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| format!("unknown metric `{s}`"))
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// In-memory recorder keeping a bounded time series per metric plus the
/// latest positions. Oldest samples are dropped once `capacity` is reached.
#[derive(Debug, Clone)]
pub struct SeriesRecorder {
    capacity: Option<usize>,
    series: Vec<VecDeque<f64>>,
    phases: VecDeque<Phase>,
    positions: Vec<NVec2>,
    recorded: u64,
}

impl Default for SeriesRecorder {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl SeriesRecorder {
    pub fn unbounded() -> Self {
        Self {
            capacity: None,
            series: vec![VecDeque::new(); Metric::ALL.len()],
            phases: VecDeque::new(),
            positions: Vec::new(),
            recorded: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity.max(1)),
            ..Self::unbounded()
        }
    }

    pub fn series(&self, metric: Metric) -> &VecDeque<f64> {
        &self.series[metric.index()]
    }

    /// Series lookup by metric name
    pub fn series_by_name(&self, name: &str) -> Option<&VecDeque<f64>> {
        name.parse::<Metric>().ok().map(|m| self.series(m))
    }

    pub fn latest(&self, metric: Metric) -> Option<f64> {
        self.series(metric).back().copied()
    }

    /// Phase of each retained sample
    pub fn phases(&self) -> &VecDeque<Phase> {
        &self.phases
    }

    pub fn positions(&self) -> &[NVec2] {
        &self.positions
    }

    /// Retained samples per series
    pub fn len(&self) -> usize {
        self.phases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    /// Snapshots received, including dropped ones
    pub fn recorded(&self) -> u64 {
        self.recorded
    }
}

impl Recorder for SeriesRecorder {
    fn record(&mut self, snapshot: &Snapshot<'_>) {
        let full = self.capacity.is_some_and(|c| self.phases.len() >= c);

        for metric in Metric::ALL {
            let s = &mut self.series[metric.index()];
            if full {
                s.pop_front();
            }
            s.push_back(metric.value(snapshot));
        }
        if full {
            self.phases.pop_front();
        }
        self.phases.push_back(snapshot.phase);

        self.positions.clear();
        self.positions.extend_from_slice(snapshot.positions);
        self.recorded += 1;
    }
}
