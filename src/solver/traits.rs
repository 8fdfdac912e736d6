//! Simulation traits and configuration types
//!
//! # Design Philosophy
//!
//! - `Simulation` trait: the stepping and readback contract shared by every
//!   model solver
//! - `SolverConfiguration`: HOW to integrate (time step, flow coupling,
//!   steady-state linearisation); every field is optional and resolved against
//!   the grid when a solver is built
//! - `StabilityAdvisory`: non-fatal warning recorded when the chosen time step
//!   is large compared with the lattice constant

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{SimulationError, SimulationResult, require_positive};
use crate::physics::{PhysicalState, Species};
use crate::solver::domain::Grid;

/// Default time step as a fraction of the lattice constant
pub const DEFAULT_DT_RATIO: f64 = 0.1;

/// Largest `dt / dx` ratio that does not trigger a [`StabilityAdvisory`]
pub const STABLE_DT_RATIO: f64 = 0.5;

// =================================================================================================
// Flow coupling
// =================================================================================================

/// How velocity fields are attached to the species of a fluid solver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlowCoupling {
    /// One velocity field, driven by the total density, advects every species
    Shared,
    /// Each species has its own velocity field driven by its own density
    PerSpecies,
}

impl FlowCoupling {
    /// Coupling used when none is configured: per species in 2D, shared in 3D
    pub fn default_for(ndim: usize) -> Self {
        if ndim == 2 { Self::PerSpecies } else { Self::Shared }
    }

    /// Number of velocity components expected on an `ndim` grid
    pub fn component_count(self, ndim: usize) -> usize {
        match self {
            Self::Shared => ndim,
            Self::PerSpecies => Species::ALL.len() * ndim,
        }
    }

    /// Flow fields in storage order (`None` = shared field)
    pub fn carriers(self) -> Vec<Option<Species>> {
        match self {
            Self::Shared => vec![None],
            Self::PerSpecies => Species::ALL.iter().copied().map(Some).collect(),
        }
    }
}

// =================================================================================================
// Stability advisory
// =================================================================================================

/// Warning that `dt` exceeds `0.5·dx`
///
/// The solver is still built and steps normally; the advisory is kept so
/// callers can inspect it and is logged once with `log::warn!`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StabilityAdvisory {
    pub dt: f64,
    pub dx: f64,
}

impl StabilityAdvisory {
    /// Advisory for this `(dt, dx)` pair, if one is due
    pub fn check(dt: f64, dx: f64) -> Option<Self> {
        (dt > STABLE_DT_RATIO * dx).then_some(Self { dt, dx })
    }

    /// Ratio `dt / dx`
    pub fn ratio(&self) -> f64 {
        self.dt / self.dx
    }
}

impl fmt::Display for StabilityAdvisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "time step dt = {} is larger than {}·dx = {} and may be unstable",
            self.dt,
            STABLE_DT_RATIO,
            STABLE_DT_RATIO * self.dx
        )
    }
}

// =================================================================================================
// Solver configuration
// =================================================================================================

/// Numerical settings of a model solver
///
/// # Examples
///
/// ```rust
/// use modelg_rs::solver::{FlowCoupling, SolverConfiguration};
///
/// // Everything derived from the grid
/// let config = SolverConfiguration::default();
/// assert_eq!(config.resolve_dt(0.25), 0.025);
///
/// // Explicit choices
/// let config = SolverConfiguration::new()
///     .with_dt(0.01)
///     .with_flow_coupling(FlowCoupling::Shared)
///     .with_steady_state_offset(false);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SolverConfiguration {
    /// Fixed time step; `0.1·dx` when unset
    pub dt: Option<f64>,
    /// Flow layout of fluid solvers; [`FlowCoupling::default_for`] when unset
    pub flow_coupling: Option<FlowCoupling>,
    /// Add the steady-state value to advected concentrations in the
    /// compression term; on in 3D, off otherwise when unset
    pub steady_state_offset: Option<bool>,
}

impl SolverConfiguration {
    /// Configuration with every setting derived from the grid
    pub fn new() -> Self {
        Self::default()
    }

    /// Fix the time step
    pub fn with_dt(mut self, dt: f64) -> Self {
        self.dt = Some(dt);
        self
    }

    /// Choose the flow layout
    pub fn with_flow_coupling(mut self, coupling: FlowCoupling) -> Self {
        self.flow_coupling = Some(coupling);
        self
    }

    /// Force steady-state linearisation on or off
    pub fn with_steady_state_offset(mut self, enabled: bool) -> Self {
        self.steady_state_offset = Some(enabled);
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> SimulationResult<()> {
        if let Some(dt) = self.dt {
            require_positive("dt", dt)?;
        }
        Ok(())
    }

    /// Effective time step for lattice constant `dx`
    pub fn resolve_dt(&self, dx: f64) -> f64 {
        self.dt.unwrap_or(DEFAULT_DT_RATIO * dx)
    }

    /// Effective flow layout for an `ndim` grid
    pub fn resolve_flow_coupling(&self, ndim: usize) -> FlowCoupling {
        self.flow_coupling.unwrap_or_else(|| FlowCoupling::default_for(ndim))
    }

    /// Effective steady-state linearisation for an `ndim` grid
    pub fn resolve_steady_state_offset(&self, ndim: usize) -> bool {
        self.steady_state_offset.unwrap_or(ndim == 3)
    }
}

// =================================================================================================
// Simulation trait
// =================================================================================================

/// Time-stepping contract of every model solver
///
/// # Stability
///
/// `step()` never fails: configuration problems are rejected when the solver
/// is built and numerical blow-up is only detected on request through
/// [`validate_state`](Simulation::validate_state).
pub trait Simulation: Send {
    /// Advance by one time step
    fn step(&mut self);

    /// Current simulation time
    fn time(&self) -> f64;

    /// Fixed time step
    fn dt(&self) -> f64;

    /// Number of steps taken so far
    fn steps(&self) -> usize;

    /// Domain of the simulation
    fn grid(&self) -> &Grid;

    /// Copy of every exposed field with `time`, `dt` and `step` metadata
    fn snapshot(&self) -> PhysicalState;

    /// Name of the model (used to display and logging)
    fn name(&self) -> &str;

    /// Advisory recorded at construction, if any
    fn stability_advisory(&self) -> Option<&StabilityAdvisory>;

    /// Advance by `steps` time steps
    fn run(&mut self, steps: usize) {
        for _ in 0..steps {
            self.step();
        }
    }

    /// Step until `time() >= end_time` (within half a step)
    fn run_until(&mut self, end_time: f64) {
        while self.time() + 0.5 * self.dt() < end_time {
            self.step();
        }
    }

    /// Scan all fields for NaN or Inf
    fn validate_state(&self) -> SimulationResult<()> {
        crate::solver::validate_state(&self.snapshot(), self.steps())
    }
}

/// Common metadata written into every snapshot
pub(crate) fn stamp(state: &mut PhysicalState, time: f64, dt: f64, steps: usize) {
    state.set_metadata("time".to_string(), time);
    state.set_metadata("dt".to_string(), dt);
    state.set_metadata("step".to_string(), steps as f64);
}

/// Fail fast when the grid dimensionality is outside `range`
pub(crate) fn require_dimensions(
    model: &'static str,
    grid: &Grid,
    range: std::ops::RangeInclusive<usize>,
) -> SimulationResult<()> {
    if !range.contains(&grid.ndim()) {
        return Err(SimulationError::UnsupportedDimension { model, ndim: grid.ndim() });
    }
    Ok(())
}

// =================================================================================================
// Tests
// =================================================================================================
