//! Simulation scenario definition
//!
//! A scenario is the "WHAT to solve": the periodic grid, the initial
//! perturbation of each species, the initial velocity components (fluid
//! models only) and the source terms. The numerical "HOW" lives in
//! [`SolverConfiguration`](crate::solver::SolverConfiguration).

use std::collections::BTreeMap;

use crate::error::SimulationResult;
use crate::models::{SourceFunctions, SourceTerm};
use crate::physics::{Field, Species};
use crate::solver::domain::Grid;

/// Simulation scenario
///
/// Species without an initial field start at the steady state (a zero
/// perturbation).
///
/// # Examples
///
/// ```rust
/// use modelg_rs::models::SourceTerm;
/// use modelg_rs::physics::Species;
/// use modelg_rs::solver::{Grid, Scenario};
///
/// let grid = Grid::square(2, 64, 0.25).unwrap();
/// let seed = grid.distance_squared(&[0.0, 0.0]).mapv(|r2| 0.01 * (-r2).exp());
///
/// let scenario = Scenario::new(grid)
///     .with_concentration(Species::X, seed)
///     .with_source(Species::G, SourceTerm::gaussian_pulse(vec![], -10.0, 0.5, 5.0, 0.5));
/// assert!(scenario.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct Scenario {
    /// Periodic domain
    pub grid: Grid,

    /// Initial perturbation of each species
    pub concentrations: BTreeMap<Species, Field>,

    /// Initial velocity components, in flow storage order
    pub flow: Vec<Field>,

    /// External forcing
    pub sources: SourceFunctions,
}

impl Scenario {
    /// Scenario at rest at the steady state
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            concentrations: BTreeMap::new(),
            flow: Vec::new(),
            sources: SourceFunctions::new(),
        }
    }

    /// Scenario from the three initial fields G, X, Y
    pub fn from_fields(grid: Grid, g: Field, x: Field, y: Field) -> Self {
        Self::new(grid)
            .with_concentration(Species::G, g)
            .with_concentration(Species::X, x)
            .with_concentration(Species::Y, y)
    }

    /// Set the initial perturbation of one species
    pub fn with_concentration(mut self, species: Species, field: Field) -> Self {
        self.concentrations.insert(species, field);
        self
    }

    /// Set the initial velocity components
    pub fn with_flow(mut self, components: Vec<Field>) -> Self {
        self.flow = components;
        self
    }

    /// Set the source term of one species
    pub fn with_source(mut self, species: Species, term: SourceTerm) -> Self {
        self.sources.insert(species, term);
        self
    }

    /// Replace all source terms
    pub fn with_sources(mut self, sources: SourceFunctions) -> Self {
        self.sources = sources;
        self
    }

    /// Verify that every supplied field has the grid shape
    ///
    /// Velocity component counts depend on the flow coupling and are checked
    /// by the fluid solver.
    pub fn validate(&self) -> SimulationResult<()> {
        for (species, field) in &self.concentrations {
            self.grid.check_field(species.label(), field)?;
        }
        for (index, component) in self.flow.iter().enumerate() {
            self.grid.check_field(&format!("flow[{index}]"), component)?;
        }
        Ok(())
    }

    /// Initial field of a species (zeros when not supplied)
    pub fn initial_concentration(&self, species: Species) -> Field {
        self.concentrations
            .get(&species)
            .cloned()
            .unwrap_or_else(|| self.grid.zeros())
    }

    /// Spatial dimensionality
    pub fn ndim(&self) -> usize {
        self.grid.ndim()
    }
}

// ================================================================================================
// Tests
// ================================================================================================
