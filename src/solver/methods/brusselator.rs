//! Reaction-diffusion solver for the Brusselator
//!
//! Each step diffuses X and Y exactly in Fourier space, then applies the
//! Taylor reaction step, then adds the sources evaluated at the pre-step time
//! and advances the clock. Works on 1D, 2D and 3D grids; a G field or source
//! in the scenario is ignored with a warning.

use log::{debug, warn};

use crate::error::SimulationResult;
use crate::models::{BRUSSELATOR_SPECIES, BrusselatorParameters, SourceFunctions};
use crate::physics::{Field, PhysicalQuantity, PhysicalState, Species};
use crate::solver::domain::Grid;
use crate::solver::integrators::{DiffusionIntegrator, react_two};
use crate::solver::scenario::Scenario;
use crate::solver::spectral::SpectralOperators;
use crate::solver::traits::{Simulation, SolverConfiguration, StabilityAdvisory, require_dimensions, stamp};

/// Brusselator without flow
#[derive(Debug)]
pub struct Brusselator {
    params: BrusselatorParameters,
    ops: SpectralOperators,
    diffusion: [DiffusionIntegrator; 2],
    x: Field,
    y: Field,
    sources: SourceFunctions,
    dt: f64,
    t: f64,
    steps: usize,
    advisory: Option<StabilityAdvisory>,
}

impl Brusselator {
    /// Build the solver
    ///
    /// # Errors
    ///
    /// - invalid configuration or parameters
    /// - an initial field whose shape differs from the grid
    pub fn new(scenario: Scenario, params: BrusselatorParameters, config: SolverConfiguration) -> SimulationResult<Self> {
        config.validate()?;
        params.validate()?;
        scenario.validate()?;
        require_dimensions("Brusselator", &scenario.grid, 1..=3)?;

        let grid = &scenario.grid;
        if scenario.concentrations.contains_key(&Species::G) || scenario.sources.get(Species::G).is_some() {
            warn!("Brusselator: ignoring G, the model only tracks X and Y");
        }
        if !scenario.flow.is_empty() {
            warn!("Brusselator: ignoring {} velocity components", scenario.flow.len());
        }

        let dt = config.resolve_dt(grid.dx());
        let advisory = StabilityAdvisory::check(dt, grid.dx());
        if let Some(advisory) = &advisory {
            warn!("Brusselator: {advisory}");
        }

        let ops = SpectralOperators::new(grid);
        let diffusion = BRUSSELATOR_SPECIES.map(|s| DiffusionIntegrator::new(&ops, params.diffusion(s), dt));

        debug!("Brusselator: grid {:?}, dx = {}, dt = {}", grid.shape(), grid.dx(), dt);

        Ok(Self {
            params,
            diffusion,
            x: scenario.initial_concentration(Species::X),
            y: scenario.initial_concentration(Species::Y),
            ops,
            sources: scenario.sources,
            dt,
            t: 0.0,
            steps: 0,
            advisory,
        })
    }

    /// Current perturbation of X or Y
    ///
    /// Returns `None` for [`Species::G`], which the Brusselator does not track.
    pub fn concentration(&self, species: Species) -> Option<&Field> {
        match species {
            Species::X => Some(&self.x),
            Species::Y => Some(&self.y),
            Species::G => None,
        }
    }

    /// Model parameters
    pub fn parameters(&self) -> &BrusselatorParameters {
        &self.params
    }
}

impl Simulation for Brusselator {
    fn step(&mut self) {
        self.diffusion[0].apply(&self.ops, &mut self.x);
        self.diffusion[1].apply(&self.ops, &mut self.y);

        react_two(&self.params, &mut self.x, &mut self.y, self.dt);

        let grid = self.ops.grid();
        self.sources.apply(Species::X, self.t, grid, &mut self.x, self.dt);
        self.sources.apply(Species::Y, self.t, grid, &mut self.y, self.dt);

        self.t += self.dt;
        self.steps += 1;
    }

    fn time(&self) -> f64 {
        self.t
    }

    fn dt(&self) -> f64 {
        self.dt
    }

    fn steps(&self) -> usize {
        self.steps
    }

    fn grid(&self) -> &Grid {
        self.ops.grid()
    }

    fn snapshot(&self) -> PhysicalState {
        let mut state = PhysicalState::new(PhysicalQuantity::Concentration(Species::X), self.x.clone());
        state.set(PhysicalQuantity::Concentration(Species::Y), self.y.clone());
        stamp(&mut state, self.t, self.dt, self.steps);
        state
    }

    fn name(&self) -> &str {
        "Brusselator"
    }

    fn stability_advisory(&self) -> Option<&StabilityAdvisory> {
        self.advisory.as_ref()
    }
}
