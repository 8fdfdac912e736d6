//! Reaction-diffusion solver for Model G
//!
//! # Algorithm
//!
//! Each step applies, in order:
//!
//! 1. the 4th-order Taylor reaction step at every grid point,
//! 2. exact spectral diffusion of G, X and Y,
//! 3. the source terms evaluated at the time at the start of the step,
//!    scaled by `dt`,
//!
//! and then advances the clock by `dt`. Works on 1D, 2D and 3D grids.
//!
//! # Example
//!
//! ```rust
//! use modelg_rs::models::{ModelGParameters, SourceTerm};
//! use modelg_rs::physics::Species;
//! use modelg_rs::solver::{Grid, ModelG, Scenario, Simulation, SolverConfiguration};
//!
//! let grid = Grid::square(2, 32, 0.25).unwrap();
//! let scenario = Scenario::new(grid)
//!     .with_source(Species::G, SourceTerm::gaussian_pulse(vec![], -10.0, 0.5, 0.5, 0.5));
//!
//! let mut model = ModelG::new(scenario, ModelGParameters::default(), SolverConfiguration::default()).unwrap();
//! model.run(20);
//! assert_eq!(model.steps(), 20);
//! assert!(model.concentration(Species::G).iter().any(|&g| g < 0.0));
//! ```

use log::{debug, warn};

use crate::error::SimulationResult;
use crate::models::{ModelGParameters, SourceFunctions};
use crate::physics::{Field, PhysicalQuantity, PhysicalState, Species};
use crate::solver::domain::Grid;
use crate::solver::integrators::{DiffusionIntegrator, react_three};
use crate::solver::scenario::Scenario;
use crate::solver::spectral::SpectralOperators;
use crate::solver::traits::{Simulation, SolverConfiguration, StabilityAdvisory, require_dimensions, stamp};

/// Model G without flow
#[derive(Debug)]
pub struct ModelG {
    params: ModelGParameters,
    ops: SpectralOperators,
    diffusion: [DiffusionIntegrator; 3],
    fields: [Field; 3],
    sources: SourceFunctions,
    dt: f64,
    t: f64,
    steps: usize,
    advisory: Option<StabilityAdvisory>,
}

impl ModelG {
    /// Build the solver
    ///
    /// # Errors
    ///
    /// - invalid configuration or parameters
    /// - an initial field whose shape differs from the grid
    pub fn new(scenario: Scenario, params: ModelGParameters, config: SolverConfiguration) -> SimulationResult<Self> {
        config.validate()?;
        params.validate()?;
        scenario.validate()?;
        require_dimensions("ModelG", &scenario.grid, 1..=3)?;

        let grid = &scenario.grid;
        if !scenario.flow.is_empty() {
            warn!("ModelG: ignoring {} velocity components, use FluidModelG for flow", scenario.flow.len());
        }

        let dt = config.resolve_dt(grid.dx());
        let advisory = StabilityAdvisory::check(dt, grid.dx());
        if let Some(advisory) = &advisory {
            warn!("ModelG: {advisory}");
        }

        let ops = SpectralOperators::new(grid);
        let diffusion = Species::ALL.map(|s| DiffusionIntegrator::new(&ops, params.diffusion(s), dt));
        let fields = Species::ALL.map(|s| scenario.initial_concentration(s));

        debug!(
            "ModelG: grid {:?}, dx = {}, dt = {}, sources on {:?}",
            grid.shape(),
            grid.dx(),
            dt,
            scenario.sources.species().collect::<Vec<_>>()
        );

        Ok(Self {
            params,
            ops,
            diffusion,
            fields,
            sources: scenario.sources,
            dt,
            t: 0.0,
            steps: 0,
            advisory,
        })
    }

    /// Current perturbation of a species from its steady state
    pub fn concentration(&self, species: Species) -> &Field {
        &self.fields[species.index()]
    }

    /// Current absolute concentration (`perturbation + steady state`)
    pub fn absolute_concentration(&self, species: Species) -> Field {
        let steady = self.params.steady_state().get(species);
        self.fields[species.index()].mapv(|c| c + steady)
    }

    /// Model parameters
    pub fn parameters(&self) -> &ModelGParameters {
        &self.params
    }
}

impl Simulation for ModelG {
    fn step(&mut self) {
        let [g, x, y] = &mut self.fields;
        react_three(&self.params, g, x, y, self.dt);

        for (field, diffusion) in self.fields.iter_mut().zip(&self.diffusion) {
            diffusion.apply(&self.ops, field);
        }

        for species in Species::ALL {
            self.sources.apply(species, self.t, self.ops.grid(), &mut self.fields[species.index()], self.dt);
        }

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
        let mut state = PhysicalState::empty();
        for species in Species::ALL {
            state.set(PhysicalQuantity::Concentration(species), self.fields[species.index()].clone());
        }
        stamp(&mut state, self.t, self.dt, self.steps);
        state
    }

    fn name(&self) -> &str {
        "ModelG"
    }

    fn stability_advisory(&self) -> Option<&StabilityAdvisory> {
        self.advisory.as_ref()
    }

    fn validate_state(&self) -> SimulationResult<()> {
        let fields = Species::ALL
            .iter()
            .map(|&s| (PhysicalQuantity::Concentration(s), &self.fields[s.index()]));
        crate::solver::check_fields(fields, self.t, self.steps)
    }
}

// =================================================================================================
// Tests
// =================================================================================================
