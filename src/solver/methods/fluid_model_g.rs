//! Model G coupled to compressible flow
//!
//! # Algorithm
//!
//! Each step applies, in order:
//!
//! 1. the Taylor reaction step at every grid point,
//! 2. the density `Σ_s density_s·C_s` over G, X and Y and, for every flow
//!    field, `ρ = ln(base + density)` with that field's base density and one
//!    [`FlowIntegrator`] update,
//! 3. diffusion and advection of every species by its flow field, using the
//!    velocity from *before* the update and the divergence returned by it,
//! 4. source terms at the pre-step time, scaled by `dt`,
//!
//! and advances the clock. Requires a 2D or 3D grid.
//!
//! # Flow coupling
//!
//! With [`FlowCoupling::Shared`] one velocity field (`dims` components) is
//! driven by the total density and advects G, X and Y. With
//! [`FlowCoupling::PerSpecies`] every species has its own field (`3·dims`
//! components ordered G, X, Y). All fields see the same total density and
//! differ only by their base density: `base-density3` for G, `base-density1`
//! for X and `base-density2` for Y.

use log::{debug, warn};

use crate::error::{SimulationError, SimulationResult};
use crate::models::{ModelGParameters, SourceFunctions};
use crate::physics::{Field, PhysicalQuantity, PhysicalState, Species, field};
use crate::solver::domain::Grid;
use crate::solver::integrators::{DiffusionAdvectionIntegrator, FlowIntegrator, react_three};
use crate::solver::scenario::Scenario;
use crate::solver::spectral::SpectralOperators;
use crate::solver::traits::{
    FlowCoupling, Simulation, SolverConfiguration, StabilityAdvisory, require_dimensions, stamp,
};

/// One velocity field and the species it advects
#[derive(Debug, Clone)]
struct FlowChannel {
    /// `None` for the shared field
    carrier: Option<Species>,
    base_density: f64,
    velocity: Vec<Field>,
    divergence: Field,
}

impl FlowChannel {
    fn carried(&self) -> &'static [Species] {
        match self.carrier {
            None => &Species::ALL,
            Some(Species::G) => &[Species::G],
            Some(Species::X) => &[Species::X],
            Some(Species::Y) => &[Species::Y],
        }
    }
}

/// Model G with compressible self-advecting flow
#[derive(Debug)]
pub struct FluidModelG {
    params: ModelGParameters,
    ops: SpectralOperators,
    coupling: FlowCoupling,
    transport: [DiffusionAdvectionIntegrator; 3],
    flow: FlowIntegrator,
    channels: Vec<FlowChannel>,
    fields: [Field; 3],
    sources: SourceFunctions,
    dt: f64,
    t: f64,
    steps: usize,
    advisory: Option<StabilityAdvisory>,
}

impl FluidModelG {
    /// Build the solver
    ///
    /// An empty `scenario.flow` starts the fluid at rest.
    ///
    /// # Errors
    ///
    /// - `UnsupportedDimension` on 1D grids
    /// - `FlowComponentMismatch` when the number of velocity components does
    ///   not match the flow coupling
    /// - `ShapeMismatch`, `InvalidParameter` as for [`ModelG`](crate::solver::ModelG)
    pub fn new(scenario: Scenario, params: ModelGParameters, config: SolverConfiguration) -> SimulationResult<Self> {
        config.validate()?;
        params.validate()?;
        require_dimensions("FluidModelG", &scenario.grid, 2..=3)?;
        scenario.validate()?;

        let grid = &scenario.grid;
        let ndim = grid.ndim();
        let coupling = config.resolve_flow_coupling(ndim);
        let expected = coupling.component_count(ndim);
        let mut components = scenario.flow.clone();
        if components.is_empty() {
            components = (0..expected).map(|_| grid.zeros()).collect();
        }
        if components.len() != expected {
            return Err(SimulationError::FlowComponentMismatch {
                ndim,
                expected,
                found: components.len(),
            });
        }

        let dt = config.resolve_dt(grid.dx());
        let advisory = StabilityAdvisory::check(dt, grid.dx());
        if let Some(advisory) = &advisory {
            warn!("FluidModelG: {advisory}");
        }

        let ops = SpectralOperators::new(grid);
        let steady = params.steady_state();
        let offset = config.resolve_steady_state_offset(ndim);
        let transport = Species::ALL.map(|s| {
            let background = if offset { steady.get(s) } else { 0.0 };
            DiffusionAdvectionIntegrator::new(&ops, params.diffusion(s), background, dt)
        });
        let flow = FlowIntegrator::new(&ops, params.viscosity, params.speed_of_sound, dt);

        let channels = coupling
            .carriers()
            .into_iter()
            .zip(components.chunks(ndim))
            .map(|(carrier, velocity)| FlowChannel {
                carrier,
                base_density: params.base_density_for(carrier),
                velocity: velocity.to_vec(),
                divergence: grid.zeros(),
            })
            .collect();

        let fields = Species::ALL.map(|s| scenario.initial_concentration(s));

        debug!(
            "FluidModelG: grid {:?}, dx = {}, dt = {}, {:?} flow, steady-state offset {}",
            grid.shape(),
            grid.dx(),
            dt,
            coupling,
            offset
        );

        Ok(Self {
            params,
            ops,
            coupling,
            transport,
            flow,
            channels,
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

    /// Velocity components of a flow field
    ///
    /// `None` selects the shared field, `Some(s)` the field advecting `s`;
    /// returns `None` when that field does not exist under the current coupling.
    pub fn velocity(&self, carrier: Option<Species>) -> Option<&[Field]> {
        self.channel(carrier).map(|c| c.velocity.as_slice())
    }

    /// Velocity field that advects `species`, whatever the coupling
    pub fn velocity_of(&self, species: Species) -> &[Field] {
        let carrier = match self.coupling {
            FlowCoupling::Shared => None,
            FlowCoupling::PerSpecies => Some(species),
        };
        self.velocity(carrier).unwrap_or(&[])
    }

    /// Divergence returned by the last flow update of a field
    pub fn divergence(&self, carrier: Option<Species>) -> Option<&Field> {
        self.channel(carrier).map(|c| &c.divergence)
    }

    /// Flow layout in use
    pub fn flow_coupling(&self) -> FlowCoupling {
        self.coupling
    }

    /// Model parameters
    pub fn parameters(&self) -> &ModelGParameters {
        &self.params
    }

    fn channel(&self, carrier: Option<Species>) -> Option<&FlowChannel> {
        self.channels.iter().find(|c| c.carrier == carrier)
    }

    /// Density-weighted sum `Σ density_s·C_s` over all species
    fn total_density(&self) -> Field {
        let mut density = self.ops.grid().zeros();
        for species in Species::ALL {
            density.scaled_add(self.params.density(species), &self.fields[species.index()]);
        }
        density
    }
}

impl Simulation for FluidModelG {
    fn step(&mut self) {
        let [g, x, y] = &mut self.fields;
        react_three(&self.params, g, x, y, self.dt);

        let density = self.total_density();
        let updates: Vec<_> = self
            .channels
            .iter()
            .map(|channel| {
                let mut rho = density.clone();
                let base = channel.base_density;
                field::apply(&mut rho, |d| (base + d).ln());
                self.flow.step(&self.ops, &rho, &channel.velocity)
            })
            .collect();

        for (channel, update) in self.channels.iter_mut().zip(updates) {
            for &species in channel.carried() {
                self.transport[species.index()].apply(
                    &self.ops,
                    &mut self.fields[species.index()],
                    &channel.velocity,
                    &update.divergence,
                );
            }
            channel.velocity = update.velocity;
            channel.divergence = update.divergence;
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
        for channel in &self.channels {
            for (axis, component) in channel.velocity.iter().enumerate() {
                state.set(
                    PhysicalQuantity::Velocity { carrier: channel.carrier, axis },
                    component.clone(),
                );
            }
            state.set(
                PhysicalQuantity::Divergence { carrier: channel.carrier },
                channel.divergence.clone(),
            );
        }
        stamp(&mut state, self.t, self.dt, self.steps);
        state
    }

    fn name(&self) -> &str {
        "FluidModelG"
    }

    fn stability_advisory(&self) -> Option<&StabilityAdvisory> {
        self.advisory.as_ref()
    }

    fn validate_state(&self) -> SimulationResult<()> {
        let concentrations = Species::ALL
            .iter()
            .map(|&s| (PhysicalQuantity::Concentration(s), &self.fields[s.index()]));
        let velocities = self.channels.iter().flat_map(|channel| {
            channel
                .velocity
                .iter()
                .enumerate()
                .map(|(axis, u)| (PhysicalQuantity::Velocity { carrier: channel.carrier, axis }, u))
        });
        crate::solver::check_fields(concentrations.chain(velocities), self.t, self.steps)
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn grid_2d() -> Grid {
        Grid::square(2, 16, 0.5).unwrap()
    }

    #[test]
    fn test_rejects_one_dimension() {
        let scenario = Scenario::new(Grid::square(1, 16, 0.5).unwrap());
        let result = FluidModelG::new(scenario, ModelGParameters::default(), SolverConfiguration::default());
        assert!(matches!(
            result,
            Err(SimulationError::UnsupportedDimension { model: "FluidModelG", ndim: 1 })
        ));
    }

    #[test]
    fn test_rejects_wrong_component_count() {
        let grid = grid_2d();
        let scenario = Scenario::new(grid.clone()).with_flow(vec![grid.zeros(), grid.zeros()]);
        // 2D defaults to one field per species: 6 components expected
        let result = FluidModelG::new(scenario, ModelGParameters::default(), SolverConfiguration::default());
        assert!(matches!(
            result,
            Err(SimulationError::FlowComponentMismatch { ndim: 2, expected: 6, found: 2 })
        ));
    }

    #[test]
    fn test_shared_flow_layout() {
        let grid = grid_2d();
        let scenario = Scenario::new(grid.clone()).with_flow(vec![grid.constant(0.1), grid.zeros()]);
        let config = SolverConfiguration::new().with_flow_coupling(FlowCoupling::Shared);
        let model = FluidModelG::new(scenario, ModelGParameters::default(), config).unwrap();

        assert_eq!(model.flow_coupling(), FlowCoupling::Shared);
        assert!(model.velocity(None).is_some());
        assert!(model.velocity(Some(Species::G)).is_none());
        assert_eq!(model.velocity_of(Species::Y)[0][[3, 3]], 0.1);
    }

    #[test]
    fn test_per_species_components_in_order() {
        let grid = grid_2d();
        let flow = (0..6).map(|i| grid.constant(i as f64 * 0.01)).collect();
        let scenario = Scenario::new(grid).with_flow(flow);
        let model = FluidModelG::new(scenario, ModelGParameters::default(), SolverConfiguration::default()).unwrap();

        assert_eq!(model.flow_coupling(), FlowCoupling::PerSpecies);
        assert_eq!(model.velocity_of(Species::G)[1][[0, 0]], 0.01);
        assert_eq!(model.velocity_of(Species::X)[0][[0, 0]], 0.02);
        assert_eq!(model.velocity_of(Species::Y)[1][[0, 0]], 0.05);
    }

    #[test]
    fn test_uniform_state_at_rest_stays_at_rest() {
        let mut model = FluidModelG::new(
            Scenario::new(grid_2d()),
            ModelGParameters::default(),
            SolverConfiguration::default(),
        )
        .unwrap();
        model.run(5);

        for species in Species::ALL {
            assert!(model.concentration(species).iter().all(|c| c.abs() < 1e-14));
            for u in model.velocity_of(species) {
                assert!(u.iter().all(|v| v.abs() < 1e-14));
            }
        }
        assert_relative_eq!(model.time(), 5.0 * 0.05, epsilon = 1e-12);
        assert!(model.validate_state().is_ok());
    }

    #[test]
    fn test_density_gradient_drives_flow() {
        let grid = grid_2d();
        let bump = grid.distance_squared(&[0.0, 0.0]).mapv(|r2| 0.5 * (-0.5 * r2).exp());
        let scenario = Scenario::new(grid).with_concentration(Species::G, bump);
        let config = SolverConfiguration::new().with_flow_coupling(FlowCoupling::Shared);
        let mut model = FluidModelG::new(scenario, ModelGParameters::default(), config).unwrap();

        model.step();
        let u = &model.velocity(None).unwrap()[0];
        // Pressure pushes fluid away from the dense centre along +x on the right side
        assert!(u[[10, 8]] > 0.0);
        assert!(u[[6, 8]] < 0.0);

        let snapshot = model.snapshot();
        assert_eq!(snapshot.len(), 3 + 2 + 1);
        assert!(snapshot.get(PhysicalQuantity::Divergence { carrier: None }).is_some());
    }

    #[test]
    fn test_every_channel_sees_total_density() {
        // Only X is perturbed, yet every per-species field feels its pressure
        let grid = grid_2d();
        let bump = grid.distance_squared(&[0.0, 0.0]).mapv(|r2| 0.5 * (-0.5 * r2).exp());
        let scenario = Scenario::new(grid).with_concentration(Species::X, bump);
        let mut model =
            FluidModelG::new(scenario, ModelGParameters::default(), SolverConfiguration::default()).unwrap();
        assert_eq!(model.flow_coupling(), FlowCoupling::PerSpecies);

        model.step();
        let u_x = model.velocity_of(Species::X);
        assert!(field::max_abs(&u_x[0]) > 1e-5);
        assert_eq!(model.velocity_of(Species::G), u_x);
        assert_eq!(model.velocity_of(Species::Y), u_x);
        assert_eq!(model.divergence(Some(Species::G)), model.divergence(Some(Species::X)));
    }

    #[test]
    fn test_base_density_sets_channel_pressure() {
        let grid = grid_2d();
        let bump = grid.distance_squared(&[0.0, 0.0]).mapv(|r2| 0.5 * (-0.5 * r2).exp());
        let scenario = Scenario::new(grid).with_concentration(Species::X, bump);
        let params = ModelGParameters { base_density_g: 20.0, ..Default::default() };
        let mut model = FluidModelG::new(scenario, params, SolverConfiguration::default()).unwrap();

        model.step();
        // A larger background flattens ln(base + density)
        let u_g = field::max_abs(&model.velocity_of(Species::G)[0]);
        let u_x = field::max_abs(&model.velocity_of(Species::X)[0]);
        assert!(u_g > 0.0 && u_g < u_x);
    }

    #[test]
    fn test_negative_log_argument_is_detected_on_request() {
        let grid = grid_2d();
        let scenario = Scenario::new(grid.clone()).with_concentration(Species::X, grid.constant(-10.0));
        let params = ModelGParameters::default().with_base_density(1.0);
        let config = SolverConfiguration::new().with_dt(0.001);
        let mut model = FluidModelG::new(scenario, params, config).unwrap();

        // ln(1 + density_X·X) has a negative argument

        model.step();
        assert!(matches!(model.validate_state(), Err(SimulationError::NonFinite { .. })));
    }
}
