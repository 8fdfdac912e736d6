//! Integration tests for the model solvers
//!
//! These tests build complete solvers from scenarios and check construction
//! guards, fixed points, determinism and the qualitative nucleation pattern.

use approx::assert_relative_eq;
use nalgebra::Vector3;

use modelg_rs::prelude::*;

mod common;
use common::{assert_fields_close, center_index, gaussian_seed, nucleation_scenario, relative_error};

// =================================================================================================
// Steady state
// =================================================================================================

#[test]
fn test_steady_state_zeroes_absolute_kinetics() {
    let params = [
        ModelGParameters::default(),
        ModelGParameters::default().with_a(4.2).with_b(12.0),
        ModelGParameters { k2: 0.7, k_minus_2: 0.3, k5: 1.3, ..Default::default() },
    ];
    for p in params {
        let steady = p.steady_state().to_vector();
        let rates = p.absolute_rates(steady);
        assert!(rates.norm() < 1e-12, "rates {rates:?} at steady state {steady:?}");

        // And the perturbation form keeps the origin fixed
        assert_eq!(p.advance(Vector3::zeros(), 0.1), Vector3::zeros());
    }
}

#[test]
fn test_all_solvers_rest_at_steady_state() {
    let grid = Grid::square(2, 16, 0.5).unwrap();
    let config = SolverConfiguration::default();

    let mut solvers: Vec<Box<dyn Simulation>> = vec![
        Box::new(ModelG::new(Scenario::new(grid.clone()), ModelGParameters::default(), config).unwrap()),
        Box::new(FluidModelG::new(Scenario::new(grid.clone()), ModelGParameters::default(), config).unwrap()),
        Box::new(Brusselator::new(Scenario::new(grid.clone()), BrusselatorParameters::default(), config).unwrap()),
    ];

    for solver in solvers.iter_mut() {
        solver.run(10);
        let snapshot = solver.snapshot();
        for (quantity, data) in snapshot.iter() {
            assert!(
                data.iter().all(|v| v.abs() < 1e-12),
                "{} drifted in {}",
                quantity,
                solver.name()
            );
        }
        assert_relative_eq!(solver.time(), 10.0 * 0.05, epsilon = 1e-12);
    }
}

// =================================================================================================
// Construction guards
// =================================================================================================

#[test]
fn test_fluid_model_rejects_one_dimension() {
    let scenario = Scenario::new(Grid::square(1, 32, 0.5).unwrap());
    let result = FluidModelG::new(scenario, ModelGParameters::default(), SolverConfiguration::default());
    assert!(matches!(result, Err(SimulationError::UnsupportedDimension { ndim: 1, .. })));
}

#[test]
fn test_mismatched_shapes_are_rejected() {
    let grid = Grid::square(2, 16, 0.5).unwrap();
    let small = Grid::square(2, 8, 0.5).unwrap();

    let scenario = Scenario::new(grid.clone()).with_concentration(Species::Y, small.zeros());
    assert!(matches!(
        ModelG::new(scenario, ModelGParameters::default(), SolverConfiguration::default()),
        Err(SimulationError::ShapeMismatch { .. })
    ));

    let flow = vec![grid.zeros(), small.zeros()];
    let scenario = Scenario::new(grid.clone()).with_flow(flow);
    let config = SolverConfiguration::new().with_flow_coupling(FlowCoupling::Shared);
    assert!(matches!(
        FluidModelG::new(scenario, ModelGParameters::default(), config),
        Err(SimulationError::ShapeMismatch { .. })
    ));
}

#[test]
fn test_flow_component_count_follows_coupling() {
    let grid = Grid::square(3, 8, 0.5).unwrap();
    let three: Vec<Field> = (0..3).map(|_| grid.zeros()).collect();

    // 3D defaults to one shared field: three components
    let shared = FluidModelG::new(
        Scenario::new(grid.clone()).with_flow(three.clone()),
        ModelGParameters::default(),
        SolverConfiguration::default(),
    )
    .unwrap();
    assert_eq!(shared.flow_coupling(), FlowCoupling::Shared);

    // The same components are too few for per-species flow
    let per_species = FluidModelG::new(
        Scenario::new(grid).with_flow(three),
        ModelGParameters::default(),
        SolverConfiguration::new().with_flow_coupling(FlowCoupling::PerSpecies),
    );
    assert!(matches!(
        per_species,
        Err(SimulationError::FlowComponentMismatch { ndim: 3, expected: 9, found: 3 })
    ));
}

#[test]
fn test_invalid_parameters_are_rejected() {
    let grid = Grid::square(1, 8, 0.5).unwrap();
    let params = ModelGParameters { k5: 0.0, ..Default::default() };
    let result = ModelG::new(Scenario::new(grid.clone()), params, SolverConfiguration::default());
    assert!(matches!(result, Err(SimulationError::InvalidParameter { name: "k5", .. })));

    let result = Brusselator::new(
        Scenario::new(grid),
        BrusselatorParameters::default(),
        SolverConfiguration::new().with_dt(-1.0),
    );
    assert!(matches!(result, Err(SimulationError::InvalidParameter { name: "dt", .. })));
}

// =================================================================================================
// Stepping behaviour
// =================================================================================================

#[test]
fn test_stability_advisory_still_steps() {
    let grid = Grid::square(2, 16, 0.5).unwrap();
    let seed = gaussian_seed(&grid, &[0.0, 0.0], 1.0, 0.01);
    let scenario = Scenario::new(grid).with_concentration(Species::X, seed);
    let mut model = ModelG::new(
        scenario,
        ModelGParameters::default(),
        SolverConfiguration::new().with_dt(0.3),
    )
    .unwrap();

    let advisory = model.stability_advisory().expect("dt = 0.3 > 0.25 should warn");
    assert_relative_eq!(advisory.ratio(), 0.6);

    model.run(3);
    assert_eq!(model.steps(), 3);
    assert_relative_eq!(model.time(), 0.9, epsilon = 1e-12);
}

#[test]
fn test_fluid_runs_are_deterministic() {
    let build = || {
        let grid = Grid::square(2, 32, 0.5).unwrap();
        let scenario = Scenario::new(grid.clone())
            .with_concentration(Species::X, gaussian_seed(&grid, &[1.0, -1.0], 1.0, 0.05))
            .with_source(Species::G, SourceTerm::gaussian_pulse(vec![], -2.0, 0.5, 0.2, 0.5));
        FluidModelG::new(scenario, ModelGParameters::default(), SolverConfiguration::default()).unwrap()
    };

    let mut first = build();
    let mut second = build();
    first.run(25);
    second.run(25);

    for species in Species::ALL {
        assert_eq!(first.concentration(species), second.concentration(species));
        assert_eq!(first.velocity_of(species), second.velocity_of(species));
    }
    assert!(first.validate_state().is_ok());
}

#[test]
fn test_run_until_lands_on_end_time() {
    let mut model = Brusselator::new(
        Scenario::new(Grid::square(1, 32, 1.0).unwrap()),
        BrusselatorParameters::default(),
        SolverConfiguration::default(),
    )
    .unwrap();
    model.run_until(2.0);

    assert_eq!(model.steps(), 20);
    assert!(relative_error(model.time(), 2.0) < 1e-12);
}

#[test]
fn test_fluid_without_flow_matches_reaction_diffusion() {
    // With zero densities the fluid stays at rest and only diffusion acts
    let grid = Grid::square(2, 16, 0.5).unwrap();
    let seed = gaussian_seed(&grid, &[0.0, 0.0], 1.0, 0.02);
    let params = ModelGParameters {
        density_g: 0.0,
        density_x: 0.0,
        density_y: 0.0,
        ..Default::default()
    };

    let scenario = Scenario::new(grid).with_concentration(Species::G, seed);
    let mut plain = ModelG::new(scenario.clone(), params, SolverConfiguration::default()).unwrap();
    let mut fluid = FluidModelG::new(scenario, params, SolverConfiguration::default()).unwrap();
    plain.run(10);
    fluid.run(10);

    for species in Species::ALL {
        assert_fields_close(fluid.concentration(species), plain.concentration(species), 1e-12, species.label());
    }
}

// =================================================================================================
// Three-dimensional fluid
// =================================================================================================

fn fluid_3d(scenario: Scenario, offset: bool) -> FluidModelG {
    let config = SolverConfiguration::new().with_steady_state_offset(offset);
    FluidModelG::new(scenario, ModelGParameters::default(), config).unwrap()
}

#[test]
fn test_fluid_3d_at_rest_stays_at_rest() {
    let grid = Grid::square(3, 8, 0.5).unwrap();
    let mut model = FluidModelG::new(Scenario::new(grid), ModelGParameters::default(), SolverConfiguration::default())
        .unwrap();
    assert_eq!(model.flow_coupling(), FlowCoupling::Shared);

    model.run(5);
    let snapshot = model.snapshot();
    assert_eq!(snapshot.len(), 3 + 3 + 1);
    for (quantity, data) in snapshot.iter() {
        assert!(data.iter().all(|v| v.abs() < 1e-14), "{quantity} moved");
    }
}

#[test]
fn test_fluid_3d_compression_acts_on_steady_background() {
    let grid = Grid::square(3, 8, 0.5).unwrap();
    let bump = gaussian_seed(&grid, &[0.0, 0.0, 0.0], 1.0, 0.5);
    let scenario = Scenario::new(grid).with_concentration(Species::G, bump);

    // Linearised about the steady state (the 3D default) and about zero
    let mut linearised = fluid_3d(scenario.clone(), true);
    let mut plain = fluid_3d(scenario, false);
    linearised.step();
    plain.step();

    let div = linearised.divergence(None).unwrap();
    assert!(div.iter().any(|d| d.abs() > 1e-8), "density bump should compress the fluid");
    assert_eq!(Some(div), plain.divergence(None));

    // Starting at rest, only the background term differs: −C0·div·dt
    let steady = linearised.parameters().steady_state();
    let dt = linearised.dt();
    for species in Species::ALL {
        let c0 = steady.get(species);
        let shifted = linearised.concentration(species);
        let reference = plain.concentration(species);
        for ((a, b), d) in shifted.iter().zip(reference.iter()).zip(div.iter()) {
            assert_relative_eq!(a - b, -c0 * d * dt, epsilon = 1e-13);
        }
    }
}

// =================================================================================================
// Nucleation regression
// =================================================================================================

#[test]
fn test_nucleation_depresses_g_at_origin() {
    let scenario = nucleation_scenario();
    let grid = scenario.grid.clone();
    let mut model = ModelG::new(scenario, ModelGParameters::default(), SolverConfiguration::default()).unwrap();
    assert_relative_eq!(model.dt(), 0.025);

    model.run(500);
    assert!(model.validate_state().is_ok());

    let g = model.concentration(Species::G);
    let center = g[center_index(&grid).as_slice()];
    let corner = g[[0, 0]];
    assert!(center < 0.0, "G at the origin should be depressed, got {center}");
    assert!(center < corner, "origin {center} should lie below the far field {corner}");

    // The pattern is localised: the mean over the domain is much shallower than the core
    let mean = g.mean().unwrap_or(0.0);
    assert!(center < mean);
}
