//! Performance benchmarks for the model solvers
//!
//! # What We're Measuring
//!
//! 1. **Reaction step**: one Taylor evaluation per grid point; linear in the
//!    number of points and embarrassingly parallel
//! 2. **ModelG step**: reaction plus three diffusion passes (one forward and
//!    one inverse FFT each); `O(N log N)`
//! 3. **FluidModelG step**: adds one flow update per velocity field and one
//!    gradient per species, so roughly 4-6× the cost of a ModelG step in 2D
//!
//! # Running Benchmarks
//!
//! ```bash
//! # Run all solver benchmarks
//! cargo bench --bench solver_performance
//!
//! # Only the fluid solver
//! cargo bench --bench solver_performance fluid
//!
//! # Sequential baseline
//! cargo bench --bench solver_performance --no-default-features
//! ```

use criterion::{BenchmarkId, Criterion, SamplingMode, criterion_group, criterion_main};
use std::hint::black_box;
use std::time::Duration;

use modelg_rs::models::{ModelGParameters, SourceTerm};
use modelg_rs::physics::Species;
use modelg_rs::solver::integrators::react_three;
use modelg_rs::solver::{FlowCoupling, FluidModelG, Grid, ModelG, Scenario, Simulation, SolverConfiguration};

// =================================================================================================
// Scenarios
// =================================================================================================

fn seeded_scenario(n: usize) -> Scenario {
    let grid = Grid::from_extent(2, n, 32.0).expect("valid grid");
    let seed = grid.distance_squared(&[0.0, 0.0]).mapv(|r2| 0.01 * (-0.5 * r2).exp());
    Scenario::new(grid)
        .with_concentration(Species::X, seed)
        .with_source(Species::G, SourceTerm::gaussian_pulse(vec![], -10.0, 0.5, 5.0, 0.5))
}

// =================================================================================================
// Benchmarks
// =================================================================================================

fn bench_reaction(c: &mut Criterion) {
    let mut group = c.benchmark_group("reaction");
    let params = ModelGParameters::default();

    for &n in &[64usize, 128, 256] {
        let grid = Grid::square(2, n, 0.25).expect("valid grid");
        let mut g = grid.constant(-0.01);
        let mut x = grid.constant(0.02);
        let mut y = grid.constant(0.005);

        group.bench_with_input(BenchmarkId::new("taylor", n * n), &n, |b, _| {
            b.iter(|| react_three(black_box(&params), &mut g, &mut x, &mut y, black_box(0.025)))
        });
    }
    group.finish();
}

fn bench_model_g(c: &mut Criterion) {
    let mut group = c.benchmark_group("model_g");
    group.sampling_mode(SamplingMode::Flat);
    group.measurement_time(Duration::from_secs(10));

    for &n in &[64usize, 128, 256] {
        let mut model = ModelG::new(seeded_scenario(n), ModelGParameters::default(), SolverConfiguration::default())
            .expect("valid solver");

        group.bench_with_input(BenchmarkId::new("step", n), &n, |b, _| b.iter(|| model.step()));
    }
    group.finish();
}

fn bench_fluid(c: &mut Criterion) {
    let mut group = c.benchmark_group("fluid");
    group.sampling_mode(SamplingMode::Flat);
    group.measurement_time(Duration::from_secs(10));

    for coupling in [FlowCoupling::Shared, FlowCoupling::PerSpecies] {
        let config = SolverConfiguration::new().with_flow_coupling(coupling);
        let mut model =
            FluidModelG::new(seeded_scenario(128), ModelGParameters::default(), config).expect("valid solver");

        group.bench_function(BenchmarkId::new("step_128", format!("{coupling:?}")), |b| b.iter(|| model.step()));
    }
    group.finish();
}

criterion_group!(benches, bench_reaction, bench_model_g, bench_fluid);
criterion_main!(benches);
