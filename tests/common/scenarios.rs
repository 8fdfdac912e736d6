//! Reusable grids, seeds and scenarios

use std::f64::consts::PI;

use modelg_rs::models::SourceTerm;
use modelg_rs::physics::{Field, Species};
use modelg_rs::solver::{Grid, Scenario};

/// `amplitude·exp(−|x − center|²/(2·width²))`
pub fn gaussian_seed(grid: &Grid, center: &[f64], width: f64, amplitude: f64) -> Field {
    grid.distance_squared(center)
        .mapv(|r2| amplitude * (-0.5 * r2 / (width * width)).exp())
}

/// `amplitude·sin(2π·mode·x/L)` along `axis`, constant along the others
pub fn sinusoid(grid: &Grid, axis: usize, mode: usize, amplitude: f64) -> Field {
    let length = grid.extent()[axis];
    grid.coordinate_field(axis)
        .mapv(|x| amplitude * (2.0 * PI * mode as f64 * x / length).sin())
}

/// 128×128 grid spanning 32 units with the G pulse of the nucleation episode
///
/// `G` receives `−10·exp(−0.5·r²)·exp(−0.5·(t − 5)²)`; every field starts at
/// the steady state.
pub fn nucleation_scenario() -> Scenario {
    let grid = Grid::from_extent(2, 128, 32.0).expect("valid grid");
    Scenario::new(grid).with_source(Species::G, SourceTerm::gaussian_pulse(vec![0.0, 0.0], -10.0, 0.5, 5.0, 0.5))
}
