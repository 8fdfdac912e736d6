//! Helper functions for integration tests

use modelg_rs::physics::Field;
use modelg_rs::solver::Grid;

/// Assert that two fields have the same shape and agree element-wise
pub fn assert_fields_close(actual: &Field, expected: &Field, tolerance: f64, message: &str) {
    assert_eq!(actual.shape(), expected.shape(), "{}: shape mismatch", message);

    for (i, (&a, &e)) in actual.iter().zip(expected.iter()).enumerate() {
        let diff = (a - e).abs();
        assert!(
            diff <= tolerance,
            "{}: element {} differs by {} (tolerance {})",
            message, i, diff, tolerance
        );
    }
}

/// Root-mean-square difference between two fields
pub fn l2_difference(a: &Field, b: &Field) -> f64 {
    let sum: f64 = a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum();
    (sum / a.len().max(1) as f64).sqrt()
}

/// Compute relative error: |actual - expected| / |expected|
pub fn relative_error(actual: f64, expected: f64) -> f64 {
    if expected.abs() < 1e-10 {
        (actual - expected).abs()
    } else {
        (actual - expected).abs() / expected.abs()
    }
}

/// Multi-index of the grid origin
pub fn center_index(grid: &Grid) -> Vec<usize> {
    grid.shape().iter().map(|&n| n / 2).collect()
}
