//! Field helpers
//!
//! Every spatial quantity is an `ndarray::ArrayD<f64>` with the grid shape,
//! and every spectrum is an `ArrayD<Complex64>` of the same shape.

use ndarray::{ArrayD, Zip};
use num_complex::Complex64;

#[cfg(feature = "parallel")]
use crate::solver::parallel_threshold;

/// Real-valued field on the grid
pub type Field = ArrayD<f64>;

/// Fourier spectrum of a field
pub type Spectrum = ArrayD<Complex64>;

/// Apply `f` to every element in place
///
/// Runs on the rayon pool when the crate is built with the `parallel`
/// feature and the field holds more elements than
/// [`parallel_threshold()`](crate::solver::parallel_threshold).
pub fn apply<F>(field: &mut Field, f: F)
where
    F: Fn(f64) -> f64 + Sync + Send,
{
    let zip = Zip::from(field);
    #[cfg(feature = "parallel")]
    if zip.size() > parallel_threshold() {
        zip.par_for_each(|x| *x = f(*x));
        return;
    }
    zip.for_each(|x| *x = f(*x));
}

/// `target += scale · source`, element-wise
pub fn add_scaled(target: &mut Field, source: &Field, scale: f64) {
    target.scaled_add(scale, source);
}

/// Index (in logical order) of the first NaN or infinite element
pub fn first_non_finite(field: &Field) -> Option<usize> {
    field.iter().position(|x| !x.is_finite())
}

/// Largest absolute value in the field (0 for empty fields)
pub fn max_abs(field: &Field) -> f64 {
    field.iter().fold(0.0_f64, |acc, x| acc.max(x.abs()))
}
