//! Spectral operator provider
//!
//! Multidimensional FFTs on `ndarray` fields, built from 1D `rustfft` plans
//! applied lane by lane along each axis. On top of the transforms the
//! provider precomputes the per-axis angular wavenumbers, the derivative
//! kernels `i·ω` and `|ω|²`, which is everything the integrators need.
//!
//! # Conventions
//!
//! - Wavenumbers follow the `fftfreq` layout: `[0, 1, …, n/2-1, -n/2, …, -1]`
//!   scaled by `2π / (n·dx)`.
//! - The forward transform is unnormalised, the inverse divides by the total
//!   number of points and keeps the real part.
//! - The derivative kernel zeroes the Nyquist mode so that spectral
//!   derivatives of real fields stay real. `|ω|²` keeps it.
//!
//! # Example
//!
//! ```rust
//! use modelg_rs::solver::{Grid, SpectralOperators};
//! use std::f64::consts::PI;
//!
//! let grid = Grid::square(1, 64, 1.0 / 64.0).unwrap();
//! let ops = SpectralOperators::new(&grid);
//! let x = grid.coordinate_field(0);
//! let field = x.mapv(|x| (2.0 * PI * x).sin());
//!
//! let dfdx = ops.derivative(&ops.forward(&field), 0);
//! let expected = x.mapv(|x| 2.0 * PI * (2.0 * PI * x).cos());
//! assert!(dfdx.iter().zip(expected.iter()).all(|(a, b)| (a - b).abs() < 1e-9));
//! ```

use std::f64::consts::PI;
use std::fmt;
use std::sync::Arc;

use ndarray::{Array1, ArrayD, ArrayViewMut1, Axis, IxDyn, Zip};
use num_complex::Complex64;
use rustfft::{Fft, FftPlanner};

use crate::physics::{Field, Spectrum};
use crate::solver::domain::Grid;
#[cfg(feature = "parallel")]
use crate::solver::parallel_threshold;

/// Angular wavenumbers of an `n`-point periodic axis with spacing `dx`
///
/// Same ordering as numpy's `fftfreq`: for even `n` the Nyquist entry sits at
/// index `n/2` with a negative sign.
pub fn angular_wavenumbers(n: usize, dx: f64) -> Array1<f64> {
    let scale = 2.0 * PI / (n as f64 * dx);
    Array1::from_shape_fn(n, |j| {
        let frequency = if j <= (n - 1) / 2 { j as f64 } else { j as f64 - n as f64 };
        frequency * scale
    })
}

/// Index of the Nyquist mode, if the axis has one
fn nyquist_index(n: usize) -> Option<usize> {
    (n % 2 == 0 && n > 1).then_some(n / 2)
}

// =================================================================================================
// Spectral Operators
// =================================================================================================

/// FFT plans and spectral coefficients for one grid
pub struct SpectralOperators {
    grid: Grid,
    forward_plans: Vec<Arc<dyn Fft<f64>>>,
    inverse_plans: Vec<Arc<dyn Fft<f64>>>,
    wavenumbers: Vec<Array1<f64>>,
    /// Per-axis `ω`, shaped to broadcast against a field
    omega: Vec<Field>,
    /// Per-axis `i·ω` with the Nyquist mode zeroed, broadcastable
    kernel: Vec<Spectrum>,
    /// `Σ_a ω_a²` on the full grid
    omega_squared: Field,
}

impl SpectralOperators {
    /// Plan the transforms and precompute the coefficients for `grid`
    pub fn new(grid: &Grid) -> Self {
        let mut planner = FftPlanner::<f64>::new();
        let ndim = grid.ndim();

        let mut forward_plans = Vec::with_capacity(ndim);
        let mut inverse_plans = Vec::with_capacity(ndim);
        let mut wavenumbers = Vec::with_capacity(ndim);
        let mut omega = Vec::with_capacity(ndim);
        let mut kernel = Vec::with_capacity(ndim);

        for (axis, &n) in grid.shape().iter().enumerate() {
            forward_plans.push(planner.plan_fft_forward(n));
            inverse_plans.push(planner.plan_fft_inverse(n));

            let k = angular_wavenumbers(n, grid.dx());
            let mut broadcast_shape = vec![1; ndim];
            broadcast_shape[axis] = n;

            omega.push(ArrayD::from_shape_fn(IxDyn(&broadcast_shape), |idx| k[idx[axis]]));

            let nyquist = nyquist_index(n);
            kernel.push(ArrayD::from_shape_fn(IxDyn(&broadcast_shape), |idx| {
                let j = idx[axis];
                if Some(j) == nyquist {
                    Complex64::new(0.0, 0.0)
                } else {
                    Complex64::new(0.0, k[j])
                }
            }));

            wavenumbers.push(k);
        }

        let omega_squared = ArrayD::from_shape_fn(IxDyn(grid.shape()), |idx| {
            wavenumbers
                .iter()
                .enumerate()
                .map(|(a, k)| k[idx[a]] * k[idx[a]])
                .sum()
        });

        Self {
            grid: grid.clone(),
            forward_plans,
            inverse_plans,
            wavenumbers,
            omega,
            kernel,
            omega_squared,
        }
    }

    /// Grid the operators were built for
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// 1D angular wavenumbers along `axis`
    pub fn wavenumbers(&self, axis: usize) -> &Array1<f64> {
        &self.wavenumbers[axis]
    }

    /// Angular wavenumbers along `axis`, shaped to broadcast against a field
    pub fn omega(&self, axis: usize) -> &Field {
        &self.omega[axis]
    }

    /// Derivative kernel `i·ω` along `axis`, broadcastable, Nyquist zeroed
    pub fn kernel(&self, axis: usize) -> &Spectrum {
        &self.kernel[axis]
    }

    /// Squared wavenumber magnitude on the full grid
    pub fn omega_squared(&self) -> &Field {
        &self.omega_squared
    }

    // ======================================== Transforms =========================================

    /// Unnormalised forward transform of a real field
    pub fn forward(&self, field: &Field) -> Spectrum {
        let mut spectrum = field.mapv(|x| Complex64::new(x, 0.0));
        self.transform(&mut spectrum, &self.forward_plans);
        spectrum
    }

    /// Normalised inverse transform; the imaginary residue is discarded
    pub fn inverse(&self, spectrum: &Spectrum) -> Field {
        self.inverse_owned(spectrum.clone())
    }

    /// Same as [`inverse`](Self::inverse), reusing the spectrum's storage
    pub fn inverse_owned(&self, mut spectrum: Spectrum) -> Field {
        self.transform(&mut spectrum, &self.inverse_plans);
        let scale = 1.0 / self.grid.len() as f64;
        spectrum.mapv(|c| c.re * scale)
    }

    /// Spatial derivative along `axis` of the field whose spectrum is given
    pub fn derivative(&self, spectrum: &Spectrum, axis: usize) -> Field {
        self.inverse_owned(spectrum * &self.kernel[axis])
    }

    /// All first derivatives of the field whose spectrum is given
    pub fn gradient(&self, spectrum: &Spectrum) -> Vec<Field> {
        (0..self.grid.ndim())
            .map(|axis| self.derivative(spectrum, axis))
            .collect()
    }

    /// Multiply a spectrum by a real per-mode factor in place
    pub fn scale_modes(spectrum: &mut Spectrum, factor: &Field) {
        Zip::from(spectrum).and(factor).for_each(|c, &f| *c *= f);
    }

    fn transform(&self, data: &mut Spectrum, plans: &[Arc<dyn Fft<f64>>]) {
        #[cfg(feature = "parallel")]
        let parallel = data.len() > parallel_threshold();

        for (axis, plan) in plans.iter().enumerate() {
            let run = |mut lane: ArrayViewMut1<Complex64>| match lane.as_slice_mut() {
                Some(slice) => plan.process(slice),
                None => {
                    let mut buffer = lane.to_vec();
                    plan.process(&mut buffer);
                    lane.iter_mut().zip(buffer).for_each(|(dst, src)| *dst = src);
                }
            };

            let lanes = Zip::from(data.lanes_mut(Axis(axis)));
            #[cfg(feature = "parallel")]
            if parallel {
                lanes.par_for_each(run);
                continue;
            }
            lanes.for_each(run);
        }
    }
}

impl fmt::Debug for SpectralOperators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpectralOperators")
            .field("grid", &self.grid)
            .field("plans", &self.forward_plans.len())
            .finish()
    }
}

// =================================================================================================
// Tests
// =================================================================================================
