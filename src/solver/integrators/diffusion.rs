//! Spectral diffusion
//!
//! Each Fourier mode of `∂C/∂t = D·∇²C` decays exactly as
//! `exp(−D·|ω|²·dt)`, so one step is forward FFT, multiply, inverse FFT.
//! The factor is computed once per species and time step.

use crate::physics::{Field, Spectrum};
use crate::solver::spectral::SpectralOperators;

/// Exact per-mode diffusion decay for a fixed coefficient and time step
#[derive(Debug, Clone)]
pub struct DiffusionIntegrator {
    coefficient: f64,
    decay: Field,
}

impl DiffusionIntegrator {
    /// Precompute `exp(−D·|ω|²·dt)` on the operators' grid
    pub fn new(ops: &SpectralOperators, coefficient: f64, dt: f64) -> Self {
        let decay = ops.omega_squared().mapv(|w2| (-coefficient * w2 * dt).exp());
        Self { coefficient, decay }
    }

    /// Diffusion coefficient
    pub fn coefficient(&self) -> f64 {
        self.coefficient
    }

    /// Per-mode decay factor
    pub fn decay(&self) -> &Field {
        &self.decay
    }

    /// Spectrum of `field` after one diffusion step
    pub fn decayed_spectrum(&self, ops: &SpectralOperators, field: &Field) -> Spectrum {
        let mut spectrum = ops.forward(field);
        SpectralOperators::scale_modes(&mut spectrum, &self.decay);
        spectrum
    }

    /// Diffuse `field` in place over one time step
    pub fn apply(&self, ops: &SpectralOperators, field: &mut Field) {
        *field = ops.inverse_owned(self.decayed_spectrum(ops, field));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::domain::Grid;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_single_mode_decays_exactly() {
        let grid = Grid::square(2, 32, 0.25).unwrap();
        let ops = SpectralOperators::new(&grid);
        let k = 2.0 * PI * 3.0 / (32.0 * 0.25);
        let field = grid.coordinate_field(1).mapv(|y| (k * y).sin());

        let (coefficient, dt) = (2.0, 0.025);
        let diffusion = DiffusionIntegrator::new(&ops, coefficient, dt);
        let mut diffused = field.clone();
        diffusion.apply(&ops, &mut diffused);

        let factor = (-coefficient * k * k * dt).exp();
        for (after, before) in diffused.iter().zip(field.iter()) {
            assert_relative_eq!(*after, before * factor, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_conserves_total_amount() {
        let grid = Grid::square(2, 16, 0.5).unwrap();
        let ops = SpectralOperators::new(&grid);
        let mut field = grid.distance_squared(&[1.0, -0.5]).mapv(|r2| (-0.5 * r2).exp());
        let before = field.sum();

        let diffusion = DiffusionIntegrator::new(&ops, 1.0, 0.05);
        for _ in 0..10 {
            diffusion.apply(&ops, &mut field);
        }
        assert_relative_eq!(field.sum(), before, epsilon = 1e-10);
    }

    #[test]
    fn test_zero_coefficient_is_identity() {
        let grid = Grid::square(1, 12, 0.3).unwrap();
        let ops = SpectralOperators::new(&grid);
        let diffusion = DiffusionIntegrator::new(&ops, 0.0, 0.1);
        assert!(diffusion.decay().iter().all(|&d| d == 1.0));

        let original = grid.coordinate_field(0).mapv(f64::cos);
        let mut field = original.clone();
        diffusion.apply(&ops, &mut field);
        for (a, b) in field.iter().zip(original.iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-12);
        }
    }
}
