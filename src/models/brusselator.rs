//! Brusselator reaction model
//!
//! Two-species reduction of Model G, used as a sanity-check model:
//!
//! ```text
//! X' = A − (B + k4)·X + X²·Y
//! Y' = B·X − X²·Y
//! ```
//!
//! As for Model G, solvers store deviations `x = X − X0`, `y = Y − Y0` from the
//! steady state `X0 = A/k4`, `Y0 = B·k4/A`:
//!
//! ```text
//! y' = −x²·y − Y0·x² − B·x − 2·X0·x·y − X0²·y
//! x' = −y' − k4·x
//! ```
//!
//! X diffuses with unit coefficient, Y with `Dy`.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::error::{SimulationResult, require_non_negative, require_positive};
use crate::physics::{ReactionKinetics, Species};

use super::model_g::{TAYLOR_ORDER, cauchy};

/// Species tracked by the Brusselator, in storage order
pub const BRUSSELATOR_SPECIES: [Species; 2] = [Species::X, Species::Y];

/// Diffusion coefficient of X
pub const DIFFUSION_X: f64 = 1.0;

/// Rate constants of the Brusselator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrusselatorParameters {
    #[serde(rename = "A")]
    pub a: f64,
    #[serde(rename = "B")]
    pub b: f64,
    pub k4: f64,
    /// Diffusion coefficient of Y
    #[serde(rename = "Dy")]
    pub diffusion_y: f64,
}

impl Default for BrusselatorParameters {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 2.0,
            k4: 1.0,
            diffusion_y: 8.0,
        }
    }
}

impl BrusselatorParameters {
    /// Validate rate constants and diffusion coefficient
    pub fn validate(&self) -> SimulationResult<()> {
        require_positive("A", self.a)?;
        require_positive("B", self.b)?;
        require_positive("k4", self.k4)?;
        require_non_negative("Dy", self.diffusion_y)?;
        Ok(())
    }

    /// Steady state `(X0, Y0)`
    pub fn steady_state(&self) -> Vector2<f64> {
        Vector2::new(self.a / self.k4, self.b * self.k4 / self.a)
    }

    /// Diffusion coefficient of a species (G is not part of the model)
    pub fn diffusion(&self, species: Species) -> f64 {
        match species {
            Species::Y => self.diffusion_y,
            _ => DIFFUSION_X,
        }
    }
}

impl ReactionKinetics for BrusselatorParameters {
    type Concentrations = Vector2<f64>;

    fn rates(&self, c: Vector2<f64>) -> Vector2<f64> {
        let steady = self.steady_state();
        let (x0, y0) = (steady[0], steady[1]);
        let (a, b) = (c[0], c[1]);
        let db = -a * a * b - y0 * a * a - self.b * a - 2.0 * x0 * a * b - x0 * x0 * b;
        Vector2::new(-db - self.k4 * a, db)
    }

    fn advance(&self, c: Vector2<f64>, dt: f64) -> Vector2<f64> {
        let steady = self.steady_state();
        let (x0, y0) = (steady[0], steady[1]);

        let mut a = [0.0; TAYLOR_ORDER + 1];
        let mut b = [0.0; TAYLOR_ORDER + 1];
        let mut aa = [0.0; TAYLOR_ORDER + 1];
        (a[0], b[0]) = (c[0], c[1]);

        for n in 0..TAYLOR_ORDER {
            let step = (n + 1) as f64;
            aa[n] = cauchy(&a, &a, n);
            let ab = cauchy(&a, &b, n);
            let aab = cauchy(&aa, &b, n);

            b[n + 1] = (-aab - y0 * aa[n] - self.b * a[n] - 2.0 * x0 * ab - x0 * x0 * b[n]) / step;
            a[n + 1] = -b[n + 1] - self.k4 * a[n] / step;
        }

        let horner = |coefficients: &[f64]| coefficients.iter().rev().fold(0.0, |acc, &k| acc * dt + k);
        Vector2::new(horner(&a), horner(&b))
    }

    fn species(&self) -> &'static [Species] {
        &BRUSSELATOR_SPECIES
    }

    fn name(&self) -> &str {
        "Brusselator"
    }
}
