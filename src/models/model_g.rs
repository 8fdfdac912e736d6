//! Model G reaction network
//!
//! Model G is an open autocatalytic network of three species:
//!
//! ```text
//!   A        → G          (constant inflow)
//!   G       ⇌ X           (k2 forward, k-2 backward)
//!   B + X    → Y + Z
//!   2X + Y   → 3X         (autocatalysis)
//!   X        → Ω          (k5)
//! ```
//!
//! which gives the absolute kinetics
//!
//! ```text
//! G' = A − k2·G + k-2·X
//! X' = k2·G − k-2·X − B·X + X²·Y − k5·X
//! Y' = B·X − X²·Y
//! ```
//!
//! # Perturbation form
//!
//! Solvers store `g = G − G0`, `x = X − X0`, `y = Y − Y0`, the deviations from
//! the homogeneous steady state. Substituting removes every constant term:
//!
//! ```text
//! g' = −k2·g + k-2·x
//! x' = k2·g − (k-2 + k5)·x + B·x + X0²·y + Y0·x² + 2·X0·x·y + x²·y
//! y' = −B·x − X0²·y − Y0·x² − 2·X0·x·y − x²·y
//! ```
//!
//! # Time integration
//!
//! [`ModelGParameters::advance`] evaluates the 4th-order Taylor polynomial of
//! the exact local trajectory. The coefficients follow from the recursion
//! `c[n+1] = f(c)[n] / (n+1)`, where the polynomial products are Cauchy
//! convolutions of the truncated series. The identity
//! `x' + y' = k2·g − (k-2 + k5)·x` gives the `x` coefficients from the `y` ones.
//!
//! # Parameters
//!
//! [`ModelGParameters`] deserialises from the key names used by the parameter
//! files of the reference episodes (`A`, `k-2`, `D_G`, `base-density1`, …).
//!
//! ```rust
//! use modelg_rs::models::ModelGParameters;
//!
//! let params = ModelGParameters::default();
//! let steady = params.steady_state();
//! assert!((steady.x - params.a / params.k5).abs() < 1e-12);
//! ```

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::{SimulationResult, require_non_negative, require_positive};
use crate::physics::{ReactionKinetics, Species};

/// Order of the Taylor polynomial used by [`ModelGParameters::advance`]
pub const TAYLOR_ORDER: usize = 4;

// =================================================================================================
// Parameters
// =================================================================================================

/// Rate constants, transport coefficients and fluid properties of Model G
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelGParameters {
    /// Inflow rate of G
    #[serde(rename = "A")]
    pub a: f64,
    /// Rate of the X → Y branch
    #[serde(rename = "B")]
    pub b: f64,
    /// G → X rate
    pub k2: f64,
    /// X → G rate
    #[serde(rename = "k-2")]
    pub k_minus_2: f64,
    /// X removal rate
    pub k5: f64,

    #[serde(rename = "D_G")]
    pub diffusion_g: f64,
    #[serde(rename = "D_X")]
    pub diffusion_x: f64,
    #[serde(rename = "D_Y")]
    pub diffusion_y: f64,

    /// Mass weight of G in the fluid density
    #[serde(rename = "density_G")]
    pub density_g: f64,
    #[serde(rename = "density_X")]
    pub density_x: f64,
    #[serde(rename = "density_Y")]
    pub density_y: f64,

    /// Background density of the shared flow field
    #[serde(rename = "base-density")]
    pub base_density: f64,
    /// Background density of the flow advecting G
    #[serde(rename = "base-density3")]
    pub base_density_g: f64,
    /// Background density of the flow advecting X
    #[serde(rename = "base-density1")]
    pub base_density_x: f64,
    /// Background density of the flow advecting Y
    #[serde(rename = "base-density2")]
    pub base_density_y: f64,

    /// Kinematic viscosity
    pub viscosity: f64,
    #[serde(rename = "speed-of-sound")]
    pub speed_of_sound: f64,
}

impl Default for ModelGParameters {
    fn default() -> Self {
        Self {
            a: 3.42,
            b: 14.5,
            k2: 1.0,
            k_minus_2: 0.1,
            k5: 0.9,
            diffusion_g: 1.0,
            diffusion_x: 1.0,
            diffusion_y: 2.0,
            density_g: 2.0,
            density_x: 1.0,
            density_y: 1.5,
            base_density: 6.0,
            base_density_g: 6.0,
            base_density_x: 6.0,
            base_density_y: 6.0,
            viscosity: 0.1,
            speed_of_sound: 0.2,
        }
    }
}

/// Homogeneous equilibrium concentrations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SteadyState {
    pub g: f64,
    pub x: f64,
    pub y: f64,
}

impl SteadyState {
    /// Equilibrium value of one species
    pub fn get(&self, species: Species) -> f64 {
        match species {
            Species::G => self.g,
            Species::X => self.x,
            Species::Y => self.y,
        }
    }

    /// As a `(G, X, Y)` vector
    pub fn to_vector(&self) -> Vector3<f64> {
        Vector3::new(self.g, self.x, self.y)
    }
}

impl ModelGParameters {
    /// Check that every parameter is usable
    ///
    /// Rate constants must be positive (`A` and `k5` appear in denominators of
    /// the steady state), transport coefficients must be non-negative.
    pub fn validate(&self) -> SimulationResult<()> {
        require_positive("A", self.a)?;
        require_positive("B", self.b)?;
        require_positive("k2", self.k2)?;
        require_positive("k-2", self.k_minus_2)?;
        require_positive("k5", self.k5)?;

        require_non_negative("D_G", self.diffusion_g)?;
        require_non_negative("D_X", self.diffusion_x)?;
        require_non_negative("D_Y", self.diffusion_y)?;

        require_non_negative("density_G", self.density_g)?;
        require_non_negative("density_X", self.density_x)?;
        require_non_negative("density_Y", self.density_y)?;

        require_positive("base-density", self.base_density)?;
        require_positive("base-density1", self.base_density_x)?;
        require_positive("base-density2", self.base_density_y)?;
        require_positive("base-density3", self.base_density_g)?;

        require_non_negative("viscosity", self.viscosity)?;
        require_non_negative("speed-of-sound", self.speed_of_sound)?;
        Ok(())
    }

    /// Homogeneous steady state `(G0, X0, Y0)`
    ///
    /// `G0 = A(k5 + k-2)/(k2·k5)`, `X0 = A/k5`, `Y0 = B·k5/A`.
    pub fn steady_state(&self) -> SteadyState {
        SteadyState {
            g: self.a * (self.k5 + self.k_minus_2) / (self.k2 * self.k5),
            x: self.a / self.k5,
            y: self.b * self.k5 / self.a,
        }
    }

    /// Absolute rates `(G', X', Y')` at absolute concentrations
    pub fn absolute_rates(&self, concentrations: Vector3<f64>) -> Vector3<f64> {
        let (g, x, y) = (concentrations[0], concentrations[1], concentrations[2]);
        let autocatalysis = x * x * y;
        Vector3::new(
            self.a - self.k2 * g + self.k_minus_2 * x,
            self.k2 * g - self.k_minus_2 * x - self.b * x + autocatalysis - self.k5 * x,
            self.b * x - autocatalysis,
        )
    }

    /// Diffusion coefficient of a species
    pub fn diffusion(&self, species: Species) -> f64 {
        match species {
            Species::G => self.diffusion_g,
            Species::X => self.diffusion_x,
            Species::Y => self.diffusion_y,
        }
    }

    /// Mass weight of a species in the fluid density
    pub fn density(&self, species: Species) -> f64 {
        match species {
            Species::G => self.density_g,
            Species::X => self.density_x,
            Species::Y => self.density_y,
        }
    }

    /// Background density of the flow advecting `species`
    ///
    /// `None` selects the shared flow field.
    pub fn base_density_for(&self, species: Option<Species>) -> f64 {
        match species {
            None => self.base_density,
            Some(Species::G) => self.base_density_g,
            Some(Species::X) => self.base_density_x,
            Some(Species::Y) => self.base_density_y,
        }
    }

    // ===================================== Builder methods =======================================

    /// Set the inflow rate `A`
    pub fn with_a(mut self, a: f64) -> Self {
        self.a = a;
        self
    }

    /// Set the branching rate `B`
    pub fn with_b(mut self, b: f64) -> Self {
        self.b = b;
        self
    }

    /// Set the three diffusion coefficients
    pub fn with_diffusion(mut self, g: f64, x: f64, y: f64) -> Self {
        self.diffusion_g = g;
        self.diffusion_x = x;
        self.diffusion_y = y;
        self
    }

    /// Set viscosity and speed of sound
    pub fn with_fluid(mut self, viscosity: f64, speed_of_sound: f64) -> Self {
        self.viscosity = viscosity;
        self.speed_of_sound = speed_of_sound;
        self
    }

    /// Use the same background density for every flow field
    pub fn with_base_density(mut self, base_density: f64) -> Self {
        self.base_density = base_density;
        self.base_density_g = base_density;
        self.base_density_x = base_density;
        self.base_density_y = base_density;
        self
    }
}

// =================================================================================================
// Kinetics
// =================================================================================================

/// n-th Taylor coefficient of `a·b`
#[inline]
pub(crate) fn cauchy(a: &[f64], b: &[f64], n: usize) -> f64 {
    (0..=n).map(|i| a[i] * b[n - i]).sum()
}

impl ReactionKinetics for ModelGParameters {
    type Concentrations = Vector3<f64>;

    fn rates(&self, c: Vector3<f64>) -> Vector3<f64> {
        let steady = self.steady_state();
        let (g, x, y) = (c[0], c[1], c[2]);
        let nonlinear = steady.y * x * x + 2.0 * steady.x * x * y + x * x * y;
        let dy = -self.b * x - steady.x * steady.x * y - nonlinear;
        let dx = self.k2 * g - (self.k_minus_2 + self.k5) * x - dy;
        Vector3::new(-self.k2 * g + self.k_minus_2 * x, dx, dy)
    }

    fn advance(&self, c: Vector3<f64>, dt: f64) -> Vector3<f64> {
        let steady = self.steady_state();
        let x0_squared = steady.x * steady.x;
        let linear_x = self.k_minus_2 + self.k5;

        let mut g = [0.0; TAYLOR_ORDER + 1];
        let mut x = [0.0; TAYLOR_ORDER + 1];
        let mut y = [0.0; TAYLOR_ORDER + 1];
        let mut xx = [0.0; TAYLOR_ORDER + 1];
        (g[0], x[0], y[0]) = (c[0], c[1], c[2]);

        for n in 0..TAYLOR_ORDER {
            let step = (n + 1) as f64;
            xx[n] = cauchy(&x, &x, n);
            let xy = cauchy(&x, &y, n);
            let xxy = cauchy(&xx, &y, n);
            let nonlinear = steady.y * xx[n] + 2.0 * steady.x * xy + xxy;

            g[n + 1] = (-self.k2 * g[n] + self.k_minus_2 * x[n]) / step;
            y[n + 1] = (-self.b * x[n] - x0_squared * y[n] - nonlinear) / step;
            x[n + 1] = (self.k2 * g[n] - linear_x * x[n]) / step - y[n + 1];
        }

        let horner = |coefficients: &[f64]| coefficients.iter().rev().fold(0.0, |acc, &k| acc * dt + k);
        Vector3::new(horner(&g), horner(&x), horner(&y))
    }

    fn species(&self) -> &'static [Species] {
        &Species::ALL
    }

    fn name(&self) -> &str {
        "Model G"
    }
}

// =================================================================================================
// Tests
// =================================================================================================
