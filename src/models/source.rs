//! Source terms
//!
//! Defines external forcing `S(x, t)` added to a species after every step as
//! `C += dt · S(x, t)`, with `t` the time at the *start* of the step.
//!
//! # Use Case
//!
//! Nucleation episodes seed a localized dip in G (or a pair of opposite dips
//! in G and X for "charged" nucleation) with a short Gaussian pulse in time,
//! and optionally switch on a weak linear G gradient later on so the
//! resulting structure starts to drift.
//!
//! # Example
//!
//! ```rust
//! use modelg_rs::models::SourceTerm;
//! use modelg_rs::solver::Grid;
//!
//! let grid = Grid::square(2, 64, 0.5).unwrap();
//!
//! // Dip of depth 10 at the origin, peaking at t = 5
//! let seed = SourceTerm::gaussian_pulse(vec![0.0, 0.0], -10.0, 0.5, 5.0, 0.5);
//!
//! let at_peak = seed.evaluate(5.0, &grid);
//! assert!((at_peak[[32, 32]] + 10.0).abs() < 1e-12);
//! assert!(seed.evaluate(60.0, &grid)[[32, 32]].abs() < 1e-12);
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::physics::{Field, Species};
use crate::solver::domain::Grid;

/// Space-time source profile
///
/// # Types
///
/// - **GaussianPulse**: spatial Gaussian modulated by a temporal Gaussian
/// - **Gradient**: linear profile along one axis switched on by a `tanh` ramp
/// - **Sum**: superposition of other terms
/// - **Custom**: user-defined closure
/// - **None**: no forcing
pub enum SourceTerm {
    /// Localized pulse
    ///
    /// # Formula
    ///
    /// ```text
    /// S(x, t) = amplitude · exp(−spatial_rate·|x − center|²) · exp(−temporal_rate·(t − peak_time)²)
    /// ```
    GaussianPulse {
        center: Vec<f64>,
        amplitude: f64,
        spatial_rate: f64,
        peak_time: f64,
        temporal_rate: f64,
    },

    /// Linear gradient along `axis`
    ///
    /// # Formula
    ///
    /// ```text
    /// S(x, t) = (slope·x_axis + intercept) · (1 + tanh(t − switch_on))
    /// ```
    Gradient {
        axis: usize,
        slope: f64,
        intercept: f64,
        switch_on: f64,
    },

    /// Sum of several terms
    Sum(Vec<SourceTerm>),

    /// Custom profile from user function of `(t, grid)`
    Custom(Arc<dyn Fn(f64, &Grid) -> Field + Send + Sync>),

    /// No source (always 0)
    None,
}

// ==================== Manual Clone Implementation ====================

impl Clone for SourceTerm {
    fn clone(&self) -> Self {
        match self {
            Self::GaussianPulse { center, amplitude, spatial_rate, peak_time, temporal_rate } => {
                Self::GaussianPulse {
                    center: center.clone(),
                    amplitude: *amplitude,
                    spatial_rate: *spatial_rate,
                    peak_time: *peak_time,
                    temporal_rate: *temporal_rate,
                }
            }
            Self::Gradient { axis, slope, intercept, switch_on } => Self::Gradient {
                axis: *axis,
                slope: *slope,
                intercept: *intercept,
                switch_on: *switch_on,
            },
            Self::Sum(terms) => Self::Sum(terms.clone()),
            Self::Custom(f) => Self::Custom(Arc::clone(f)),
            Self::None => Self::None,
        }
    }
}

// ==================== Manual Debug Implementation ====================

impl std::fmt::Debug for SourceTerm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GaussianPulse { center, amplitude, spatial_rate, peak_time, temporal_rate } => f
                .debug_struct("GaussianPulse")
                .field("center", center)
                .field("amplitude", amplitude)
                .field("spatial_rate", spatial_rate)
                .field("peak_time", peak_time)
                .field("temporal_rate", temporal_rate)
                .finish(),
            Self::Gradient { axis, slope, intercept, switch_on } => f
                .debug_struct("Gradient")
                .field("axis", axis)
                .field("slope", slope)
                .field("intercept", intercept)
                .field("switch_on", switch_on)
                .finish(),
            Self::Sum(terms) => f.debug_tuple("Sum").field(terms).finish(),
            Self::Custom(_) => f
                .debug_struct("Custom")
                .field("function", &"<user-defined>")
                .finish(),
            Self::None => f.debug_struct("None").finish(),
        }
    }
}

// ==================== Implementation ====================

impl SourceTerm {
    /// Create a Gaussian pulse
    ///
    /// # Arguments
    ///
    /// * `center` - Pulse centre, one coordinate per axis (missing ones are 0)
    /// * `amplitude` - Value at the centre at `peak_time`
    /// * `spatial_rate` - Coefficient of `|x − center|²` in the exponent
    /// * `peak_time` - Time of maximum intensity
    /// * `temporal_rate` - Coefficient of `(t − peak_time)²` in the exponent
    pub fn gaussian_pulse(
        center: Vec<f64>,
        amplitude: f64,
        spatial_rate: f64,
        peak_time: f64,
        temporal_rate: f64,
    ) -> Self {
        Self::GaussianPulse { center, amplitude, spatial_rate, peak_time, temporal_rate }
    }

    /// Create a `tanh`-ramped linear gradient along `axis`
    pub fn gradient(axis: usize, slope: f64, intercept: f64, switch_on: f64) -> Self {
        Self::Gradient { axis, slope, intercept, switch_on }
    }

    /// Create a custom source
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(f64, &Grid) -> Field + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    /// Create a "no source" term
    pub fn none() -> Self {
        Self::None
    }

    /// Superpose another term onto this one
    pub fn plus(self, other: SourceTerm) -> Self {
        match (self, other) {
            (Self::None, term) | (term, Self::None) => term,
            (Self::Sum(mut terms), other) => {
                terms.push(other);
                Self::Sum(terms)
            }
            (term, other) => Self::Sum(vec![term, other]),
        }
    }

    /// True when the term never contributes
    pub fn is_none(&self) -> bool {
        match self {
            Self::None => true,
            Self::Sum(terms) => terms.iter().all(SourceTerm::is_none),
            _ => false,
        }
    }

    /// Evaluate the source on the whole grid at time `t`
    pub fn evaluate(&self, t: f64, grid: &Grid) -> Field {
        let mut field = grid.zeros();
        self.add_to(t, grid, &mut field, 1.0);
        field
    }

    /// `target += scale · S(·, t)`, without allocating for built-in terms
    pub fn add_to(&self, t: f64, grid: &Grid, target: &mut Field, scale: f64) {
        match self {
            Self::GaussianPulse { center, amplitude, spatial_rate, peak_time, temporal_rate } => {
                let dt = t - peak_time;
                let amount = scale * amplitude * (-temporal_rate * dt * dt).exp();
                if amount == 0.0 {
                    return;
                }
                let offsets: Vec<Vec<f64>> = (0..grid.ndim())
                    .map(|a| {
                        let c = center.get(a).copied().unwrap_or(0.0);
                        grid.coordinates(a).iter().map(|x| (x - c) * (x - c)).collect()
                    })
                    .collect();
                target.indexed_iter_mut().for_each(|(idx, value)| {
                    let r2: f64 = offsets.iter().enumerate().map(|(a, o)| o[idx[a]]).sum();
                    *value += amount * (-spatial_rate * r2).exp();
                });
            }

            Self::Gradient { axis, slope, intercept, switch_on } => {
                let ramp = scale * (1.0 + (t - switch_on).tanh());
                if ramp == 0.0 || *axis >= grid.ndim() {
                    return;
                }
                let coords = grid.coordinates(*axis);
                target.indexed_iter_mut().for_each(|(idx, value)| {
                    *value += ramp * (slope * coords[idx[*axis]] + intercept);
                });
            }

            Self::Sum(terms) => {
                for term in terms {
                    term.add_to(t, grid, target, scale);
                }
            }

            Self::Custom(f) => target.scaled_add(scale, &f(t, grid)),

            Self::None => {}
        }
    }
}

impl Default for SourceTerm {
    fn default() -> Self {
        Self::None
    }
}

// =================================================================================================
// Source functions
// =================================================================================================

/// Per-species source terms; absent species receive no forcing
#[derive(Debug, Clone, Default)]
pub struct SourceFunctions {
    terms: BTreeMap<Species, SourceTerm>,
}

impl SourceFunctions {
    /// No sources
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion
    pub fn with(mut self, species: Species, term: SourceTerm) -> Self {
        self.insert(species, term);
        self
    }

    /// Insert or replace the term of `species`
    pub fn insert(&mut self, species: Species, term: SourceTerm) {
        if term.is_none() {
            self.terms.remove(&species);
        } else {
            self.terms.insert(species, term);
        }
    }

    /// Term of a species, if any
    pub fn get(&self, species: Species) -> Option<&SourceTerm> {
        self.terms.get(&species)
    }

    /// Species with a source
    pub fn species(&self) -> impl Iterator<Item = Species> + '_ {
        self.terms.keys().copied()
    }

    /// True when no species is forced
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// `target += dt · S_species(·, t)` when the species has a source
    pub fn apply(&self, species: Species, t: f64, grid: &Grid, target: &mut Field, dt: f64) {
        if let Some(term) = self.terms.get(&species) {
            term.add_to(t, grid, target, dt);
        }
    }
}

// =================================================================================================
// Tests
// =================================================================================================
