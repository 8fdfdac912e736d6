//! Error types
//!
//! Configuration problems are reported when a solver is built; once a solver
//! exists, stepping never fails. The only runtime error is the opt-in
//! non-finite scan performed by `validate_state()`.

use thiserror::Error;

/// Result alias used throughout the crate
pub type SimulationResult<T> = Result<T, SimulationError>;

/// Errors raised while building or inspecting a simulation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// A caller-supplied field does not have the grid shape
    #[error("shape mismatch for {field}: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        field: String,
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    /// The model cannot run on a grid of this dimensionality
    #[error("{model} does not support {ndim}-dimensional grids")]
    UnsupportedDimension {
        model: &'static str,
        ndim: usize,
    },

    /// Wrong number of velocity components for the grid and flow coupling
    #[error("{ndim}-dimensional flow needs {expected} velocity components, got {found}")]
    FlowComponentMismatch {
        ndim: usize,
        expected: usize,
        found: usize,
    },

    /// A parameter is outside its admissible range
    #[error("invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// NaN or Inf found in a field
    #[error("non-finite value in {quantity} at t = {time} (step {step})")]
    NonFinite {
        quantity: String,
        time: f64,
        step: usize,
    },
}

impl SimulationError {
    pub(crate) fn shape_mismatch(field: impl Into<String>, expected: &[usize], found: &[usize]) -> Self {
        Self::ShapeMismatch {
            field: field.into(),
            expected: expected.to_vec(),
            found: found.to_vec(),
        }
    }

    pub(crate) fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        Self::InvalidParameter { name, value, reason }
    }
}

/// Check that `value` is finite and strictly positive
pub(crate) fn require_positive(name: &'static str, value: f64) -> SimulationResult<()> {
    if !value.is_finite() {
        return Err(SimulationError::invalid(name, value, "must be finite"));
    }
    if value <= 0.0 {
        return Err(SimulationError::invalid(name, value, "must be positive"));
    }
    Ok(())
}

/// Check that `value` is finite and not negative
pub(crate) fn require_non_negative(name: &'static str, value: f64) -> SimulationResult<()> {
    if !value.is_finite() {
        return Err(SimulationError::invalid(name, value, "must be finite"));
    }
    if value < 0.0 {
        return Err(SimulationError::invalid(name, value, "must not be negative"));
    }
    Ok(())
}

/// Check that `value` is finite
pub(crate) fn require_finite(name: &'static str, value: f64) -> SimulationResult<()> {
    if !value.is_finite() {
        return Err(SimulationError::invalid(name, value, "must be finite"));
    }
    Ok(())
}
