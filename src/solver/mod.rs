//! Numerical solvers
//!
//! This module turns the reaction models of [`crate::models`] into
//! time-stepping simulations on periodic grids.
//!
//! # Core Concepts
//!
//! ## The Architecture (WHAT vs HOW)
//!
//! 1. **Scenario** (`Scenario`) - WHAT to solve
//!    - Grid (periodic domain, lattice constant)
//!    - Initial perturbations and velocity components
//!    - Source terms
//!
//! 2. **Configuration** (`SolverConfiguration`) - HOW to solve
//!    - Time step (defaults to `0.1·dx`)
//!    - Flow coupling (one shared velocity field or one per species)
//!    - Steady-state linearisation of the compression term
//!
//! 3. **Solver** (`Simulation` trait) - the operator-split scheme
//!    - `ModelG`, `FluidModelG`, `Brusselator`
//!    - Built once, stepped many times
//!
//! # Module Organization
//!
//! - **`domain`**: `Grid`, coordinates and field helpers
//! - **`spectral`**: FFT plans, wavenumbers and derivative kernels
//! - **`integrators`**: reaction, diffusion, flow and diffusion-advection steps
//! - **`methods`**: the model solvers
//! - **`traits`**: `Simulation`, `SolverConfiguration`, `FlowCoupling`,
//!   `StabilityAdvisory`
//! - **`scenario`**: problem definition
//!
//! # Quick Start Example
//!
//! ```rust
//! use modelg_rs::models::ModelGParameters;
//! use modelg_rs::physics::Species;
//! use modelg_rs::solver::{Grid, ModelG, Scenario, Simulation, SolverConfiguration};
//!
//! let grid = Grid::square(1, 64, 0.5).unwrap();
//! let seed = grid.distance_squared(&[0.0]).mapv(|r2| 0.01 * (-r2).exp());
//! let scenario = Scenario::new(grid).with_concentration(Species::X, seed);
//!
//! let mut model = ModelG::new(scenario, ModelGParameters::default(), SolverConfiguration::default()).unwrap();
//! model.run_until(1.0);
//!
//! assert!(model.validate_state().is_ok());
//! println!("t = {:.2}, X(0) = {:e}", model.time(), model.concentration(Species::X)[[32]]);
//! ```
//!
//! # Error Handling
//!
//! Construction returns [`SimulationResult`](crate::error::SimulationResult):
//! invalid parameters, mismatched field shapes, unsupported dimensions and
//! wrong velocity component counts are all rejected there. Stepping itself
//! never fails; call [`Simulation::validate_state`] to detect NaN or Inf.

// =================================================================================================
// Module Declarations
// =================================================================================================
pub mod domain;
pub mod integrators;
pub mod methods;
pub mod spectral;

mod scenario;
mod traits;

// =================================================================================================
// Parallel Execution Threshold
// =================================================================================================
//
// Deciding *when* to hand work off to Rayon is a numerical-execution concern,
// not a physics concern.  It therefore lives here (solver) rather than in
// physics/field.rs.
//
// The threshold is stored in an AtomicUsize so that it can be changed at
// runtime (useful in benchmarks and tests) without requiring a mutex on every
// `apply()` call.  Relaxed ordering is sufficient: the value is a
// performance hint, not a synchronisation point.
// =================================================================================================

use std::sync::atomic::{AtomicUsize, Ordering};

/// Default number of grid points above which element-wise updates and FFT
/// lanes switch to parallel iteration.
///
/// The crossover is set at 1 000 elements.  Below that point the overhead of
/// Rayon's thread-pool dispatch outweighs the per-element work of a reaction
/// step.
const DEFAULT_PARALLEL_THRESHOLD: usize = 999;

/// Runtime-configurable parallel-execution threshold.
///
/// Read via [`parallel_threshold()`], written via [`set_parallel_threshold()`].
static PARALLEL_THRESHOLD: AtomicUsize = AtomicUsize::new(DEFAULT_PARALLEL_THRESHOLD);

/// Return the current parallel-execution threshold.
///
/// [`field::apply`](crate::physics::field::apply), the reaction step and the
/// spectral transforms use sequential iteration when a field contains
/// fewer elements than this value, and switch to Rayon when it contains
/// more, but only when the crate is compiled with the `parallel` feature.
///
/// # Example
///
/// ```rust
/// use modelg_rs::solver::parallel_threshold;
///
/// assert!(parallel_threshold() > 0);
/// ```
pub fn parallel_threshold() -> usize {
    PARALLEL_THRESHOLD.load(Ordering::Relaxed)
}

/// Set the parallel-execution threshold to a new value.
///
/// # Panics
///
/// Panics when `threshold == 0`.  A zero-element threshold would force
/// parallel dispatch on every single-point update, which is never
/// the intended behaviour.
///
/// # Example
///
/// ```rust
/// use modelg_rs::solver::{parallel_threshold, set_parallel_threshold};
///
/// let previous = parallel_threshold();
/// set_parallel_threshold(2048);
/// assert_eq!(parallel_threshold(), 2048);
///
/// // Restore so other tests are not affected.
/// set_parallel_threshold(previous);
/// ```
pub fn set_parallel_threshold(threshold: usize) {
    assert!(threshold > 0, "parallel threshold must be at least 1");
    PARALLEL_THRESHOLD.store(threshold, Ordering::Relaxed);
}

/// RAII guard that saves the current threshold on construction and restores
/// it on drop.
///
/// Only compiled in test builds.  Prevents one test from leaking a modified
/// threshold value into the next.
///
/// ```rust,ignore
/// let _guard = crate::solver::ThresholdGuard::save(50);
/// // threshold is now 50 …
/// // … and is automatically restored when _guard is dropped.
/// ```
#[cfg(test)]
pub(crate) struct ThresholdGuard {
    previous: usize,
}

#[cfg(test)]
impl ThresholdGuard {
    /// Set the threshold to `new_value` and return a guard that will
    /// restore the previous value on drop.
    pub(crate) fn save(new_value: usize) -> Self {
        let previous = parallel_threshold();
        set_parallel_threshold(new_value);
        Self { previous }
    }
}

#[cfg(test)]
impl Drop for ThresholdGuard {
    fn drop(&mut self) {
        // Bypass the public setter so that restoring to any value (including
        // the original default) never panics.
        PARALLEL_THRESHOLD.store(self.previous, Ordering::Relaxed);
    }
}

// =================================================================================================
// Public Re-exports
// =================================================================================================

pub use domain::Grid;
pub use methods::{Brusselator, FluidModelG, ModelG};
pub use scenario::Scenario;
pub use spectral::SpectralOperators;
pub use traits::{
    DEFAULT_DT_RATIO, FlowCoupling, STABLE_DT_RATIO, Simulation, SolverConfiguration, StabilityAdvisory,
};

// =================================================================================================
// Helper Functions
// =================================================================================================

use crate::error::{SimulationError, SimulationResult};
use crate::physics::{Field, PhysicalQuantity, PhysicalState, field};

/// Fail on the first field containing NaN or Inf
///
/// Fields are checked in iteration order; the error names the quantity, the
/// simulation time and the step.
pub(crate) fn check_fields<'a, I>(fields: I, time: f64, step: usize) -> SimulationResult<()>
where
    I: IntoIterator<Item = (PhysicalQuantity, &'a Field)>,
{
    for (quantity, data) in fields {
        if let Some(index) = field::first_non_finite(data) {
            log::debug!("non-finite value in {quantity} at flat index {index}, step {step}");
            return Err(SimulationError::NonFinite {
                quantity: quantity.to_string(),
                time,
                step,
            });
        }
    }
    Ok(())
}

/// Validate a snapshot for numerical issues
///
/// Quantities are scanned in their sorted order so the reported one is
/// deterministic.
///
/// # Example
///
/// ```rust,ignore
/// validate_state(&model.snapshot(), model.steps())?;
/// ```
pub(crate) fn validate_state(state: &PhysicalState, step: usize) -> SimulationResult<()> {
    let time = state.time().unwrap_or(f64::NAN);
    let fields = state
        .available_quantities()
        .into_iter()
        .filter_map(|quantity| state.get(quantity).map(|data| (quantity, data)));
    check_fields(fields, time, step)
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_threshold_value() {
        assert_eq!(DEFAULT_PARALLEL_THRESHOLD, 999);
    }

    #[test]
    fn test_get_and_set_threshold() {
        let _guard = ThresholdGuard::save(500);
        assert_eq!(parallel_threshold(), 500);
    }

    #[test]
    #[should_panic(expected = "parallel threshold must be at least 1")]
    fn test_zero_threshold_panics() {
        set_parallel_threshold(0);
    }

    #[test]
    fn test_threshold_guard_restores_previous_value() {
        let before = parallel_threshold();
        {
            let _guard = ThresholdGuard::save(42);
            assert_eq!(parallel_threshold(), 42);
        }
        // Guard dropped: value must be back to what it was before.
        assert_eq!(parallel_threshold(), before);
    }

    #[test]
    fn test_validate_state_reports_first_bad_quantity() {
        let grid = Grid::square(1, 4, 1.0).unwrap();
        let mut state = PhysicalState::new(PhysicalQuantity::Concentration(crate::physics::Species::G), grid.zeros());
        state.set_metadata("time".to_string(), 2.5);
        assert!(validate_state(&state, 7).is_ok());

        let mut bad = grid.zeros();
        bad[[2]] = f64::INFINITY;
        state.set(PhysicalQuantity::Concentration(crate::physics::Species::Y), bad);

        match validate_state(&state, 7) {
            Err(SimulationError::NonFinite { quantity, time, step }) => {
                assert_eq!(quantity, "Y");
                assert_eq!(time, 2.5);
                assert_eq!(step, 7);
            }
            other => panic!("expected NonFinite, got {other:?}"),
        }
    }

    #[test]
    fn test_threshold_is_visible_across_threads() {
        use std::thread;

        let _guard = ThresholdGuard::save(1234);

        let handles: Vec<_> = (0..8)
            .map(|_| thread::spawn(|| parallel_threshold()))
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), 1234);
        }
    }
}

