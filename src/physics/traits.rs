//! Physical models traits and types
//!
//! This module defines the core API shared by every model:
//! - `Species`: the chemical species of the Model G network
//! - `PhysicalQuantity`: type-safe identifiers for readback fields
//! - `PhysicalState`: snapshot container returned by solvers
//! - `ReactionKinetics`: point-wise reaction trait implemented by the models

use ndarray::ArrayD;
use std::collections::HashMap;
use std::fmt;

use crate::solver::domain::AXIS_NAMES;

// =================================================================================================
// Species
// =================================================================================================

/// Chemical species of the Model G network
///
/// The Brusselator only uses `X` and `Y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Species {
    /// Precursor fed by the constant `A` inflow
    G,
    /// Autocatalytic activator
    X,
    /// Inhibitor consumed by the autocatalytic step
    Y,
}

impl Species {
    /// All species in canonical order (G, X, Y)
    pub const ALL: [Species; 3] = [Species::G, Species::X, Species::Y];

    /// Position in the canonical order
    pub fn index(self) -> usize {
        match self {
            Species::G => 0,
            Species::X => 1,
            Species::Y => 2,
        }
    }

    /// Single-letter label
    pub fn label(self) -> &'static str {
        match self {
            Species::G => "G",
            Species::X => "X",
            Species::Y => "Y",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =================================================================================================
// Physical quantities (Type-safe Identifiers)
// =================================================================================================

/// Known physical quantities (type-safe enum)
///
/// # Velocity fields
///
/// `Velocity { carrier: None, .. }` is the single shared flow field, while
/// `Velocity { carrier: Some(s), .. }` is the flow that advects species `s`
/// when every species has its own field.
///
/// # Example
/// ```
/// use modelg_rs::physics::{PhysicalQuantity, Species};
///
/// let g = PhysicalQuantity::Concentration(Species::G);
/// let u = PhysicalQuantity::Velocity { carrier: Some(Species::X), axis: 0 };
/// assert_eq!(g.to_string(), "G");
/// assert_eq!(u.to_string(), "u_x(X)");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PhysicalQuantity {
    /// Concentration perturbation from the steady state
    Concentration(Species),

    /// One Cartesian component of a velocity field
    Velocity {
        carrier: Option<Species>,
        axis: usize,
    },

    /// Velocity divergence produced by the last flow update
    Divergence {
        carrier: Option<Species>,
    },

    /// Custom quantity (for use extension)
    Custom(&'static str),
}

impl fmt::Display for PhysicalQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = |carrier: &Option<Species>| match carrier {
            Some(species) => format!("({species})"),
            None => String::new(),
        };
        match self {
            Self::Concentration(species) => write!(f, "{species}"),
            Self::Velocity { carrier, axis } => {
                let name = AXIS_NAMES.get(*axis).copied().unwrap_or("?");
                write!(f, "u_{name}{}", suffix(carrier))
            }
            Self::Divergence { carrier } => write!(f, "div{}", suffix(carrier)),
            Self::Custom(name) => f.write_str(name),
        }
    }
}

// =================================================================================================
// Physical State (Snapshot Container)
// =================================================================================================

/// Snapshot of a simulation at a given step
///
/// Holds copies of the fields a solver exposes, keyed by `PhysicalQuantity`,
/// plus scalar metadata (`time`, `dt`, `step`).
///
/// # Example
/// ```
/// use modelg_rs::physics::{PhysicalQuantity, PhysicalState, Species};
/// use ndarray::ArrayD;
/// use ndarray::IxDyn;
///
/// let mut state = PhysicalState::empty();
/// state.set(PhysicalQuantity::Concentration(Species::X), ArrayD::zeros(IxDyn(&[8])));
/// state.set_metadata("time".to_string(), 0.5);
/// assert_eq!(state.time(), Some(0.5));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PhysicalState {
    /// Physical quantities stored in a dictionary
    quantities: HashMap<PhysicalQuantity, ArrayD<f64>>,

    /// Scalar metadata (time, dt, step counter, ...)
    metadata: HashMap<String, f64>,
}

impl PhysicalState {
    /// Create a new state with primary quantity
    pub fn new(quantity: PhysicalQuantity, value: ArrayD<f64>) -> Self {
        let mut state = Self::empty();
        state.set(quantity, value);
        state
    }

    /// Create an empty state
    pub fn empty() -> Self {
        Self::default()
    }

    /// Get a quantity by type
    pub fn get(&self, quantity: PhysicalQuantity) -> Option<&ArrayD<f64>> {
        self.quantities.get(&quantity)
    }

    /// Get mutable reference to a quantity
    pub fn get_mut(&mut self, quantity: PhysicalQuantity) -> Option<&mut ArrayD<f64>> {
        self.quantities.get_mut(&quantity)
    }

    /// Set a quantity
    pub fn set(&mut self, quantity: PhysicalQuantity, value: ArrayD<f64>) {
        self.quantities.insert(quantity, value);
    }

    /// Concentration of one species, if present
    pub fn concentration(&self, species: Species) -> Option<&ArrayD<f64>> {
        self.get(PhysicalQuantity::Concentration(species))
    }

    /// Available quantities in a stable order
    pub fn available_quantities(&self) -> Vec<PhysicalQuantity> {
        let mut keys: Vec<_> = self.quantities.keys().copied().collect();
        keys.sort();
        keys
    }

    /// Iterate over quantities in a stable order
    pub fn iter(&self) -> impl Iterator<Item = (PhysicalQuantity, &ArrayD<f64>)> {
        self.available_quantities()
            .into_iter()
            .filter_map(move |q| self.quantities.get(&q).map(|field| (q, field)))
    }

    /// Number of stored quantities
    pub fn len(&self) -> usize {
        self.quantities.len()
    }

    /// True when no quantity is stored
    pub fn is_empty(&self) -> bool {
        self.quantities.is_empty()
    }

    /// Get a metadata
    pub fn get_metadata(&self, key: &str) -> Option<f64> {
        self.metadata.get(key).copied()
    }

    /// Set a metadata
    pub fn set_metadata(&mut self, key: String, value: f64) {
        self.metadata.insert(key, value);
    }

    /// Simulation time recorded in the metadata
    pub fn time(&self) -> Option<f64> {
        self.get_metadata("time")
    }
}

// ==================================================================================================
// Reaction Kinetics Trait
// =================================================================================================

/// Point-wise reaction kinetics
///
/// # Responsibility
/// Advances the local concentrations of one grid point over `dt`.
/// Spatial coupling (diffusion, advection) is the solver's job.
///
/// Concentrations are perturbations from the model's steady state, so the
/// zero state is a fixed point of both `rates` and `advance`.
pub trait ReactionKinetics: Send + Sync {
    /// Local concentration vector (one entry per species)
    type Concentrations: Copy + Send + Sync;

    /// Right-hand side of the perturbation ODE
    fn rates(&self, concentrations: Self::Concentrations) -> Self::Concentrations;

    /// Advance the local state by `dt` without failure
    fn advance(&self, concentrations: Self::Concentrations, dt: f64) -> Self::Concentrations;

    /// Species tracked by the kinetics, in storage order
    fn species(&self) -> &'static [Species];

    /// Name of the model (used to display and logging)
    fn name(&self) -> &str;
}

// =================================================================================================
// Tests
// =================================================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::IxDyn;

    fn field(values: &[f64]) -> ArrayD<f64> {
        ArrayD::from_shape_vec(IxDyn(&[values.len()]), values.to_vec()).unwrap()
    }

    #[test]
    fn test_empty_physical_state() {
        let state = PhysicalState::empty();

        assert!(state.is_empty());
        assert_eq!(state.metadata.len(), 0);
    }

    #[test]
    fn test_new_physical_state() {
        let quantity = PhysicalQuantity::Concentration(Species::Y);
        let state = PhysicalState::new(quantity, field(&[1.0, 2.0]));

        assert_eq!(state.len(), 1);
        assert!(state.available_quantities().contains(&quantity));
        assert_eq!(state.concentration(Species::Y).unwrap().len(), 2);
        assert!(state.concentration(Species::G).is_none());
    }

    #[test]
    fn test_modify_physical_state() {
        let quantity = PhysicalQuantity::Custom("density");
        let mut state = PhysicalState::new(quantity, field(&[1.0, 2.0]));

        state.get_mut(quantity).unwrap()[0] = 10.0;
        assert_eq!(state.get(quantity).unwrap()[0], 10.0);
    }

    #[test]
    fn test_stable_ordering() {
        let mut state = PhysicalState::empty();
        state.set(PhysicalQuantity::Velocity { carrier: None, axis: 1 }, field(&[0.0]));
        state.set(PhysicalQuantity::Concentration(Species::Y), field(&[0.0]));
        state.set(PhysicalQuantity::Concentration(Species::G), field(&[0.0]));
        state.set(PhysicalQuantity::Velocity { carrier: None, axis: 0 }, field(&[0.0]));

        let names: Vec<String> = state.iter().map(|(q, _)| q.to_string()).collect();
        assert_eq!(names, vec!["G", "Y", "u_x", "u_y"]);
    }

    #[test]
    fn test_metadata() {
        let mut state = PhysicalState::empty();
        assert_eq!(state.time(), None);

        state.set_metadata("time".to_string(), 2.5);
        state.set_metadata("dt".to_string(), 0.025);
        assert_eq!(state.time(), Some(2.5));
        assert_eq!(state.get_metadata("dt"), Some(0.025));
    }

    #[test]
    fn test_quantity_labels() {
        assert_eq!(PhysicalQuantity::Divergence { carrier: None }.to_string(), "div");
        assert_eq!(PhysicalQuantity::Divergence { carrier: Some(Species::G) }.to_string(), "div(G)");
        assert_eq!(PhysicalQuantity::Velocity { carrier: None, axis: 2 }.to_string(), "u_z");
        assert_eq!(Species::ALL.map(Species::index), [0, 1, 2]);
    }
}
