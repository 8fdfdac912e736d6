//! Physical quantities and kinetics
//!
//! This module holds the vocabulary shared by models and solvers.
//!
//! # Core Concepts
//!
//! - **Species**: G, X and Y, the chemical species of Model G
//! - **Physical Quantity**: type-safe identifier for a readback field
//!   (a concentration, a velocity component, a divergence)
//! - **Physical State**: snapshot of all fields exposed by a solver
//! - **Reaction Kinetics**: point-wise reaction step implemented by a model
//!
//! # Architecture
//!
//! Reaction kinetics are **separate from spatial operators**:
//! - The model provides the local **chemistry** (`ReactionKinetics`)
//! - The solver applies it element-wise and couples it to diffusion and flow
//!
//! # Example
//!
//! ```rust
//! use modelg_rs::models::ModelGParameters;
//! use modelg_rs::physics::ReactionKinetics;
//! use nalgebra::Vector3;
//!
//! let params = ModelGParameters::default();
//!
//! // The steady state is a fixed point of the perturbation kinetics
//! let next = params.advance(Vector3::zeros(), 0.1);
//! assert_eq!(next, Vector3::zeros());
//! ```

// module declaration
pub mod field;
pub mod traits;

// re-export commonly used types for convenience
pub use field::{Field, Spectrum};
pub use traits::{PhysicalQuantity, PhysicalState, ReactionKinetics, Species};
