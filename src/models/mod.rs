//! Reaction models and forcing
//!
//! Models provide the local chemistry: parameters, steady state and a
//! [`ReactionKinetics`](crate::physics::ReactionKinetics) implementation. The
//! solvers in [`crate::solver`] couple that chemistry to diffusion and flow.
//!
//! # Available Models
//!
//! ## [`ModelGParameters`]: Model G
//!
//! Three species G, X, Y with the reactions
//! `A → G`, `G ⇌ X`, `B + X → Y + Z`, `2X + Y → 3X`, `X → Ω`.
//! Also carries the fluid properties (densities, viscosity, speed of sound)
//! used by [`FluidModelG`](crate::solver::FluidModelG).
//!
//! ## [`BrusselatorParameters`]: Brusselator
//!
//! The two-species reduction of Model G (X and Y only).
//!
//! # Sources
//!
//! [`SourceTerm`] describes an external forcing `f(t, x)` added to a species
//! each step; [`SourceFunctions`] maps species to their forcing.

// =================================================================================================
// Module Declarations
// =================================================================================================

pub mod brusselator;
pub mod model_g;
pub mod source;

// =================================================================================================
// Public Re-exports
// =================================================================================================

pub use brusselator::{BRUSSELATOR_SPECIES, BrusselatorParameters};
pub use model_g::{ModelGParameters, SteadyState};
pub use source::{SourceFunctions, SourceTerm};
