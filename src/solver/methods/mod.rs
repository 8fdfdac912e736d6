//! Model solvers
//!
//! Concrete implementations of the [`Simulation`](crate::solver::Simulation)
//! trait. Each solver owns its fields, its spectral operators and its
//! precomputed integrators; building one validates the scenario, the
//! parameters and the configuration, after which `step()` cannot fail.
//!
//! # Available Solvers
//!
//! - **[`ModelG`]**: reaction + diffusion of G, X, Y (1D to 3D)
//! - **[`FluidModelG`]**: Model G advected by a compressible flow driven by
//!   the species densities (2D and 3D)
//! - **[`Brusselator`]**: two-species reaction + diffusion (1D to 3D)
//!
//! # Performance Considerations
//!
//! Every solver benefits from:
//! - **Rayon parallelization** (feature `parallel`) of the element-wise
//!   reaction step and of the FFT lanes on large grids
//! - **Configurable threshold** via `set_parallel_threshold()`
//! - **Cached FFT plans** shared by every integrator of a solver

pub mod brusselator;
pub mod fluid_model_g;
pub mod model_g;

pub use brusselator::Brusselator;
pub use fluid_model_g::FluidModelG;
pub use model_g::ModelG;
