//! Operator-split integrators
//!
//! Each integrator handles one physical process over one time step. The model
//! solvers in [`crate::solver::methods`] chain them in a fixed order.
//!
//! - **`reaction`**: point-wise Taylor step of the reaction kinetics
//! - **`diffusion`**: exact spectral decay
//! - **`flow`**: compressible velocity update driven by a log-density field
//! - **`advection`**: diffusion followed by transport along a velocity field

pub mod advection;
pub mod diffusion;
pub mod flow;
pub mod reaction;

pub use advection::DiffusionAdvectionIntegrator;
pub use diffusion::DiffusionIntegrator;
pub use flow::{FlowIntegrator, FlowUpdate};
pub use reaction::{react_three, react_two};
