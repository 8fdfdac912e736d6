//! modelg-rs: Model G Reaction-Diffusion-Advection Framework
//!
//! A pseudo-spectral solver for the Model G autocatalytic reaction network
//! (species G, X, Y) on periodic 1D, 2D and 3D grids, optionally coupled to a
//! compressible flow driven by the species densities. Built with Rust for
//! performance and safety.
//!
//! # Architecture
//!
//! modelg-rs is built on two core principles:
//!
//! 1. **Separation of Chemistry and Numerics**
//!    - Reaction models define the local kinetics (what to solve)
//!    - Solvers couple them to spectral diffusion and flow (how to solve)
//!
//! 2. **Fail at construction, never while stepping**
//!    - Shapes, dimensions and parameters are validated when a solver is built
//!    - `step()` is infallible; divergence is detected on request
//!
//! # Quick Start
//!
//! ```rust
//! use modelg_rs::prelude::*;
//!
//! # fn main() -> Result<(), modelg_rs::error::SimulationError> {
//! // 1. Domain and forcing: a negative G pulse at the origin
//! let grid = Grid::from_extent(2, 32, 16.0)?;
//! let scenario = Scenario::new(grid)
//!     .with_source(Species::G, SourceTerm::gaussian_pulse(vec![], -10.0, 0.5, 1.0, 0.5));
//!
//! // 2. Solver with default parameters and dt = 0.1·dx
//! let mut model = ModelG::new(scenario, ModelGParameters::default(), SolverConfiguration::default())?;
//!
//! // 3. Run and read back
//! model.run_until(2.0);
//! model.validate_state()?;
//! let snapshot = model.snapshot();
//! assert!(snapshot.concentration(Species::G).is_some());
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`error`]: error taxonomy
//! - [`physics`]: species, fields, snapshots and the kinetics trait
//! - [`models`]: Model G and Brusselator parameters, source terms
//! - [`solver`]: grids, spectral operators, integrators and model solvers
//! - [`output`]: CSV export of snapshots
//!
//! # Features
//!
//! - `parallel` (default): rayon data parallelism for large grids

pub mod error;
pub mod models;
pub mod output;
pub mod physics;
pub mod solver;

pub mod prelude {
    //! Convenient imports for common usage
    //!
    //! ```rust
    //! use modelg_rs::prelude::*;
    //! ```
    pub use crate::error::{SimulationError, SimulationResult};
    pub use crate::models::{BrusselatorParameters, ModelGParameters, SourceFunctions, SourceTerm};
    pub use crate::physics::{Field, PhysicalQuantity, PhysicalState, ReactionKinetics, Species};
    pub use crate::solver::{
        Brusselator, FlowCoupling, FluidModelG, Grid, ModelG, Scenario, Simulation, SolverConfiguration,
        StabilityAdvisory,
    };
}
