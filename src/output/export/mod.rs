//! Export module for simulation snapshots.
//!
//! # Architecture
//!
//! This module defines the [`Exporter`] trait that abstracts the export format.
//! Each format is an independent implementation in its own sub-module, so
//! adding a format means adding a file without touching existing code.
//!
//! # Available formats
//!
//! | Format  | Module          |
//! |---------|-----------------|
//! | CSV     | [`csv`]         |
//!
//! # Usage example
//!
//! ```rust,ignore
//! use modelg_rs::output::export::{CsvExporter, Exporter};
//! use modelg_rs::physics::{PhysicalQuantity, Species};
//!
//! let exporter = CsvExporter::default();
//! let snapshot = model.snapshot();
//!
//! // Centre-line profiles of every quantity along x
//! exporter.export_profiles(&snapshot, model.grid(), 0, "profiles.csv")?;
//!
//! // Full 2D field of G
//! exporter.export_quantity(&snapshot, PhysicalQuantity::Concentration(Species::G), "G.csv")?;
//! ```

pub mod csv;

pub use csv::{CsvConfig, CsvError, CsvExporter, CsvMetadata, export_field_csv, export_profiles_csv};

use crate::physics::{PhysicalQuantity, PhysicalState};
use crate::solver::Grid;

/// Abstraction trait for all export formats.
///
/// # Associated type `Error`
///
/// Each format manages its own errors via the associated type.
/// This avoids systematic boxing (`Box<dyn Error>`) and allows
/// the caller to react precisely based on the error type.
pub trait Exporter {
    /// Error type specific to this export format.
    type Error: std::error::Error;

    /// Exports the centre-line profile of every quantity in `state` along
    /// `axis`, one column per quantity.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the path is invalid or the directory does not exist
    /// - `state` is empty or holds non-finite values
    /// - `axis` is not an axis of `grid`
    fn export_profiles(
        &self,
        state: &PhysicalState,
        grid: &Grid,
        axis: usize,
        path: &str,
    ) -> Result<(), Self::Error>;

    /// Exports one quantity of `state` as a full field (central plane in 3D).
    ///
    /// # Errors
    ///
    /// Returns an error if the quantity is missing, holds non-finite values
    /// or the file cannot be written.
    fn export_quantity(
        &self,
        state: &PhysicalState,
        quantity: PhysicalQuantity,
        path: &str,
    ) -> Result<(), Self::Error>;
}
