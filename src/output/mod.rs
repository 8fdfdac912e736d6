//! Output module for simulation results
//!
//! Rendering (images, videos, quiver plots) is left to external tools; this
//! module only persists fields in formats those tools read.
//!
//! # Architecture
//!
//! ```text
//! output/
//! ├── mod.rs              ← This file
//! └── export/             ← Data export
//!     ├── mod.rs          ← Exporter trait
//!     └── csv.rs
//! ```
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use modelg_rs::output::export::{CsvConfig, CsvExporter, CsvMetadata, Exporter};
//!
//! let config = CsvConfig::default().with_metadata(CsvMetadata::from_simulation(&model));
//! CsvExporter::new(config).export_profiles(&model.snapshot(), model.grid(), 0, "profiles.csv")?;
//! ```

pub mod export;

// Re-export commonly used items for convenience
pub use export::{CsvConfig, CsvError, CsvExporter, CsvMetadata, Exporter};
