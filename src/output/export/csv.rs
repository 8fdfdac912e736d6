//! CSV export of simulation fields
//!
//! This module writes snapshot fields to CSV (Comma-Separated Values), which
//! is readable by Python (`numpy.loadtxt`, pandas), MATLAB and spreadsheets.
//!
//! # Features
//!
//! - **Profiles**: centre lines of several quantities along one axis, one
//!   column per quantity after the coordinate column
//! - **Slices**: a 1D field as one column, a 2D field as a matrix, a 3D field
//!   as its central `z` plane
//! - **Metadata**: optional `#` header with model, time, step and grid
//! - **Validation**: rejects empty data and NaN/Inf values
//!
//! # Quick Examples
//!
//! ## Profiles
//!
//! ```rust,ignore
//! use modelg_rs::output::export::{CsvExporter, Exporter};
//!
//! let exporter = CsvExporter::default();
//! exporter.export_profiles(&model.snapshot(), model.grid(), 0, "profiles.csv")?;
//! ```
//!
//! **Output** (`profiles.csv`):
//! ```csv
//! x,G,X,Y
//! -8.000000,0.000001,-0.000002,0.000001
//! ...
//! ```
//!
//! ## With Metadata
//!
//! ```rust,ignore
//! use modelg_rs::output::export::{CsvConfig, CsvExporter, CsvMetadata};
//!
//! let config = CsvConfig::default().with_metadata(CsvMetadata::from_simulation(&model));
//! let exporter = CsvExporter::new(config);
//! ```
//!
//! **Output**:
//! ```csv
//! # Model G Simulation Data
//! # Generated: 2026-02-11T15:30:00Z
//! # Model: FluidModelG
//! # Time: 12.5
//! # Time Step: 0.05
//! # Steps: 250
//! # Grid: 128x128, dx = 0.21875
//! #
//! x,G,X,Y
//! ...
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};

use ndarray::{Axis, Ix2};
use thiserror::Error;

use crate::physics::{Field, PhysicalQuantity, PhysicalState, field};
use crate::solver::Simulation;
use crate::solver::domain::{AXIS_NAMES, Grid};

use super::Exporter;

// =============================================================================
// Errors
// =============================================================================

/// Failure while exporting to CSV
#[derive(Debug, Error)]
pub enum CsvError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("empty data: nothing to export")]
    EmptyData,

    #[error("quantity {0} is not present in the snapshot")]
    MissingQuantity(String),

    #[error("invalid data: NaN or Inf detected in {0}")]
    NonFinite(String),

    #[error("axis {axis} is out of range for a {ndim}D grid")]
    InvalidAxis { axis: usize, ndim: usize },

    #[error("field {name} has shape {found:?}, expected {expected:?}")]
    ShapeMismatch {
        name: String,
        expected: Vec<usize>,
        found: Vec<usize>,
    },
}

// =============================================================================
// Configuration Structures
// =============================================================================

/// Configuration for CSV export
///
/// # Example
///
/// ```rust
/// use modelg_rs::output::export::CsvConfig;
///
/// let config = CsvConfig {
///     delimiter: ';',
///     precision: 10,
///     ..Default::default()
/// };
/// assert_eq!(config.decimal_separator, '.');
/// ```
#[derive(Debug, Clone)]
pub struct CsvConfig {
    /// Column delimiter (default: ',')
    pub delimiter: char,

    /// Decimal separator (default: '.')
    pub decimal_separator: char,

    /// Number of decimal places for floating-point values (default: 6)
    pub precision: usize,

    /// Include metadata header comments (default: false)
    pub include_metadata: bool,

    /// Metadata to include in header
    pub metadata: Option<CsvMetadata>,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            decimal_separator: '.',
            precision: 6,
            include_metadata: false,
            metadata: None,
        }
    }
}

impl CsvConfig {
    /// European CSV format (semicolon, comma for decimal)
    pub fn european() -> Self {
        Self {
            delimiter: ';',
            decimal_separator: ',',
            ..Default::default()
        }
    }

    /// High precision (12 decimal places)
    pub fn high_precision() -> Self {
        Self {
            precision: 12,
            ..Default::default()
        }
    }

    /// Builder pattern: set delimiter
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Builder pattern: set precision
    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Builder pattern: enable metadata
    pub fn with_metadata(mut self, metadata: CsvMetadata) -> Self {
        self.include_metadata = true;
        self.metadata = Some(metadata);
        self
    }
}

/// Metadata for CSV header comments
///
/// Only fields that are set appear in the header.
#[derive(Debug, Clone, Default)]
pub struct CsvMetadata {
    /// Model name (e.g., "FluidModelG")
    pub model_name: Option<String>,

    /// Simulation time of the snapshot
    pub time: Option<f64>,

    /// Fixed time step
    pub dt: Option<f64>,

    /// Number of steps taken
    pub steps: Option<usize>,

    /// Grid shape and lattice constant
    pub grid: Option<(Vec<usize>, f64)>,

    /// Additional custom parameters
    pub custom: Vec<(String, String)>,
}

impl CsvMetadata {
    /// Metadata describing the current state of a simulation
    pub fn from_simulation<S: Simulation + ?Sized>(simulation: &S) -> Self {
        let grid = simulation.grid();
        Self {
            model_name: Some(simulation.name().to_string()),
            time: Some(simulation.time()),
            dt: Some(simulation.dt()),
            steps: Some(simulation.steps()),
            grid: Some((grid.shape().to_vec(), grid.dx())),
            custom: Vec::new(),
        }
    }

    /// Add custom parameter
    pub fn add_custom(&mut self, key: String, value: String) {
        self.custom.push((key, value));
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn write_metadata_header<W: Write>(out: &mut W, metadata: &CsvMetadata) -> Result<(), CsvError> {
    writeln!(out, "# Model G Simulation Data")?;

    let now = chrono::Utc::now();
    writeln!(out, "# Generated: {}", now.to_rfc3339())?;

    if let Some(model) = &metadata.model_name {
        writeln!(out, "# Model: {model}")?;
    }
    if let Some(time) = metadata.time {
        writeln!(out, "# Time: {time}")?;
    }
    if let Some(dt) = metadata.dt {
        writeln!(out, "# Time Step: {dt}")?;
    }
    if let Some(steps) = metadata.steps {
        writeln!(out, "# Steps: {steps}")?;
    }
    if let Some((shape, dx)) = &metadata.grid {
        let dims: Vec<String> = shape.iter().map(|n| n.to_string()).collect();
        writeln!(out, "# Grid: {}, dx = {dx}", dims.join("x"))?;
    }
    for (key, value) in &metadata.custom {
        writeln!(out, "# {key}: {value}")?;
    }

    writeln!(out, "#")?;
    Ok(())
}

/// Format number with configured precision and decimal separator
fn format_number(value: f64, config: &CsvConfig) -> String {
    let formatted = format!("{:.prec$}", value, prec = config.precision);
    if config.decimal_separator != '.' {
        formatted.replace('.', &config.decimal_separator.to_string())
    } else {
        formatted
    }
}

fn write_row<W: Write>(out: &mut W, values: impl IntoIterator<Item = f64>, config: &CsvConfig) -> Result<(), CsvError> {
    let row: Vec<String> = values.into_iter().map(|v| format_number(v, config)).collect();
    writeln!(out, "{}", row.join(&config.delimiter.to_string()))?;
    Ok(())
}

fn check_values(name: &str, field: &Field) -> Result<(), CsvError> {
    if field.is_empty() {
        return Err(CsvError::EmptyData);
    }
    if field::first_non_finite(field).is_some() {
        return Err(CsvError::NonFinite(name.to_string()));
    }
    Ok(())
}

fn open(path: &str, config: &CsvConfig) -> Result<BufWriter<File>, CsvError> {
    let mut out = BufWriter::new(File::create(path)?);
    if config.include_metadata {
        if let Some(metadata) = &config.metadata {
            write_metadata_header(&mut out, metadata)?;
        }
    }
    Ok(out)
}

// =============================================================================
// Export Functions
// =============================================================================

/// Export centre-line profiles of several fields along `axis`
///
/// The first column is the axis coordinate; then one column per field, named
/// by its label.
///
/// # Errors
///
/// - no fields, or a field whose shape differs from the grid
/// - `axis` out of range
/// - NaN or Inf values
/// - file creation errors
///
/// # Example
///
/// ```rust,ignore
/// export_profiles_csv(&grid, &[("G", &g), ("X", &x)], 0, "profiles.csv", None)?;
/// ```
pub fn export_profiles_csv(
    grid: &Grid,
    columns: &[(&str, &Field)],
    axis: usize,
    output_path: &str,
    configuration: Option<&CsvConfig>,
) -> Result<(), CsvError> {
    // ============================= Validation =============================

    if columns.is_empty() {
        return Err(CsvError::EmptyData);
    }
    if axis >= grid.ndim() {
        return Err(CsvError::InvalidAxis { axis, ndim: grid.ndim() });
    }
    for (name, data) in columns {
        if data.shape() != grid.shape() {
            return Err(CsvError::ShapeMismatch {
                name: name.to_string(),
                expected: grid.shape().to_vec(),
                found: data.shape().to_vec(),
            });
        }
        check_values(name, data)?;
    }

    let binding = CsvConfig::default();
    let configuration = configuration.unwrap_or(&binding);

    // ============================= Write ==================================

    let mut out = open(output_path, configuration)?;

    let delimiter = configuration.delimiter.to_string();
    let mut header = vec![AXIS_NAMES[axis]];
    header.extend(columns.iter().map(|(name, _)| *name));
    writeln!(out, "{}", header.join(&delimiter))?;

    let coordinates = grid.coordinates(axis);
    let profiles: Vec<Vec<f64>> = columns.iter().map(|(_, data)| grid.center_line(data, axis)).collect();
    for (i, x) in coordinates.iter().enumerate() {
        let row = std::iter::once(*x).chain(profiles.iter().map(|p| p[i]));
        write_row(&mut out, row, configuration)?;
    }

    out.flush()?;
    Ok(())
}

/// Export a field in `numpy.savetxt` layout
///
/// 1D fields are written one value per line, 2D fields as a matrix (one line
/// per index of axis 0), and 3D fields as the matrix of their central plane
/// along the last axis. No header line is written besides the metadata.
pub fn export_field_csv(
    name: &str,
    data: &Field,
    output_path: &str,
    configuration: Option<&CsvConfig>,
) -> Result<(), CsvError> {
    check_values(name, data)?;

    let binding = CsvConfig::default();
    let configuration = configuration.unwrap_or(&binding);

    let plane = match data.ndim() {
        1 => data.view().insert_axis(Axis(1)),
        2 => data.view(),
        _ => {
            let last = data.ndim() - 1;
            data.index_axis(Axis(last), data.shape()[last] / 2)
        }
    };
    let plane = plane
        .into_dimensionality::<Ix2>()
        .map_err(|_| CsvError::ShapeMismatch {
            name: name.to_string(),
            expected: vec![],
            found: data.shape().to_vec(),
        })?;

    let mut out = open(output_path, configuration)?;
    for row in plane.rows() {
        write_row(&mut out, row.iter().copied(), configuration)?;
    }

    out.flush()?;
    Ok(())
}

// =============================================================================
// Exporter
// =============================================================================

/// CSV implementation of [`Exporter`]
#[derive(Debug, Clone, Default)]
pub struct CsvExporter {
    pub config: CsvConfig,
}

impl CsvExporter {
    pub fn new(config: CsvConfig) -> Self {
        Self { config }
    }
}

impl Exporter for CsvExporter {
    type Error = CsvError;

    fn export_profiles(&self, state: &PhysicalState, grid: &Grid, axis: usize, path: &str) -> Result<(), CsvError> {
        let labels: Vec<(String, &Field)> = state
            .available_quantities()
            .into_iter()
            .filter_map(|quantity| state.get(quantity).map(|data| (quantity.to_string(), data)))
            .collect();
        let columns: Vec<(&str, &Field)> = labels.iter().map(|(label, data)| (label.as_str(), *data)).collect();
        export_profiles_csv(grid, &columns, axis, path, Some(&self.config))
    }

    fn export_quantity(&self, state: &PhysicalState, quantity: PhysicalQuantity, path: &str) -> Result<(), CsvError> {
        let data = state
            .get(quantity)
            .ok_or_else(|| CsvError::MissingQuantity(quantity.to_string()))?;
        export_field_csv(&quantity.to_string(), data, path, Some(&self.config))
    }
}

// =================================================================================================
// Tests
// =================================================================================================
