//! Periodic simulation domain
//!
//! # Design Philosophy
//!
//! Spectral methods need periodic, uniform grids, so the domain is reduced to
//! a shape and one lattice constant. Instead of separate 1D, 2D and 3D types,
//! a single `Grid` carries its dimensionality at runtime and every field is an
//! `ArrayD<f64>` of exactly `grid.shape()`.
//!
//! # Coordinates
//!
//! Axis `a` has `n_a` points. The coordinate of index `i` is
//! `(i - n_a/2)·dx`, which puts the origin at index `n_a/2` (the
//! `ij`-indexed meshgrid convention: axis 0 is x, axis 1 is y, axis 2 is z).
//!
//! ```rust
//! use modelg_rs::solver::Grid;
//!
//! let grid = Grid::square(2, 128, 32.0 / 128.0).unwrap();
//! assert_eq!(grid.shape(), &[128, 128]);
//! assert_eq!(grid.coordinates(0)[64], 0.0);
//! ```

use crate::error::{SimulationError, SimulationResult, require_positive};
use ndarray::{Array1, ArrayD, Axis, IxDyn};

/// Highest dimensionality supported by the spectral operators
pub const MAX_DIMENSIONS: usize = 3;

/// Axis labels used in quantity names and log messages
pub const AXIS_NAMES: [&str; MAX_DIMENSIONS] = ["x", "y", "z"];

// =================================================================================================
// Grid
// =================================================================================================

/// Regular periodic grid with uniform spacing `dx` on every axis
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    shape: Vec<usize>,
    dx: f64,
}

impl Grid {
    /// Create a grid from its per-axis point counts and lattice constant
    ///
    /// # Errors
    ///
    /// - `UnsupportedDimension` for 0 or more than 3 axes
    /// - `InvalidParameter` for an empty axis or a non-positive `dx`
    pub fn new(shape: &[usize], dx: f64) -> SimulationResult<Self> {
        if shape.is_empty() || shape.len() > MAX_DIMENSIONS {
            return Err(SimulationError::UnsupportedDimension {
                model: "Grid",
                ndim: shape.len(),
            });
        }
        if let Some(&n) = shape.iter().find(|&&n| n == 0) {
            return Err(SimulationError::invalid("shape", n as f64, "every axis needs at least one point"));
        }
        require_positive("dx", dx)?;

        Ok(Self { shape: shape.to_vec(), dx })
    }

    /// Create a grid with `n` points on each of `ndim` axes
    pub fn square(ndim: usize, n: usize, dx: f64) -> SimulationResult<Self> {
        Self::new(&vec![n; ndim], dx)
    }

    /// Create a grid whose axes span `length` with `n` points each (`dx = length / n`)
    pub fn from_extent(ndim: usize, n: usize, length: f64) -> SimulationResult<Self> {
        require_positive("length", length)?;
        let points = n.max(1);
        Self::square(ndim, n, length / points as f64)
    }

    /// Grid taking its shape from an existing field
    pub fn for_field(field: &ArrayD<f64>, dx: f64) -> SimulationResult<Self> {
        Self::new(field.shape(), dx)
    }

    // ========================================== Queries ==========================================

    /// Number of spatial dimensions (1, 2 or 3)
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Points per axis
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Lattice constant
    pub fn dx(&self) -> f64 {
        self.dx
    }

    /// Total number of grid points
    pub fn len(&self) -> usize {
        self.shape.iter().product()
    }

    /// Always false: every axis holds at least one point
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Physical length of each axis
    pub fn extent(&self) -> Vec<f64> {
        self.shape.iter().map(|&n| n as f64 * self.dx).collect()
    }

    /// Volume of one grid cell (`dx^ndim`)
    pub fn cell_volume(&self) -> f64 {
        self.dx.powi(self.ndim() as i32)
    }

    // ========================================= Fields ==========================================

    /// Field of zeros with the grid shape
    pub fn zeros(&self) -> ArrayD<f64> {
        ArrayD::zeros(IxDyn(&self.shape))
    }

    /// Uniform field with the grid shape
    pub fn constant(&self, value: f64) -> ArrayD<f64> {
        ArrayD::from_elem(IxDyn(&self.shape), value)
    }

    /// Coordinates along one axis, origin at index `n/2`
    ///
    /// # Panics
    ///
    /// Panics when `axis >= ndim()`.
    pub fn coordinates(&self, axis: usize) -> Array1<f64> {
        let n = self.shape[axis];
        let half = (n / 2) as f64;
        Array1::from_shape_fn(n, |i| (i as f64 - half) * self.dx)
    }

    /// Coordinate of `axis` evaluated at every grid point (one meshgrid component)
    pub fn coordinate_field(&self, axis: usize) -> ArrayD<f64> {
        let coords = self.coordinates(axis);
        ArrayD::from_shape_fn(IxDyn(&self.shape), |index| coords[index[axis]])
    }

    /// Squared distance from `center` at every grid point
    ///
    /// Missing trailing components of `center` are taken as zero.
    pub fn distance_squared(&self, center: &[f64]) -> ArrayD<f64> {
        let axes: Vec<Array1<f64>> = (0..self.ndim()).map(|a| self.coordinates(a)).collect();
        ArrayD::from_shape_fn(IxDyn(&self.shape), |index| {
            axes.iter()
                .enumerate()
                .map(|(a, coords)| {
                    let offset = coords[index[a]] - center.get(a).copied().unwrap_or(0.0);
                    offset * offset
                })
                .sum()
        })
    }

    /// Riemann sum of a field over the whole periodic domain
    pub fn integrate(&self, field: &ArrayD<f64>) -> f64 {
        field.sum() * self.cell_volume()
    }

    /// Verify that `field` has the grid shape
    pub fn check_field(&self, name: &str, field: &ArrayD<f64>) -> SimulationResult<()> {
        if field.shape() != self.shape.as_slice() {
            return Err(SimulationError::shape_mismatch(name, &self.shape, field.shape()));
        }
        Ok(())
    }

    /// One-dimensional cut through the grid centre along `axis`
    ///
    /// Useful for quick inspection of 2D/3D fields.
    pub fn center_line(&self, field: &ArrayD<f64>, axis: usize) -> Vec<f64> {
        let mut view = field.view();
        for a in (0..self.ndim()).rev() {
            if a != axis {
                view = view.index_axis_move(Axis(a), self.shape[a] / 2);
            }
        }
        view.iter().copied().collect()
    }
}

// =================================================================================================
// Tests
// =================================================================================================
