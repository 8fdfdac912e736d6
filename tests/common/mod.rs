//! Common utilities for integration tests

#![allow(dead_code)]

pub mod scenarios;
pub mod test_helpers;

// Re-export commonly used items
pub use scenarios::{gaussian_seed, nucleation_scenario, sinusoid};
pub use test_helpers::{assert_fields_close, center_index, l2_difference, relative_error};
