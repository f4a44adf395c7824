//! exohelp core: units, physics formulas, label metadata and the data layer.
//!
//! This crate contains everything below the loaders:
//! - Unit enums and unit-tagged quantities
//! - Physical constants (IAU / CODATA values)
//! - Bulk density and radial-velocity minimum mass
//! - Display metadata for archive columns
//! - Table sources, the CSV snapshot cache, and table canonicalization

pub mod constants;
pub mod data;
pub mod labels;
pub mod physics;
pub mod units;

pub use labels::{ColumnLabel, LabelTable};
pub use physics::DomainError;
pub use units::{Measure, Quantity};
