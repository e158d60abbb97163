//! Pension Engine library crate.
//!
//! This crate estimates a monthly pension under a points-based
//! formula from a birth date and a list of contribution periods.
//! External applications may depend on the `pension_engine` crate and
//! call [`engine::compute_pension`] directly, or [`engine::recompute`]
//! whenever their form state changes.

pub mod cli;
pub mod clock;
pub mod engine;
pub mod error;
pub mod formula;
pub mod models;
pub mod points;
pub mod stability;
pub mod summary;

pub use engine::{compute_many, compute_pension, recompute};
pub use error::PensionError;
pub use formula::FormulaConfig;
pub use models::{ContributionPeriod, PensionDetails, PensionInputs, PensionResult};
