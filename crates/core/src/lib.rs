//! Domain logic for the benefit estimator.
//!
//! Pure input parsing/validation, accuracy metric derivation, and the
//! subprocess runner used to launch the external estimator script.
//! No HTTP or database types leak into this crate.

pub mod error;
pub mod input;
pub mod metrics;
pub mod runner;
pub mod types;
