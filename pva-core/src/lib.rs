//! Core types for PV plant performance analysis.
//!
//! Daily climate records come from the NASA POWER API (behind the `api`
//! feature), daily generation records from the plant's energy-meter export.
//! Both are joined into [`unified::UnifiedRecord`]s downstream.

pub mod climate;
pub mod date_range;
pub mod error;
pub mod generation;
#[cfg(feature = "api")]
pub mod power;
pub mod sentinel;
pub mod unified;

pub use error::{PvaError, Result};
