//! Domain layer for the issue harvester
//!
//! This module contains the canonical data model, the error taxonomy and
//! the port traits used by the adapters.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{HarvestError, HarvestResult};
