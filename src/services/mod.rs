//! Service layer coordinating the harvest pipeline.

pub mod harvest_service;

pub use harvest_service::{HarvestReport, HarvestService};
