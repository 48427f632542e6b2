//! Infrastructure layer module
//!
//! This module contains the infrastructure pieces around the harvest
//! pipeline:
//! - Configuration management
//! - Logging infrastructure
//! - Storage of the issues document

pub mod config;
pub mod logging;
pub mod storage;
