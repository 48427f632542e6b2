//! Port trait definitions (Hexagonal Architecture)
//!
//! - Sleeper: suspension used by rate-limit backoff
//!
//! Adapters depend on these traits so timing behaviour can be swapped out
//! in tests.

pub mod sleeper;

pub use sleeper::{RecordingSleeper, Sleeper, TokioSleeper};
