//! Core types shared across the relation graph pipeline
//!
//! Value types, rendering configuration, error types and logging setup.

mod config;
mod error;
pub mod logging;
mod types;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use types::*;
