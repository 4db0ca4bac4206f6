//! HTTP handlers for the Environmental Audit API

pub mod analysis;
pub mod health;

pub use analysis::*;
pub use health::*;
