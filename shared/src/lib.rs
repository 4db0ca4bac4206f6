//! Shared types and analysis core for the Environmental Audit platform
//!
//! This crate holds everything deterministic about an audit run: the NDVI
//! calculator, the synthetic demo series, the rule-based risk classifier and
//! the validation applied to untrusted AI output. It is used by the backend
//! server and compiled to WASM for the dashboard.

pub mod models;
pub mod synthetic;
pub mod types;
pub mod validation;

pub use models::*;
pub use synthetic::*;
pub use types::*;
pub use validation::*;
