//! Domain models for the Environmental Audit platform

mod assessment;
mod environment;
mod observation;
mod report;

pub use assessment::*;
pub use environment::*;
pub use observation::*;
pub use report::*;
