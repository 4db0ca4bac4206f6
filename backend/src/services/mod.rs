//! Business logic services for the Environmental Audit service

pub mod analysis;
pub mod assessment;
pub mod certificate;
pub mod environment;
pub mod fallback;
pub mod observations;

pub use analysis::{AnalysisService, ProviderStatus};
pub use certificate::{certificate_filename, render_certificate};
