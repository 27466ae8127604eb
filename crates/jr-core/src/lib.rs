//! Shared records, configuration and errors for the job role analyzer.

pub mod config;
pub mod error;
pub mod types;

pub use config::{AnalyzerConfig, ThresholdBoundary};
pub use error::{CoreError, Result};
pub use types::{Competency, Embedding, JobRoleSummary, JobRoleWithCompetencies, RoleId};
