use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CoreError, Result};

pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// How a score equal to the similarity threshold is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdBoundary {
    /// Reject only scores strictly below the threshold.
    #[default]
    Inclusive,
    /// Require scores strictly above the threshold.
    Exclusive,
}

impl ThresholdBoundary {
    pub fn accepts(self, score: f32, threshold: f32) -> bool {
        match self {
            Self::Inclusive => score >= threshold,
            Self::Exclusive => score > threshold,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub job_role_similarity_threshold: f32,
    pub similarity_backend: String,
    pub threshold_boundary: ThresholdBoundary,
    pub min_competencies: usize,
    pub max_competencies: usize,
    pub data_dir: PathBuf,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            job_role_similarity_threshold: 0.85,
            similarity_backend: "flat".into(),
            threshold_boundary: ThresholdBoundary::Inclusive,
            min_competencies: 3,
            max_competencies: 5,
            data_dir: default_data_dir(),
        }
    }
}

impl AnalyzerConfig {
    /// Load from a YAML file. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "config file absent, using defaults");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        let value: serde_yaml::Value = serde_yaml::from_str(text)?;
        let config = match value {
            serde_yaml::Value::Null => Self::default(),
            serde_yaml::Value::Mapping(_) => serde_yaml::from_value::<Self>(value)?,
            _ => {
                return Err(CoreError::InvalidConfig(
                    "configuration file must contain a mapping at the root level".into(),
                ))
            }
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let t = self.job_role_similarity_threshold;
        if !(0.0..=1.0).contains(&t) {
            return Err(CoreError::InvalidConfig(format!(
                "job_role_similarity_threshold must be within [0, 1], got {t}"
            )));
        }
        if self.min_competencies > self.max_competencies {
            return Err(CoreError::InvalidConfig(format!(
                "min_competencies ({}) exceeds max_competencies ({})",
                self.min_competencies, self.max_competencies
            )));
        }
        Ok(())
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.job_role_similarity_threshold = threshold;
        self
    }

    pub fn with_backend(mut self, backend: impl Into<String>) -> Self {
        self.similarity_backend = backend.into();
        self
    }

    pub fn with_boundary(mut self, boundary: ThresholdBoundary) -> Self {
        self.threshold_boundary = boundary;
        self
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Whether `score` clears the configured threshold.
    pub fn is_match(&self, score: f32) -> bool {
        self.threshold_boundary
            .accepts(score, self.job_role_similarity_threshold)
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("job-role-analyzer")
}
