//! LLM collaborator contract and competency payload parsing.

use std::fmt;

use async_trait::async_trait;
use jr_core::Competency;
use serde_json::Value;
use tracing::debug;

use crate::error::{AnalyzerError, Result};

/// Prompts used by the extraction pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptKind {
    /// Rewrite a raw description into a normalized role summary.
    NormalizeJd,
    /// Produce a JSON array of `{name, level, type}` competencies.
    ExtractCompetencies,
}

impl PromptKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::NormalizeJd => "normalize_jd",
            Self::ExtractCompetencies => "extract_competencies",
        }
    }
}

impl fmt::Display for PromptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Renders a prompt with `vars` and returns the raw completion text.
#[async_trait]
pub trait LlmInterface: Send + Sync {
    async fn run_prompt(&self, prompt: PromptKind, vars: &Value) -> anyhow::Result<String>;
}

/// Parse an `extract_competencies` completion.
///
/// The payload must be a JSON array. Fewer than `min` entries is an error;
/// entries beyond `max` are dropped.
pub fn parse_competencies(payload: &str, min: usize, max: usize) -> Result<Vec<Competency>> {
    let value: Value = serde_json::from_str(payload.trim()).map_err(|e| {
        AnalyzerError::CompetencyPayload(format!("response must be valid JSON: {e}"))
    })?;
    let Value::Array(entries) = value else {
        return Err(AnalyzerError::CompetencyPayload(
            "competency payload must be a sequence of objects".into(),
        ));
    };

    let mut competencies = entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| {
            Competency::from_value(entry).map_err(|e| {
                AnalyzerError::CompetencyPayload(format!("entry {i}: {e}"))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    if competencies.len() < min {
        return Err(AnalyzerError::CompetencyPayload(format!(
            "at least {min} competencies are required; received {}",
            competencies.len()
        )));
    }
    if competencies.len() > max {
        debug!(received = competencies.len(), max, "truncating competencies");
        competencies.truncate(max);
    }
    Ok(competencies)
}
