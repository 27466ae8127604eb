use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, Result};

/// Dense embedding vector.
pub type Embedding = Vec<f32>;

/// Opaque identity of a persisted job role.
pub type RoleId = Uuid;

pub const DEFAULT_COMPETENCY_TYPE: &str = "technical";
pub const MIN_COMPETENCY_LEVEL: u8 = 1;
pub const MAX_COMPETENCY_LEVEL: u8 = 5;

/// Minimal descriptive record of a role, returned as a similarity match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRoleSummary {
    pub job_role_id: RoleId,
    pub job_title: String,
    pub normalized_summary: String,
    pub years_experience: u32,
}

impl JobRoleSummary {
    pub fn new(
        job_title: impl Into<String>,
        normalized_summary: impl Into<String>,
        years_experience: u32,
    ) -> Self {
        Self::with_id(Uuid::new_v4(), job_title, normalized_summary, years_experience)
    }

    pub fn with_id(
        job_role_id: RoleId,
        job_title: impl Into<String>,
        normalized_summary: impl Into<String>,
        years_experience: u32,
    ) -> Self {
        Self {
            job_role_id,
            job_title: job_title.into(),
            normalized_summary: normalized_summary.into(),
            years_experience,
        }
    }
}

/// A single competency extracted for a role.
///
/// Deserialization accepts `level` as an integer or a numeric string and
/// rejects anything outside 1..=5. A missing, null or empty `type` becomes
/// `"technical"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Competency {
    pub name: String,
    #[serde(deserialize_with = "deserialize_level")]
    pub level: u8,
    #[serde(
        rename = "type",
        default = "default_competency_type",
        deserialize_with = "deserialize_competency_type"
    )]
    pub kind: String,
}

impl Competency {
    pub fn new(name: impl Into<String>, level: u8, kind: Option<&str>) -> Result<Self> {
        if !(MIN_COMPETENCY_LEVEL..=MAX_COMPETENCY_LEVEL).contains(&level) {
            return Err(CoreError::Validation(format!(
                "level must be between {MIN_COMPETENCY_LEVEL} and {MAX_COMPETENCY_LEVEL}, got {level}"
            )));
        }
        Ok(Self {
            name: name.into(),
            level,
            kind: normalize_kind(kind.map(str::to_string)),
        })
    }

    /// Parse a competency from a loosely typed JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }
}

/// Full persisted record: role summary plus its competencies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRoleWithCompetencies {
    pub job_role: JobRoleSummary,
    pub competencies: Vec<Competency>,
}

impl JobRoleWithCompetencies {
    pub fn new(job_role: JobRoleSummary, competencies: Vec<Competency>) -> Self {
        Self { job_role, competencies }
    }

    pub fn id(&self) -> RoleId {
        self.job_role.job_role_id
    }
}

fn default_competency_type() -> String {
    DEFAULT_COMPETENCY_TYPE.to_string()
}

fn normalize_kind(kind: Option<String>) -> String {
    match kind {
        Some(k) if !k.is_empty() => k,
        _ => default_competency_type(),
    }
}

fn deserialize_competency_type<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(normalize_kind(raw))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LevelRepr {
    Int(i64),
    Text(String),
}

fn deserialize_level<'de, D>(deserializer: D) -> std::result::Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let level = match LevelRepr::deserialize(deserializer)
        .map_err(|_| D::Error::custom("level must be an integer between 1 and 5"))?
    {
        LevelRepr::Int(v) => v,
        LevelRepr::Text(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| D::Error::custom("level must be an integer between 1 and 5"))?,
    };
    if !(MIN_COMPETENCY_LEVEL as i64..=MAX_COMPETENCY_LEVEL as i64).contains(&level) {
        return Err(D::Error::custom("level must be between 1 and 5"));
    }
    Ok(level as u8)
}
