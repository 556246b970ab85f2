use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, TallyError};

pub const MAX_PROJECT_NAME_LEN: usize = 100;
pub const MAX_TASK_NAME_LEN: usize = 200;
pub const MAX_MEMBER_NAME_LEN: usize = 100;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[clap(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    InProgress,
    Completed,
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InProgress => write!(f, "in_progress"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub status: ProjectStatus,
    pub progress: u8,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: Uuid,
    pub name: String,
    pub is_complete: bool,
    pub project_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_member_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamMember {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Fixed-threshold classification of a member's assigned-task count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkloadLevel {
    Available,
    Light,
    Moderate,
    Heavy,
}

impl WorkloadLevel {
    /// Ordered tiers: 0 tasks, 1-2, 3-4, 5 or more.
    pub fn classify(task_count: u64) -> Self {
        match task_count {
            0 => Self::Available,
            1..=2 => Self::Light,
            3..=4 => Self::Moderate,
            _ => Self::Heavy,
        }
    }
}

impl std::fmt::Display for WorkloadLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available => write!(f, "available"),
            Self::Light => write!(f, "light"),
            Self::Moderate => write!(f, "moderate"),
            Self::Heavy => write!(f, "heavy"),
        }
    }
}

/// Trim a user-supplied name and enforce non-empty / max-length rules.
pub fn validate_name(kind: &'static str, raw: &str, max_len: usize) -> Result<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(TallyError::InvalidName(kind, "must not be empty".into()));
    }
    if name.chars().count() > max_len {
        return Err(TallyError::InvalidName(
            kind,
            format!("must be at most {max_len} characters"),
        ));
    }
    Ok(name.to_string())
}
