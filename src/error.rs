use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum TallyError {
    #[error("not a tally workspace (run `tally init` first)")]
    NotInitialized,

    #[error("tally already initialized in this directory")]
    AlreadyInitialized,

    #[error("project {0} not found")]
    ProjectNotFound(Uuid),

    #[error("task {0} not found")]
    TaskNotFound(Uuid),

    #[error("team member {0} not found")]
    MemberNotFound(Uuid),

    #[error("invalid {0} name: {1}")]
    InvalidName(&'static str, String),

    #[error("progress must be between 0 and 100, got {0}")]
    InvalidProgress(i64),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Db(#[from] rusqlite::Error),
}

impl TallyError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotInitialized => "not_initialized",
            Self::AlreadyInitialized => "already_initialized",
            Self::ProjectNotFound(_) => "project_not_found",
            Self::TaskNotFound(_) => "task_not_found",
            Self::MemberNotFound(_) => "member_not_found",
            Self::InvalidName(_, _) => "invalid_name",
            Self::InvalidProgress(_) => "invalid_progress",
            Self::Io(_) => "io_error",
            Self::Json(_) => "json_error",
            Self::Db(_) => "db_error",
        }
    }
}

pub type Result<T> = std::result::Result<T, TallyError>;
