//! Progress synchronizer: derives a project's `progress` percentage and
//! `status` label from its task population and persists them.
//!
//! Every completion-affecting task mutation (create, completion toggle,
//! delete) runs [`recompute_project_progress`] inside the same transaction as
//! the triggering write; plain renames and reassignment skip it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::model::ProjectStatus;
use crate::store::db::Db;
use crate::store::tasks::TaskCounts;

/// The derived fields written back to a project row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub progress: u8,
    pub status: ProjectStatus,
}

impl ProgressUpdate {
    pub fn from_counts(counts: TaskCounts) -> Self {
        let progress = percent(counts.completed, counts.total);
        let status = if progress == 100 {
            ProjectStatus::Completed
        } else {
            ProjectStatus::InProgress
        };
        Self { progress, status }
    }
}

/// Rounded completion percentage; 0 when there are no tasks.
pub fn percent(completed: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    ((completed as f64 / total as f64) * 100.0).round() as u8
}

/// Recompute and persist a project's `{progress, status}` from the current
/// task counts, overwriting whatever was stored (including manual overrides).
/// Unknown projects surface as `ProjectNotFound`; store failures propagate.
pub fn recompute_project_progress(db: &Db, project_id: Uuid) -> Result<ProgressUpdate> {
    let counts = db.count_tasks_by_project(project_id)?;
    let update = ProgressUpdate::from_counts(counts);
    db.set_project_progress(project_id, update.progress, update.status)?;
    Ok(update)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TallyError;
    use crate::store::tasks::TaskPatch;

    #[test]
    fn percent_rounds_half_up() {
        assert_eq!(percent(0, 0), 0);
        assert_eq!(percent(0, 3), 0);
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(1, 2), 50);
        assert_eq!(percent(1, 8), 13);
        assert_eq!(percent(1, 6), 17);
        assert_eq!(percent(5, 6), 83);
        assert_eq!(percent(3, 3), 100);
    }

    #[test]
    fn status_is_completed_iff_progress_is_100() {
        let update = ProgressUpdate::from_counts(TaskCounts {
            total: 4,
            completed: 4,
        });
        assert_eq!(update.progress, 100);
        assert_eq!(update.status, ProjectStatus::Completed);

        // 199/200 rounds to 99, safely below the completion threshold
        let update = ProgressUpdate::from_counts(TaskCounts {
            total: 200,
            completed: 199,
        });
        assert_eq!(update.progress, 99);
        assert_eq!(update.status, ProjectStatus::InProgress);

        let update = ProgressUpdate::from_counts(TaskCounts {
            total: 0,
            completed: 0,
        });
        assert_eq!(update.progress, 0);
        assert_eq!(update.status, ProjectStatus::InProgress);
    }

    #[test]
    fn recompute_persists_derived_fields() {
        let db = Db::open_memory().unwrap();
        let project = db.create_project("Launch", None).unwrap();
        let task = db.create_task(project.id, "Only", None).unwrap();
        db.update_task(
            task.id,
            TaskPatch {
                is_complete: Some(true),
                ..Default::default()
            },
        )
        .unwrap();

        let update = recompute_project_progress(&db, project.id).unwrap();
        assert_eq!(update.progress, 100);
        assert_eq!(update.status, ProjectStatus::Completed);

        let stored = db.get_project(project.id).unwrap();
        assert_eq!(stored.progress, update.progress);
        assert_eq!(stored.status, update.status);
    }

    #[test]
    fn recompute_is_idempotent() {
        let db = Db::open_memory().unwrap();
        let project = db.create_project("Launch", None).unwrap();
        db.create_task(project.id, "One", None).unwrap();
        let done = db.create_task(project.id, "Two", None).unwrap();
        db.update_task(
            done.id,
            TaskPatch {
                is_complete: Some(true),
                ..Default::default()
            },
        )
        .unwrap();

        let first = recompute_project_progress(&db, project.id).unwrap();
        let second = recompute_project_progress(&db, project.id).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.progress, 50);
    }

    #[test]
    fn recompute_for_unknown_project_is_not_found() {
        let db = Db::open_memory().unwrap();
        let err = recompute_project_progress(&db, Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, TallyError::ProjectNotFound(_)));
    }

    #[test]
    fn recompute_overwrites_manual_override() {
        let db = Db::open_memory().unwrap();
        let project = db.create_project("Launch", None).unwrap();
        db.create_task(project.id, "Only", None).unwrap();
        db.update_project(
            project.id,
            crate::store::projects::ProjectPatch {
                progress: Some(90),
                ..Default::default()
            },
        )
        .unwrap();

        let update = recompute_project_progress(&db, project.id).unwrap();
        assert_eq!(update.progress, 0);
        assert_eq!(db.get_project(project.id).unwrap().progress, 0);
    }
}
