use chrono::Utc;
use rusqlite::types::Type;
use rusqlite::{Row, params};
use uuid::Uuid;

use crate::error::{Result, TallyError};
use crate::model::{MAX_PROJECT_NAME_LEN, Project, ProjectStatus, validate_name};
use crate::store::db::{Db, id_from_column, timestamp_from_column};

/// Optional field updates for a generic project edit.
///
/// A caller-supplied `progress` is stored as-is (manual override) and stands
/// until the next task mutation recomputes it; unless `status` is also given,
/// the status label is re-derived from the 100% rule.
#[derive(Debug, Default, Clone)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub status: Option<ProjectStatus>,
    pub progress: Option<u8>,
}

impl Db {
    pub fn create_project(&self, name: &str, status: Option<ProjectStatus>) -> Result<Project> {
        let now = Utc::now();
        let project = Project {
            id: Uuid::new_v4(),
            name: validate_name("project", name, MAX_PROJECT_NAME_LEN)?,
            status: status.unwrap_or_default(),
            progress: 0,
            created_at: now,
            updated_at: now,
        };
        self.conn().execute(
            "INSERT INTO projects (id, name, status, progress, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                project.id.to_string(),
                project.name,
                project.status.to_string(),
                project.progress,
                project.created_at.to_rfc3339(),
                project.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(project)
    }

    pub fn find_project(&self, id: Uuid) -> Result<Option<Project>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, name, status, progress, created_at, updated_at
             FROM projects WHERE id = ?1",
        )?;
        let result = stmt.query_row(params![id.to_string()], row_to_project);
        match result {
            Ok(project) => Ok(Some(project)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn get_project(&self, id: Uuid) -> Result<Project> {
        self.find_project(id)?
            .ok_or(TallyError::ProjectNotFound(id))
    }

    pub fn list_projects(&self) -> Result<Vec<Project>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, name, status, progress, created_at, updated_at
             FROM projects ORDER BY created_at DESC, id",
        )?;
        let projects = stmt
            .query_map([], row_to_project)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(projects)
    }

    pub fn update_project(&self, id: Uuid, patch: ProjectPatch) -> Result<Project> {
        let tx = self.conn().unchecked_transaction()?;
        let mut project = self.get_project(id)?;

        if let Some(name) = patch.name {
            project.name = validate_name("project", &name, MAX_PROJECT_NAME_LEN)?;
        }
        if let Some(progress) = patch.progress {
            if progress > 100 {
                return Err(TallyError::InvalidProgress(i64::from(progress)));
            }
            project.progress = progress;
            project.status = if progress == 100 {
                ProjectStatus::Completed
            } else {
                ProjectStatus::InProgress
            };
        }
        if let Some(status) = patch.status {
            project.status = status;
        }
        project.updated_at = Utc::now();

        self.conn().execute(
            "UPDATE projects SET name = ?1, status = ?2, progress = ?3, updated_at = ?4
             WHERE id = ?5",
            params![
                project.name,
                project.status.to_string(),
                project.progress,
                project.updated_at.to_rfc3339(),
                project.id.to_string(),
            ],
        )?;
        tx.commit()?;
        Ok(project)
    }

    /// Delete a project; its tasks go with it (FK cascade).
    pub fn delete_project(&self, id: Uuid) -> Result<()> {
        let rows = self
            .conn()
            .execute("DELETE FROM projects WHERE id = ?1", params![id.to_string()])?;
        if rows == 0 {
            return Err(TallyError::ProjectNotFound(id));
        }
        Ok(())
    }

    /// Overwrite only a project's derived fields. Reserved for the progress
    /// synchronizer; everything else on the row is left untouched.
    pub(crate) fn set_project_progress(
        &self,
        id: Uuid,
        progress: u8,
        status: ProjectStatus,
    ) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE projects SET progress = ?1, status = ?2, updated_at = ?3 WHERE id = ?4",
            params![
                progress,
                status.to_string(),
                Utc::now().to_rfc3339(),
                id.to_string(),
            ],
        )?;
        if rows == 0 {
            return Err(TallyError::ProjectNotFound(id));
        }
        Ok(())
    }
}

fn row_to_project(row: &Row<'_>) -> rusqlite::Result<Project> {
    Ok(Project {
        id: id_from_column(0, row.get(0)?)?,
        name: row.get(1)?,
        status: status_from_column(2, row.get(2)?)?,
        progress: row.get(3)?,
        created_at: timestamp_from_column(4, row.get(4)?)?,
        updated_at: timestamp_from_column(5, row.get(5)?)?,
    })
}

fn status_from_column(index: usize, raw: String) -> rusqlite::Result<ProjectStatus> {
    match raw.as_str() {
        "in_progress" => Ok(ProjectStatus::InProgress),
        "completed" => Ok(ProjectStatus::Completed),
        _ => Err(rusqlite::Error::FromSqlConversionFailure(
            index,
            Type::Text,
            format!("unknown project status: {raw}").into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_starts_at_zero_in_progress() {
        let db = Db::open_memory().unwrap();
        let project = db.create_project("Website refresh", None).unwrap();

        assert_eq!(project.progress, 0);
        assert_eq!(project.status, ProjectStatus::InProgress);

        let loaded = db.get_project(project.id).unwrap();
        assert_eq!(loaded, project);
    }

    #[test]
    fn create_trims_name_and_rejects_empty() {
        let db = Db::open_memory().unwrap();
        let project = db.create_project("  Launch  ", None).unwrap();
        assert_eq!(project.name, "Launch");

        let err = db.create_project("   ", None).unwrap_err();
        assert!(matches!(err, TallyError::InvalidName("project", _)));
    }

    #[test]
    fn list_is_newest_first() {
        let db = Db::open_memory().unwrap();
        let first = db.create_project("First", None).unwrap();
        let second = db.create_project("Second", None).unwrap();

        let names: Vec<String> = db
            .list_projects()
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Second", "First"]);
        assert!(second.created_at >= first.created_at);
    }

    #[test]
    fn get_missing_project_is_not_found() {
        let db = Db::open_memory().unwrap();
        let id = Uuid::new_v4();
        let err = db.get_project(id).unwrap_err();
        assert!(matches!(err, TallyError::ProjectNotFound(missing) if missing == id));
        assert!(db.find_project(id).unwrap().is_none());
    }

    #[test]
    fn manual_progress_override_derives_status() {
        let db = Db::open_memory().unwrap();
        let project = db.create_project("Launch", None).unwrap();

        let patch = ProjectPatch {
            progress: Some(100),
            ..Default::default()
        };
        let updated = db.update_project(project.id, patch).unwrap();
        assert_eq!(updated.progress, 100);
        assert_eq!(updated.status, ProjectStatus::Completed);

        let patch = ProjectPatch {
            progress: Some(40),
            ..Default::default()
        };
        let updated = db.update_project(project.id, patch).unwrap();
        assert_eq!(updated.progress, 40);
        assert_eq!(updated.status, ProjectStatus::InProgress);
    }

    #[test]
    fn explicit_status_wins_over_derived() {
        let db = Db::open_memory().unwrap();
        let project = db.create_project("Launch", None).unwrap();

        let patch = ProjectPatch {
            status: Some(ProjectStatus::Completed),
            progress: Some(40),
            ..Default::default()
        };
        let updated = db.update_project(project.id, patch).unwrap();
        assert_eq!(updated.progress, 40);
        assert_eq!(updated.status, ProjectStatus::Completed);
    }

    #[test]
    fn name_only_edit_leaves_derived_fields() {
        let db = Db::open_memory().unwrap();
        let project = db.create_project("Launch", None).unwrap();
        db.update_project(
            project.id,
            ProjectPatch {
                progress: Some(70),
                ..Default::default()
            },
        )
        .unwrap();

        let updated = db
            .update_project(
                project.id,
                ProjectPatch {
                    name: Some("Relaunch".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.name, "Relaunch");
        assert_eq!(updated.progress, 70);
        assert_eq!(updated.status, ProjectStatus::InProgress);
    }

    #[test]
    fn delete_missing_project_is_not_found() {
        let db = Db::open_memory().unwrap();
        let err = db.delete_project(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, TallyError::ProjectNotFound(_)));
    }

    #[test]
    fn set_progress_touches_only_derived_fields() {
        let db = Db::open_memory().unwrap();
        let project = db.create_project("Launch", None).unwrap();

        db.set_project_progress(project.id, 100, ProjectStatus::Completed)
            .unwrap();
        let loaded = db.get_project(project.id).unwrap();
        assert_eq!(loaded.progress, 100);
        assert_eq!(loaded.status, ProjectStatus::Completed);
        assert_eq!(loaded.name, "Launch");
        assert_eq!(loaded.created_at, project.created_at);
    }
}
