use chrono::Utc;
use rusqlite::{Row, params};
use uuid::Uuid;

use crate::error::{Result, TallyError};
use crate::model::{MAX_TASK_NAME_LEN, Task, validate_name};
use crate::progress;
use crate::store::db::{Db, id_from_column, timestamp_from_column};

/// Tasks counted for one project, split by completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskCounts {
    pub total: u64,
    pub completed: u64,
}

/// Optional field updates for a task edit.
///
/// `team_member_id` distinguishes "leave as-is" (`None`) from "unassign"
/// (`Some(None)`). Only a patched `is_complete` triggers a progress
/// recompute; renames and reassignment never do.
#[derive(Debug, Default, Clone)]
pub struct TaskPatch {
    pub name: Option<String>,
    pub is_complete: Option<bool>,
    pub team_member_id: Option<Option<Uuid>>,
}

impl Db {
    /// Create a task attached to an existing project. The project's progress
    /// is recomputed in the same transaction: a new incomplete task changes
    /// the denominator.
    pub fn create_task(
        &self,
        project_id: Uuid,
        name: &str,
        team_member_id: Option<Uuid>,
    ) -> Result<Task> {
        let name = validate_name("task", name, MAX_TASK_NAME_LEN)?;
        let tx = self.conn().unchecked_transaction()?;

        self.get_project(project_id)?;
        if let Some(member_id) = team_member_id {
            if self.find_member(member_id)?.is_none() {
                return Err(TallyError::MemberNotFound(member_id));
            }
        }

        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            name,
            is_complete: false,
            project_id,
            team_member_id,
            created_at: now,
            updated_at: now,
        };
        self.conn().execute(
            "INSERT INTO tasks (id, name, is_complete, project_id, team_member_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                task.id.to_string(),
                task.name,
                task.is_complete,
                task.project_id.to_string(),
                task.team_member_id.map(|id| id.to_string()),
                task.created_at.to_rfc3339(),
                task.updated_at.to_rfc3339(),
            ],
        )?;

        progress::recompute_project_progress(self, project_id)?;
        tx.commit()?;
        Ok(task)
    }

    pub fn find_task(&self, id: Uuid) -> Result<Option<Task>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, name, is_complete, project_id, team_member_id, created_at, updated_at
             FROM tasks WHERE id = ?1",
        )?;
        let result = stmt.query_row(params![id.to_string()], row_to_task);
        match result {
            Ok(task) => Ok(Some(task)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn get_task(&self, id: Uuid) -> Result<Task> {
        self.find_task(id)?.ok_or(TallyError::TaskNotFound(id))
    }

    /// List a project's tasks, oldest first.
    pub fn list_tasks(&self, project_id: Uuid) -> Result<Vec<Task>> {
        self.get_project(project_id)?;
        let mut stmt = self.conn().prepare(
            "SELECT id, name, is_complete, project_id, team_member_id, created_at, updated_at
             FROM tasks WHERE project_id = ?1 ORDER BY created_at, id",
        )?;
        let tasks = stmt
            .query_map(params![project_id.to_string()], row_to_task)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    pub fn update_task(&self, id: Uuid, patch: TaskPatch) -> Result<Task> {
        let tx = self.conn().unchecked_transaction()?;
        let mut task = self.get_task(id)?;

        if let Some(name) = patch.name {
            task.name = validate_name("task", &name, MAX_TASK_NAME_LEN)?;
        }
        if let Some(member) = patch.team_member_id {
            if let Some(member_id) = member {
                if self.find_member(member_id)?.is_none() {
                    return Err(TallyError::MemberNotFound(member_id));
                }
            }
            task.team_member_id = member;
        }
        let completion_changed = patch.is_complete.is_some();
        if let Some(is_complete) = patch.is_complete {
            task.is_complete = is_complete;
        }
        task.updated_at = Utc::now();

        self.conn().execute(
            "UPDATE tasks SET name = ?1, is_complete = ?2, team_member_id = ?3, updated_at = ?4
             WHERE id = ?5",
            params![
                task.name,
                task.is_complete,
                task.team_member_id.map(|m| m.to_string()),
                task.updated_at.to_rfc3339(),
                task.id.to_string(),
            ],
        )?;

        if completion_changed {
            progress::recompute_project_progress(self, task.project_id)?;
        }
        tx.commit()?;
        Ok(task)
    }

    /// Delete a task and recompute its project's progress in the same
    /// transaction.
    pub fn delete_task(&self, id: Uuid) -> Result<()> {
        let tx = self.conn().unchecked_transaction()?;
        let task = self.get_task(id)?;

        self.conn()
            .execute("DELETE FROM tasks WHERE id = ?1", params![id.to_string()])?;
        progress::recompute_project_progress(self, task.project_id)?;
        tx.commit()?;
        Ok(())
    }

    /// Count a project's tasks split by completion. Assignment state is
    /// irrelevant here; every task counts exactly once.
    pub fn count_tasks_by_project(&self, project_id: Uuid) -> Result<TaskCounts> {
        let mut stmt = self.conn().prepare(
            "SELECT COUNT(*), COALESCE(SUM(is_complete), 0)
             FROM tasks WHERE project_id = ?1",
        )?;
        let counts = stmt.query_row(params![project_id.to_string()], |row| {
            Ok(TaskCounts {
                total: row.get(0)?,
                completed: row.get(1)?,
            })
        })?;
        Ok(counts)
    }
}

fn row_to_task(row: &Row<'_>) -> rusqlite::Result<Task> {
    let member: Option<String> = row.get(4)?;
    Ok(Task {
        id: id_from_column(0, row.get(0)?)?,
        name: row.get(1)?,
        is_complete: row.get(2)?,
        project_id: id_from_column(3, row.get(3)?)?,
        team_member_id: member.map(|raw| id_from_column(4, raw)).transpose()?,
        created_at: timestamp_from_column(5, row.get(5)?)?,
        updated_at: timestamp_from_column(6, row.get(6)?)?,
    })
}
