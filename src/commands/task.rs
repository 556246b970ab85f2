use std::path::Path;

use uuid::Uuid;

use crate::error::Result;
use crate::output::{self, Format};
use crate::store::db::Db;
use crate::store::tasks::TaskPatch;

pub fn add(
    root: &Path,
    project_id: Uuid,
    name: String,
    member: Option<Uuid>,
    format: Format,
) -> Result<()> {
    let db = Db::open_workspace(root)?;
    let task = db.create_task(project_id, &name, member)?;
    output::print_task(&task, format)
}

pub fn list(root: &Path, project_id: Uuid, format: Format) -> Result<()> {
    let db = Db::open_workspace(root)?;
    let tasks = db.list_tasks(project_id)?;
    output::print_tasks(&tasks, format)
}

pub fn show(root: &Path, id: Uuid, format: Format) -> Result<()> {
    let db = Db::open_workspace(root)?;
    let task = db.get_task(id)?;
    output::print_task(&task, format)
}

/// Rename and/or reassign. Neither change touches project progress.
pub fn edit(
    root: &Path,
    id: Uuid,
    name: Option<String>,
    member: Option<Uuid>,
    unassign: bool,
    format: Format,
) -> Result<()> {
    let db = Db::open_workspace(root)?;
    let team_member_id = if unassign {
        Some(None)
    } else {
        member.map(Some)
    };
    let task = db.update_task(
        id,
        TaskPatch {
            name,
            is_complete: None,
            team_member_id,
        },
    )?;
    output::print_task(&task, format)
}

pub fn set_complete(root: &Path, id: Uuid, is_complete: bool, format: Format) -> Result<()> {
    let db = Db::open_workspace(root)?;
    let task = db.update_task(
        id,
        TaskPatch {
            is_complete: Some(is_complete),
            ..Default::default()
        },
    )?;
    output::print_task(&task, format)
}

pub fn delete(root: &Path, id: Uuid, format: Format) -> Result<()> {
    let db = Db::open_workspace(root)?;
    db.delete_task(id)?;
    match format {
        Format::Json => println!("{}", serde_json::json!({ "deleted": id })),
        _ => println!("deleted {id}"),
    }
    Ok(())
}
