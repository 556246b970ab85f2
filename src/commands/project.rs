use std::path::Path;

use uuid::Uuid;

use crate::error::Result;
use crate::model::ProjectStatus;
use crate::output::{self, Format};
use crate::store::db::Db;
use crate::store::projects::ProjectPatch;

pub fn add(root: &Path, name: String, status: Option<ProjectStatus>, format: Format) -> Result<()> {
    let db = Db::open_workspace(root)?;
    let project = db.create_project(&name, status)?;
    output::print_project(&project, format)
}

pub fn list(root: &Path, format: Format) -> Result<()> {
    let db = Db::open_workspace(root)?;
    let projects = db.list_projects()?;
    output::print_projects(&projects, format)
}

pub fn show(root: &Path, id: Uuid, format: Format) -> Result<()> {
    let db = Db::open_workspace(root)?;
    let project = db.get_project(id)?;
    output::print_project(&project, format)
}

pub fn edit(
    root: &Path,
    id: Uuid,
    name: Option<String>,
    status: Option<ProjectStatus>,
    progress: Option<u8>,
    format: Format,
) -> Result<()> {
    let db = Db::open_workspace(root)?;
    let project = db.update_project(
        id,
        ProjectPatch {
            name,
            status,
            progress,
        },
    )?;
    output::print_project(&project, format)
}

pub fn delete(root: &Path, id: Uuid, format: Format) -> Result<()> {
    let db = Db::open_workspace(root)?;
    db.delete_project(id)?;
    match format {
        Format::Json => println!("{}", serde_json::json!({ "deleted": id })),
        _ => println!("deleted {id}"),
    }
    Ok(())
}
