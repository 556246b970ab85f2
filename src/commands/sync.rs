use std::path::Path;

use uuid::Uuid;

use crate::error::Result;
use crate::output::{self, Format};
use crate::progress;
use crate::store::db::Db;

/// Explicitly resynchronize one project's derived fields from its tasks.
pub fn run(root: &Path, project_id: Uuid, format: Format) -> Result<()> {
    let db = Db::open_workspace(root)?;
    let update = progress::recompute_project_progress(&db, project_id)?;
    output::print_progress_update(&update, format)
}
