use std::path::Path;

use crate::error::Result;
use crate::insights;
use crate::output::{self, Format};
use crate::store::db::Db;

pub fn tasks(root: &Path, format: Format) -> Result<()> {
    let db = Db::open_workspace(root)?;
    let insights = insights::task_insights(&db)?;
    output::print_task_insights(&insights, format)
}

pub fn team(root: &Path, format: Format) -> Result<()> {
    let db = Db::open_workspace(root)?;
    let insights = insights::team_insights(&db)?;
    output::print_team_insights(&insights, format)
}
