use std::path::Path;

use crate::error::Result;
use crate::output::{self, Format};
use crate::store::db::Db;

pub fn add(root: &Path, name: String, format: Format) -> Result<()> {
    let db = Db::open_workspace(root)?;
    let member = db.create_member(&name)?;
    output::print_member(&member, format)
}

pub fn list(root: &Path, format: Format) -> Result<()> {
    let db = Db::open_workspace(root)?;
    let members = db.list_members()?;
    output::print_members(&members, format)
}
