use std::path::Path;

use crate::error::Result;
use crate::output::Format;
use crate::store::db::{Db, WORKSPACE_DIR};

pub fn run(root: &Path, format: Format) -> Result<()> {
    Db::init(root)?;
    match format {
        Format::Json => println!(
            "{}",
            serde_json::json!({ "initialized": root.join(WORKSPACE_DIR) })
        ),
        _ => println!("initialized {}", root.join(WORKSPACE_DIR).display()),
    }
    Ok(())
}
