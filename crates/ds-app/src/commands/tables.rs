//! `tables dump` — write the built-in rule tables document.

use anyhow::{Context, Result};
use ds_model::RiskTables;
use std::path::Path;

pub fn dump(output: Option<&Path>) -> Result<()> {
    let tables = RiskTables::builtin();
    let json = tables.to_json_pretty()?;
    match output {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), version = %tables.version, "tables written");
            eprintln!("Rule tables v{} written to {}", tables.version, path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
