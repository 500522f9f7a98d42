use std::{fs, path::PathBuf};

use anyhow::Context;

use crate::error::Error;

/// Read a migration file from `migration/postgresql/`.
pub fn get_path(dir: &str, file: &str) -> Result<String, Error> {
    let mut buf = PathBuf::new();

    for chunk in [dir, "migration", "postgresql", file] {
        buf.push(chunk);
    }

    let data = fs::read_to_string(&buf)
        .with_context(|| format!("missing migration file {}", buf.display()))?;

    Ok(data)
}
