//! Version command implementation.

use crate::error::Result;
use serde::Serialize;

#[derive(Serialize)]
struct VersionOutput<'a> {
    version: &'a str,
    build: &'a str,
    schema_version: usize,
}

/// Execute the version command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn execute(json: bool) -> Result<()> {
    let version = env!("CARGO_PKG_VERSION");
    let build = if cfg!(debug_assertions) {
        "dev"
    } else {
        "release"
    };
    let schema_version = crate::storage::migrations::migration_count();

    if json {
        let output = VersionOutput {
            version,
            build,
            schema_version,
        };
        super::print_json(&output)?;
        return Ok(());
    }

    println!("tidy version {version} ({build}, schema {schema_version})");
    Ok(())
}
