pub mod output;
pub mod walker;

pub use output::{create_writer, OutputFormat, OutputSections, OutputWriter};
pub use walker::{is_test_file, FileKind, FileWalker};

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Write a value as pretty JSON, to `path` or to stdout.
pub fn write_json<T: Serialize>(value: &T, path: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match path {
        Some(path) => fs::write(path, json + "\n")
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            println!("{}", json);
            Ok(())
        }
    }
}
