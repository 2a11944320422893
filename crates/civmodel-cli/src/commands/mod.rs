//! CLI command implementations.

pub mod init;
pub mod run;
pub mod scan;
pub mod presets;

use anyhow::Result;
use std::path::Path;

/// Output format chosen from a file extension; JSON unless it ends in `.csv`.
pub(crate) fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map_or(false, |e| e.eq_ignore_ascii_case("csv"))
}

pub(crate) fn write_text(path: &Path, content: &str) -> Result<()> {
    use anyhow::Context;
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}
