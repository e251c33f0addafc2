use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::NamedTempFile;

use super::types::Message;

/// `<identifier>.json`, with path separators replaced
pub fn export_file_name(message: &Message) -> String {
    let safe: String = message
        .identifier()
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | '\0') { '_' } else { c })
        .collect();
    format!("{}.json", safe)
}

/// Write the full message as pretty-printed JSON into `dir`.
/// The file is written to a temp file first and renamed into place.
pub fn export_message(message: &Message, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    let json = serde_json::to_string_pretty(message)?;
    let path = dir.join(export_file_name(message));

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(json.as_bytes())?;
    tmp.write_all(b"\n")?;
    tmp.persist(&path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    log::info!("exported {} to {}", message.identifier(), path.display());
    Ok(path)
}
