use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::ConvertError;

/// Lists the `*.xml` files directly inside `dir`, sorted by path.
///
/// Entries that cannot be read are skipped.
pub fn discover_xml_files(dir: &Path) -> Result<Vec<PathBuf>, ConvertError> {
    let escaped = glob::Pattern::escape(&dir.to_string_lossy());
    let pattern = Path::new(&escaped).join("*.xml");
    info!(pattern = %pattern.display(), "Searching for XML files");

    let mut files = Vec::new();
    for entry in glob::glob(&pattern.to_string_lossy())? {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(path) => warn!(path = %path.display(), "Skipping non-file match"),
            Err(e) => warn!(error = ?e, "Skipping unreadable entry"),
        }
    }
    files.sort();

    info!(dir = %dir.display(), count = files.len(), "XML discovery finished");
    Ok(files)
}
