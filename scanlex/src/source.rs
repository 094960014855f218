use crate::error::SourceError;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Reads a whole file into memory for scanning.
///
/// Open and read failures are returned, never reported by exiting, so the
/// caller decides how to surface them.
pub fn read_source(path: impl AsRef<Path>) -> Result<String, SourceError> {
    let path = path.as_ref();
    let mut file = File::open(path).map_err(|source| SourceError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut text = String::new();
    file.read_to_string(&mut text)
        .map_err(|source| SourceError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    debug!(path = %path.display(), bytes = text.len(), "read source");
    Ok(text)
}
