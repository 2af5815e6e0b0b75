//! JSON rendering for extraction results.

use std::io::Write;
use std::path::Path;

use tempfile::{Builder, NamedTempFile};

use crate::error::{Error, Result};
use crate::model::Extraction;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with two-space indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert an extraction result to JSON. Non-ASCII text is kept as-is.
pub fn to_json(extraction: &Extraction, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(extraction),
        JsonFormat::Compact => serde_json::to_string(extraction),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Read back a result previously written by [`to_json`].
pub fn from_json(json: &str) -> Result<Extraction> {
    Ok(serde_json::from_str(json)?)
}

/// Write JSON to `path`, replacing any existing file.
///
/// The data goes to a temporary file in the same directory first, so a
/// failed run never leaves a truncated file behind. An existing file keeps
/// its permissions; a new one gets the usual umask-filtered mode.
pub fn write_json<P: AsRef<Path>>(extraction: &Extraction, path: P, format: JsonFormat) -> Result<()> {
    let path = path.as_ref();
    let json = to_json(extraction, format)?;

    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut file = temp_file_in(dir)?;
    file.write_all(json.as_bytes())?;
    file.flush()?;
    if let Ok(existing) = std::fs::metadata(path) {
        file.as_file().set_permissions(existing.permissions())?;
    }
    file.persist(path).map_err(|e| Error::Io(e.error))?;

    log::debug!("Wrote {} bytes to {}", json.len(), path.display());
    Ok(())
}

#[cfg(unix)]
fn temp_file_in(dir: &Path) -> std::io::Result<NamedTempFile> {
    use std::os::unix::fs::PermissionsExt;

    Builder::new()
        .permissions(std::fs::Permissions::from_mode(0o666))
        .tempfile_in(dir)
}

#[cfg(not(unix))]
fn temp_file_in(dir: &Path) -> std::io::Result<NamedTempFile> {
    Builder::new().tempfile_in(dir)
}
