// ─────────────────────────────────────────────────────────────────────
// Resonance Kernel — JSON Export
// ─────────────────────────────────────────────────────────────────────
//! Hand-off of reports and sweep rows to presentation layers. An export
//! failure is logged and reported as `false`; it never aborts the
//! simulation that produced the data.

use std::fs;
use std::path::Path;

use serde::Serialize;

/// Write `value` as pretty JSON to `path`, creating parent directories.
/// Returns whether the file was written.
pub fn write_json<T: Serialize + ?Sized>(path: impl AsRef<Path>, value: &T) -> bool {
    let path = path.as_ref();
    let json = match serde_json::to_string_pretty(value) {
        Ok(json) => json,
        Err(e) => {
            log::warn!("export skipped, cannot serialise {}: {e}", path.display());
            return false;
        }
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = fs::create_dir_all(parent) {
            log::warn!("export skipped, cannot create {}: {e}", parent.display());
            return false;
        }
    }
    match fs::write(path, json) {
        Ok(()) => {
            log::debug!("exported {}", path.display());
            true
        }
        Err(e) => {
            log::warn!("export skipped, cannot write {}: {e}", path.display());
            false
        }
    }
}
