//! Atomic emission of executable files
//!
//! Generated servers and wrappers are written to a hidden sibling temp file,
//! marked executable, then renamed over the destination. Readers of the
//! output directory never observe a half-written script.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::GenResult;

/// Removes the temp file if emission aborts before the rename.
struct TempGuard {
    path: PathBuf,
    armed: bool,
}

impl TempGuard {
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for TempGuard {
    fn drop(&mut self) {
        if self.armed {
            let _ = fs::remove_file(&self.path);
        }
    }
}

/// Write `content` to `path` atomically and mark it executable
///
/// Parent directories are created as needed.
///
/// # Errors
///
/// Returns an IO error if any filesystem step fails; a partially written temp
/// file is cleaned up on the way out.
pub fn write_executable(path: &Path, content: &str) -> GenResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "out".to_string());
    let tmp_path = path.with_file_name(format!(".{file_name}.tmp"));

    let mut guard = TempGuard {
        path: tmp_path.clone(),
        armed: true,
    };

    fs::write(&tmp_path, content)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&tmp_path, fs::Permissions::from_mode(0o755))?;
    }

    fs::rename(&tmp_path, path)?;
    guard.disarm();
    Ok(())
}
