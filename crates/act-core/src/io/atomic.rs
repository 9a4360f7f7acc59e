//! Write-to-temp-then-rename for config, task, and inbox files.
//!
//! Mirrors the original `_replace_with_retry` / `write_config` pair: write the
//! new bytes to a sibling temp file, fsync it, then rename over the target.
//! On Windows a rename that loses to a concurrent reader with the file open
//! can fail with a sharing violation, so the rename itself gets the same
//! exponential backoff as lock acquisition. On Unix `rename` is already
//! atomic and essentially never fails once the temp file exists, but the
//! retry loop costs nothing to keep uniform across platforms.

use crate::io::error::StoreError;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::time::Duration;

const RENAME_MAX_RETRIES: u32 = 5;

/// Serialize-then-write `bytes` to `path` atomically.
///
/// Leaves no `*.tmp` sibling behind on any error path: the temp file is
/// removed if the write or the final rename fails.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let dir = path.parent().ok_or_else(|| StoreError::InvalidPath(path.to_path_buf()))?;
    fs::create_dir_all(dir).map_err(|e| StoreError::Io { path: dir.to_path_buf(), source: e })?;

    let tmp_path = dir.join(format!(
        ".{}.tmp-{}",
        path.file_name().and_then(|n| n.to_str()).unwrap_or("atomic"),
        std::process::id()
    ));

    let write_result = (|| -> Result<(), StoreError> {
        let mut file = File::create(&tmp_path).map_err(|e| StoreError::Io {
            path: tmp_path.clone(),
            source: e,
        })?;
        file.write_all(bytes).map_err(|e| StoreError::Io {
            path: tmp_path.clone(),
            source: e,
        })?;
        file.sync_all().map_err(|e| StoreError::Io {
            path: tmp_path.clone(),
            source: e,
        })?;
        Ok(())
    })();

    if let Err(e) = write_result {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }

    for attempt in 0..=RENAME_MAX_RETRIES {
        match fs::rename(&tmp_path, path) {
            Ok(()) => return Ok(()),
            Err(e) if attempt < RENAME_MAX_RETRIES && is_retryable(&e) => {
                let wait_ms = 50u64 * (1 << attempt);
                std::thread::sleep(Duration::from_millis(wait_ms));
            }
            Err(e) => {
                let _ = fs::remove_file(&tmp_path);
                return Err(StoreError::Io { path: path.to_path_buf(), source: e });
            }
        }
    }
    unreachable!("loop either returns Ok or Err on the final attempt")
}

#[cfg(windows)]
fn is_retryable(e: &std::io::Error) -> bool {
    e.kind() == std::io::ErrorKind::PermissionDenied
}

#[cfg(not(windows))]
fn is_retryable(_e: &std::io::Error) -> bool {
    false
}
