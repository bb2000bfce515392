//! Orphaned temp-file sweep.
//!
//! Runs guarantee their own cleanup, but a crashed process can leave
//! artifacts behind. The caller runs this sweep periodically (or at
//! startup) against the temp root to reclaim files older than a cutoff.

use std::fs;
use std::io;
use std::path::Path;
use std::time::{Duration, SystemTime};

/// Default cutoff: anything older than an hour is an orphan.
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(60 * 60);

/// Result of one sweep pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepStats {
    /// Files removed.
    pub removed_files: usize,
    /// Bytes reclaimed.
    pub removed_bytes: u64,
    /// Entries that could not be statted or removed.
    pub skipped: usize,
}

/// Delete regular files under `temp_root` whose modification time is
/// older than `max_age`.
///
/// Creates the directory if missing. Subdirectories are left alone;
/// per-file errors are logged and counted, never escalated.
pub fn sweep_orphans(temp_root: &Path, max_age: Duration) -> io::Result<SweepStats> {
    fs::create_dir_all(temp_root)?;

    let now = SystemTime::now();
    let mut stats = SweepStats::default();

    for entry in fs::read_dir(temp_root)? {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!("Could not read temp entry: {}", e);
                stats.skipped += 1;
                continue;
            }
        };

        let path = entry.path();
        let metadata = match entry.metadata() {
            Ok(m) if m.is_file() => m,
            Ok(_) => continue,
            Err(e) => {
                tracing::warn!("Could not stat {}: {}", path.display(), e);
                stats.skipped += 1;
                continue;
            }
        };

        let age = metadata
            .modified()
            .ok()
            .and_then(|mtime| now.duration_since(mtime).ok())
            .unwrap_or(Duration::ZERO);

        if age <= max_age {
            continue;
        }

        let size = metadata.len();
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::info!(
                    "Removed orphaned temp file: {} ({} bytes)",
                    path.display(),
                    size
                );
                stats.removed_files += 1;
                stats.removed_bytes += size;
            }
            Err(e) => {
                tracing::warn!("Could not remove {}: {}", path.display(), e);
                stats.skipped += 1;
            }
        }
    }

    if stats.removed_files > 0 {
        tracing::info!(
            "Sweep finished: removed {} files, reclaimed {} bytes",
            stats.removed_files,
            stats.removed_bytes
        );
    } else {
        tracing::debug!("Sweep finished: no orphaned files");
    }

    Ok(stats)
}
