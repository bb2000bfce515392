//! Scoped tracking and guaranteed release of run artifacts.
//!
//! Every file a run creates is registered at creation time and deleted
//! when the run ends, whatever exit path it takes. Intermediates go
//! first in reverse-creation order; the source goes last, so no
//! derivative ever outlives its already-deleted source.

use std::fs;
use std::path::{Path, PathBuf};

/// Tracks the artifacts of a single pipeline run.
///
/// `cleanup()` is called on every exit path of the run; the `Drop`
/// implementation is the backstop for panics and abandoned runs.
/// Deletion failures are logged and never escalated — they must not
/// mask the run's primary result.
#[derive(Debug)]
pub struct ArtifactTracker {
    source: PathBuf,
    intermediates: Vec<PathBuf>,
    released: bool,
}

impl ArtifactTracker {
    /// Start tracking a run whose source file will be deleted last.
    pub fn new(source: PathBuf) -> Self {
        Self {
            source,
            intermediates: Vec::new(),
            released: false,
        }
    }

    /// Register an intermediate artifact at creation time.
    ///
    /// The source path and duplicates are ignored, so there is exactly
    /// one deletion attempt per file.
    pub fn register(&mut self, path: PathBuf) {
        if path == self.source || self.intermediates.contains(&path) {
            return;
        }
        tracing::debug!("Tracking artifact: {}", path.display());
        self.intermediates.push(path);
    }

    /// Number of tracked intermediates.
    pub fn intermediate_count(&self) -> usize {
        self.intermediates.len()
    }

    /// Delete all registered artifacts: intermediates in
    /// reverse-creation order, then the source.
    pub fn cleanup(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        for path in self.intermediates.iter().rev() {
            remove_logged(path, "intermediate artifact");
        }
        remove_logged(&self.source, "source file");
    }
}

impl Drop for ArtifactTracker {
    fn drop(&mut self) {
        if !self.released {
            tracing::warn!("Run abandoned without cleanup; releasing artifacts from drop");
            self.cleanup();
        }
    }
}

fn remove_logged(path: &Path, what: &str) {
    if !path.exists() {
        return;
    }
    match fs::remove_file(path) {
        Ok(()) => tracing::info!("Deleted {}: {}", what, path.display()),
        Err(e) => tracing::warn!("Could not delete {} {}: {}", what, path.display(), e),
    }
}
