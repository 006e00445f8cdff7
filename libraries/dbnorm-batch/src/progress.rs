//! Progress reporting and cancellation

use crate::result::{BatchResult, FileStatus};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Progress updates sent while a batch runs
#[derive(Debug, Clone)]
pub enum BatchProgress {
    /// Output directory is ready, processing begins
    Started { total: usize },

    /// A file entered the pipeline (`index` is zero-based)
    FileStarted {
        index: usize,
        total: usize,
        path: PathBuf,
    },

    /// A file left the pipeline
    FileFinished {
        index: usize,
        path: PathBuf,
        status: FileStatus,
    },

    /// Batch finished
    Completed { result: BatchResult },
}

/// Cooperative cancellation flag checked before each file
///
/// Clones share the same flag. Files already in the pipeline finish.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create an untriggered token
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Check if cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let token = CancellationToken::new();
        let other = token.clone();
        assert!(!other.is_cancelled());
        token.cancel();
        assert!(other.is_cancelled());
    }
}
