use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Root scratch directory for extracted frames.
pub fn scratch_root() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("jumpsafe")
}

/// A fresh, uniquely named directory for one pipeline run.
pub fn run_dir() -> PathBuf {
    scratch_root().join(Uuid::new_v4().to_string())
}

/// Where the frame extracted at `timestamp_secs` is written.
pub fn frame_path(run_dir: &Path, timestamp_secs: f64) -> PathBuf {
    run_dir.join(format!("frame_{timestamp_secs:.3}.jpg"))
}
