//! Frame decoding behind the `FrameSource` seam.
//!
//! The default implementation shells out to ffmpeg once per sampled
//! timestamp. Hosts and tests can substitute any other decoder.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::{fs, process::Command};

use crate::{
    error::{JumpsafeError, Result},
    probe::{self, probe_video},
    scratch,
    types::VideoMetadata,
};

/// JPEG quality on a 0-1 scale, matching the original client.
pub const JPEG_QUALITY: f32 = 0.8;

/// A decodable video: metadata plus frames-at-timestamps.
#[async_trait]
pub trait FrameSource: Send + Sync {
    async fn metadata(&self) -> Result<VideoMetadata>;

    /// Decode the frame at (or near) `timestamp_secs` and return it as
    /// JPEG bytes. A failure here is per-frame, not fatal to a run.
    async fn frame_jpeg(&self, timestamp_secs: f64) -> Result<Vec<u8>>;
}

/// `FrameSource` over a local file, decoding with ffprobe/ffmpeg.
pub struct FfmpegFrameSource {
    video_path: PathBuf,
    run_dir: PathBuf,
    qscale: u8,
}

impl FfmpegFrameSource {
    pub fn new(video_path: impl Into<PathBuf>) -> Self {
        Self {
            video_path: video_path.into(),
            run_dir: scratch::run_dir(),
            qscale: ffmpeg_qscale(JPEG_QUALITY),
        }
    }

    /// Remove this run's scratch directory and everything in it.
    pub async fn cleanup(&self) -> Result<()> {
        if self.run_dir.exists() {
            fs::remove_dir_all(&self.run_dir).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl FrameSource for FfmpegFrameSource {
    async fn metadata(&self) -> Result<VideoMetadata> {
        let output = probe_video(&self.video_path).await?;
        probe::video_metadata(&self.video_path, &output)
    }

    async fn frame_jpeg(&self, timestamp_secs: f64) -> Result<Vec<u8>> {
        fs::create_dir_all(&self.run_dir).await?;
        let frame_path = scratch::frame_path(&self.run_dir, timestamp_secs);

        let output = Command::new("ffmpeg")
            .args(["-y", "-ss", &format!("{timestamp_secs:.3}"), "-i"])
            .arg(&self.video_path)
            .args(["-frames:v", "1", "-q:v", &self.qscale.to_string()])
            .arg(&frame_path)
            .output()
            .await
            .map_err(|e| JumpsafeError::FrameExtraction {
                timestamp_secs,
                reason: format!("could not run ffmpeg: {e}"),
            })?;

        if !output.status.success() {
            return Err(JumpsafeError::FrameExtraction {
                timestamp_secs,
                reason: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }

        // ffmpeg exits zero but writes nothing when seeking past the end.
        fs::read(&frame_path)
            .await
            .map_err(|e| JumpsafeError::FrameExtraction {
                timestamp_secs,
                reason: format!("no frame produced: {e}"),
            })
    }
}

/// Map a 0-1 JPEG quality onto ffmpeg's inverted 2-31 qscale.
fn ffmpeg_qscale(quality: f32) -> u8 {
    let quality = quality.clamp(0.0, 1.0);
    (2.0 + (1.0 - quality) * 29.0).round() as u8
}
