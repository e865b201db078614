//! ffprobe-backed video metadata.
//!
//! The client never decodes media itself; duration, nominal frame rate
//! and track presence all come from one `ffprobe` invocation per run.

use std::path::Path;

use serde::Deserialize;
use tokio::process::Command;

use crate::{
    error::{JumpsafeError, Result},
    types::VideoMetadata,
};

/// Top-level ffprobe JSON output (`-print_format json -show_format -show_streams`).
#[derive(Debug, Deserialize)]
pub struct ProbeOutput {
    #[serde(default)]
    pub streams: Vec<ProbeStream>,
    pub format: ProbeFormat,
}

#[derive(Debug, Deserialize)]
pub struct ProbeStream {
    pub codec_type: Option<String>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    /// Fraction such as "30/1" or "24000/1001".
    pub r_frame_rate: Option<String>,
    pub duration: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProbeFormat {
    pub duration: Option<String>,
}

/// Run `ffprobe` on a video file and parse its JSON output.
pub async fn probe_video(path: &Path) -> Result<ProbeOutput> {
    if !path.exists() {
        return Err(JumpsafeError::VideoLoad {
            path: path.to_path_buf(),
            reason: "file not found".to_string(),
        });
    }

    let output = Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .output()
        .await
        .map_err(|e| JumpsafeError::VideoLoad {
            path: path.to_path_buf(),
            reason: format!("could not run ffprobe: {e}"),
        })?;

    if !output.status.success() {
        return Err(JumpsafeError::VideoLoad {
            path: path.to_path_buf(),
            reason: String::from_utf8_lossy(&output.stderr).to_string(),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str::<ProbeOutput>(&stdout).map_err(|e| JumpsafeError::VideoLoad {
        path: path.to_path_buf(),
        reason: format!("unreadable ffprobe output: {e}"),
    })
}

/// Reduce a probe to the metadata the pipeline needs.
///
/// Fails with `NoVideoTrack` when no stream reports `codec_type=video`.
/// A zero or unparseable frame rate is passed through as reported; the
/// sampler substitutes its default for non-positive values.
pub fn video_metadata(path: &Path, probe: &ProbeOutput) -> Result<VideoMetadata> {
    let track = first_video_stream(probe).ok_or_else(|| JumpsafeError::NoVideoTrack {
        path: path.to_path_buf(),
    })?;

    Ok(VideoMetadata {
        duration_secs: parse_duration(probe),
        nominal_fps: track
            .r_frame_rate
            .as_deref()
            .map(parse_fraction)
            .unwrap_or(0.0),
        width: track.width,
        height: track.height,
    })
}

fn first_video_stream(probe: &ProbeOutput) -> Option<&ProbeStream> {
    probe
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
}

/// Duration in seconds, preferring the format-level value and falling
/// back to the first video stream.
fn parse_duration(probe: &ProbeOutput) -> f64 {
    if let Some(d) = &probe.format.duration {
        if let Ok(secs) = d.parse::<f64>() {
            return secs;
        }
    }
    if let Some(stream) = first_video_stream(probe) {
        if let Some(d) = &stream.duration {
            if let Ok(secs) = d.parse::<f64>() {
                return secs;
            }
        }
    }
    0.0
}

/// Parse an ffprobe rate fraction ("30/1", "24000/1001", "25").
/// Returns 0.0 for malformed input or a zero denominator.
fn parse_fraction(raw: &str) -> f64 {
    match raw.split_once('/') {
        Some((num, den)) => {
            let num = num.trim().parse::<f64>().unwrap_or(0.0);
            let den = den.trim().parse::<f64>().unwrap_or(0.0);
            if den == 0.0 { 0.0 } else { num / den }
        }
        None => raw.trim().parse::<f64>().unwrap_or(0.0),
    }
}
