/// Frame rate assumed when the container reports none (or a nonsense value).
pub const DEFAULT_FRAME_RATE: f64 = 30.0;

/// Upper bound on the sampled sequence. Keeps a corrupt or absurdly
/// high-fps track from turning into millions of ffmpeg invocations.
pub const MAX_SAMPLES: usize = 5_000;

/// Compute the timestamps (seconds) at which frames are extracted.
///
/// Samples every second frame: the interval is `2.0 / fps`. The sequence
/// starts at 0 and stays strictly below `duration_secs`, so a
/// non-positive duration yields an empty sequence. Pure and
/// deterministic; callers may invoke it repeatedly with the same inputs.
pub fn sample_timestamps(duration_secs: f64, nominal_fps: f64) -> Vec<f64> {
    let fps = if nominal_fps > 0.0 {
        nominal_fps
    } else {
        DEFAULT_FRAME_RATE
    };
    let interval = 2.0 / fps;

    let mut timestamps = Vec::new();
    for i in 0..MAX_SAMPLES {
        let t = i as f64 * interval;
        if t >= duration_secs {
            return timestamps;
        }
        timestamps.push(t);
    }

    log::warn!(
        "sample sequence truncated at {MAX_SAMPLES} timestamps ({:.1}s of {duration_secs:.1}s covered)",
        MAX_SAMPLES as f64 * interval
    );
    timestamps
}
