//! The frame upload pipeline: probe, sample, extract, dispatch, signal.

use crate::{
    error::Result,
    extract::FrameSource,
    format::format_timestamp,
    sampler::sample_timestamps,
    types::{EncodedFrame, PipelineSummary},
    upload::UploadSink,
};

/// Receives human-readable progress strings. The host owns rendering;
/// a closure `Fn(&str)` works directly.
pub trait StatusSink: Send + Sync {
    fn update(&self, message: &str);
}

impl<F> StatusSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn update(&self, message: &str) {
        self(message)
    }
}

/// Drive one full run over `source`, dispatching through `sink`.
///
/// Frames are extracted and dispatched strictly in timestamp order from
/// a single sequential loop; the sink must not block the loop on network
/// completion. A frame that fails to extract is logged and skipped. The
/// end signal goes out exactly once, after every sampled timestamp has
/// been attempted, regardless of per-frame failures. Only a video that
/// cannot be loaded or has no video track fails the run, and then
/// nothing is dispatched at all.
pub async fn run_pipeline(
    source: &dyn FrameSource,
    sink: &dyn UploadSink,
    status: &dyn StatusSink,
) -> Result<PipelineSummary> {
    status.update("Analyzing video...");
    let metadata = source.metadata().await?;

    let timestamps = sample_timestamps(metadata.duration_secs, metadata.nominal_fps);
    status.update(&format!(
        "Video {} at {:.2} fps, {} frames to upload",
        format_timestamp(metadata.duration_secs),
        metadata.nominal_fps,
        timestamps.len()
    ));
    log::info!(
        "sampling {} frames over {:.2}s (nominal {:.2} fps)",
        timestamps.len(),
        metadata.duration_secs,
        metadata.nominal_fps
    );

    let mut dispatched = 0usize;
    let mut skipped = 0usize;

    for (index, timestamp_secs) in timestamps.iter().copied().enumerate() {
        match source.frame_jpeg(timestamp_secs).await {
            Ok(jpeg) => {
                dispatched += 1;
                status.update(&format!("Uploading frame {dispatched}..."));
                sink.dispatch_frame(EncodedFrame {
                    index,
                    timestamp_secs,
                    jpeg,
                })
                .await;
            }
            Err(e) => {
                skipped += 1;
                log::warn!("skipping frame: {e}");
            }
        }
    }

    sink.signal_end().await;

    Ok(PipelineSummary {
        frames_sampled: timestamps.len(),
        frames_dispatched: dispatched,
        frames_skipped: skipped,
        end_signal_sent: true,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::{error::JumpsafeError, types::VideoMetadata};

    /// Ten sampled frames (1s of 20 fps video), failing where told to.
    struct FakeSource {
        has_track: bool,
        fail_at: Vec<usize>,
        calls: AtomicUsize,
    }

    impl FakeSource {
        fn with_track(fail_at: Vec<usize>) -> Self {
            Self {
                has_track: true,
                fail_at,
                calls: AtomicUsize::new(0),
            }
        }

        fn without_track() -> Self {
            Self {
                has_track: false,
                fail_at: Vec::new(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl FrameSource for FakeSource {
        async fn metadata(&self) -> Result<VideoMetadata> {
            if !self.has_track {
                return Err(JumpsafeError::NoVideoTrack {
                    path: "audio_only.mov".into(),
                });
            }
            Ok(VideoMetadata {
                duration_secs: 1.0,
                nominal_fps: 20.0,
                width: None,
                height: None,
            })
        }

        async fn frame_jpeg(&self, timestamp_secs: f64) -> Result<Vec<u8>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_at.contains(&call) {
                Err(JumpsafeError::FrameExtraction {
                    timestamp_secs,
                    reason: "decode error".to_string(),
                })
            } else {
                Ok(vec![0xFF, 0xD8, 0xFF, 0xD9])
            }
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        frames: Mutex<Vec<EncodedFrame>>,
        end_signals: AtomicUsize,
    }

    #[async_trait]
    impl UploadSink for RecordingSink {
        async fn dispatch_frame(&self, frame: EncodedFrame) {
            self.frames.lock().unwrap().push(frame);
        }

        async fn signal_end(&self) {
            self.end_signals.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn quiet() -> impl StatusSink {
        |_: &str| {}
    }

    #[tokio::test]
    async fn dispatches_every_frame_then_one_end_signal() {
        let source = FakeSource::with_track(Vec::new());
        let sink = RecordingSink::default();

        let summary = run_pipeline(&source, &sink, &quiet()).await.unwrap();

        assert_eq!(summary.frames_sampled, 10);
        assert_eq!(summary.frames_dispatched, 10);
        assert_eq!(summary.frames_skipped, 0);
        assert!(summary.end_signal_sent);
        assert_eq!(sink.frames.lock().unwrap().len(), 10);
        assert_eq!(sink.end_signals.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn skips_failed_extractions_without_aborting() {
        let source = FakeSource::with_track(vec![3, 7]);
        let sink = RecordingSink::default();

        let summary = run_pipeline(&source, &sink, &quiet()).await.unwrap();

        assert_eq!(summary.frames_dispatched, 8);
        assert_eq!(summary.frames_skipped, 2);
        assert_eq!(sink.frames.lock().unwrap().len(), 8);
        assert_eq!(sink.end_signals.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn frames_arrive_in_timestamp_order() {
        let source = FakeSource::with_track(vec![0]);
        let sink = RecordingSink::default();

        run_pipeline(&source, &sink, &quiet()).await.unwrap();

        let frames = sink.frames.lock().unwrap();
        for pair in frames.windows(2) {
            assert!(pair[1].timestamp_secs > pair[0].timestamp_secs);
        }
        // Indices refer to the sampled sequence, so the skipped first
        // timestamp leaves a gap rather than renumbering.
        assert_eq!(frames.first().unwrap().index, 1);
    }

    #[tokio::test]
    async fn missing_video_track_dispatches_nothing() {
        let source = FakeSource::without_track();
        let sink = RecordingSink::default();

        let err = run_pipeline(&source, &sink, &quiet()).await.unwrap_err();

        assert!(matches!(err, JumpsafeError::NoVideoTrack { .. }));
        assert!(sink.frames.lock().unwrap().is_empty());
        assert_eq!(sink.end_signals.load(Ordering::SeqCst), 0);
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }
}
