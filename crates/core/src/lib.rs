//! Jumpsafe Core Library
//!
//! Core functionality for sampling frames from a jump video, streaming
//! them to the JumpSafe inference server, and submitting user feedback.

pub mod error;
pub mod extract;
pub mod feedback;
pub mod format;
pub mod pipeline;
pub mod probe;
pub mod sampler;
pub mod scratch;
pub mod types;
pub mod upload;

// Re-export commonly used items at crate root
pub use error::{JumpsafeError, Result};
pub use extract::{FfmpegFrameSource, FrameSource, JPEG_QUALITY};
pub use feedback::FeedbackReporter;
pub use format::format_timestamp;
pub use pipeline::{StatusSink, run_pipeline};
pub use sampler::{DEFAULT_FRAME_RATE, MAX_SAMPLES, sample_timestamps};
pub use types::{
    EncodedFrame, FeedbackRating, FeedbackRecord, PipelineSummary, UploadOutcome, VideoMetadata,
};
pub use upload::{Endpoints, HttpUploadSink, UploadSink};
