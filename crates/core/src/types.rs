use serde::{Deserialize, Serialize};

/// Metadata of the primary video track, probed once per run.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoMetadata {
    pub duration_secs: f64,
    pub nominal_fps: f64,
    pub width: Option<i32>,
    pub height: Option<i32>,
}

/// One sampled frame, encoded and ready to dispatch.
///
/// Lives only for the loop iteration that produced it and the upload
/// task it is handed to.
#[derive(Debug, Clone)]
pub struct EncodedFrame {
    /// Position in the sampled sequence, starting at 0.
    pub index: usize,
    pub timestamp_secs: f64,
    pub jpeg: Vec<u8>,
}

/// Outcome of a single POST. Observational only: logged, never retried.
#[derive(Debug, Clone)]
pub enum UploadOutcome {
    Delivered { status: u16, body: String },
    Failed { reason: String },
}

impl UploadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, UploadOutcome::Delivered { status, .. } if (200..300).contains(status))
    }
}

/// User rating attached to a feedback record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackRating {
    ThumbsUp,
    ThumbsDown,
    Comment,
}

/// Wire payload for the feedback endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub rating: FeedbackRating,
    pub comment: String,
}

impl FeedbackRecord {
    /// The comment is trimmed here; whether an empty comment is allowed
    /// at all is the host's decision.
    pub fn new(rating: FeedbackRating, comment: &str) -> Self {
        Self {
            rating,
            comment: comment.trim().to_string(),
        }
    }
}

/// What a pipeline run did, returned to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSummary {
    pub frames_sampled: usize,
    pub frames_dispatched: usize,
    pub frames_skipped: usize,
    pub end_signal_sent: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feedback_record_trims_comment() {
        let record = FeedbackRecord::new(FeedbackRating::Comment, "  model was wrong here \n");
        assert_eq!(record.comment, "model was wrong here");
    }

    #[test]
    fn feedback_record_whitespace_comment_serializes_empty() {
        let record = FeedbackRecord::new(FeedbackRating::Comment, "   ");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"rating": "comment", "comment": ""})
        );
    }

    #[test]
    fn rating_wire_names() {
        for (rating, expected) in [
            (FeedbackRating::ThumbsUp, "\"thumbs_up\""),
            (FeedbackRating::ThumbsDown, "\"thumbs_down\""),
            (FeedbackRating::Comment, "\"comment\""),
        ] {
            assert_eq!(serde_json::to_string(&rating).unwrap(), expected);
        }
    }

    #[test]
    fn upload_outcome_success_range() {
        let ok = UploadOutcome::Delivered {
            status: 204,
            body: String::new(),
        };
        let not_found = UploadOutcome::Delivered {
            status: 404,
            body: String::new(),
        };
        let failed = UploadOutcome::Failed {
            reason: "connection refused".to_string(),
        };
        assert!(ok.is_success());
        assert!(!not_found.is_success());
        assert!(!failed.is_success());
    }
}
