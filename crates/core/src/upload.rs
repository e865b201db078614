//! HTTP dispatch to the JumpSafe server.
//!
//! The pipeline hands frames to an [`UploadSink`] and moves on; it never
//! waits for the network. The reqwest-backed sink spawns one task per
//! POST and only logs the outcome. Hosts that need every request settled
//! before exiting call [`HttpUploadSink::drain`].

use async_trait::async_trait;
use reqwest::{Client, Url, header::CONTENT_TYPE};
use tokio::{sync::Mutex, task::JoinSet};

use crate::{
    error::{JumpsafeError, Result},
    types::{EncodedFrame, UploadOutcome},
};

const FRAME_UPLOAD_PATH: &str = "image/upload";
const VIDEO_END_PATH: &str = "video/end";
const FEEDBACK_PATH: &str = "feedback";

/// The three server endpoints, derived from one base URL.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub frame: Url,
    pub end: Url,
    pub feedback: Url,
}

impl Endpoints {
    pub fn from_base(base: &str) -> Result<Self> {
        let base = base.trim_end_matches('/');
        let parse = |path: &str| {
            Url::parse(&format!("{base}/{path}")).map_err(|e| JumpsafeError::InvalidServerUrl {
                url: base.to_string(),
                reason: e.to_string(),
            })
        };
        Ok(Self {
            frame: parse(FRAME_UPLOAD_PATH)?,
            end: parse(VIDEO_END_PATH)?,
            feedback: parse(FEEDBACK_PATH)?,
        })
    }
}

/// Where the pipeline sends its output. Both operations dispatch and
/// return; completion of the underlying request is the sink's business.
#[async_trait]
pub trait UploadSink: Send + Sync {
    async fn dispatch_frame(&self, frame: EncodedFrame);

    /// Tell the server no more frames will arrive for this run.
    async fn signal_end(&self);
}

/// Fire-and-forget sink over reqwest.
pub struct HttpUploadSink {
    client: Client,
    endpoints: Endpoints,
    inflight: Mutex<JoinSet<()>>,
}

impl HttpUploadSink {
    pub fn new(endpoints: Endpoints) -> Self {
        Self {
            client: Client::new(),
            endpoints,
            inflight: Mutex::new(JoinSet::new()),
        }
    }

    /// Wait for every dispatched request to settle. Outcomes were already
    /// logged by the tasks themselves.
    pub async fn drain(&self) {
        let mut inflight = self.inflight.lock().await;
        while inflight.join_next().await.is_some() {}
    }
}

#[async_trait]
impl UploadSink for HttpUploadSink {
    async fn dispatch_frame(&self, frame: EncodedFrame) {
        let request = self
            .client
            .post(self.endpoints.frame.clone())
            .header(CONTENT_TYPE, "image/jpeg")
            .body(frame.jpeg);
        let label = format!("frame {} ({:.3}s)", frame.index + 1, frame.timestamp_secs);
        self.inflight.lock().await.spawn(async move {
            log_outcome(&label, send(request).await);
        });
    }

    async fn signal_end(&self) {
        let request = self.client.post(self.endpoints.end.clone());
        self.inflight.lock().await.spawn(async move {
            log_outcome("video end", send(request).await);
        });
    }
}

/// Execute one request and fold the result into an [`UploadOutcome`].
pub(crate) async fn send(request: reqwest::RequestBuilder) -> UploadOutcome {
    match request.send().await {
        Ok(response) => UploadOutcome::Delivered {
            status: response.status().as_u16(),
            body: response.text().await.unwrap_or_default(),
        },
        Err(e) => UploadOutcome::Failed {
            reason: e.to_string(),
        },
    }
}

fn log_outcome(label: &str, outcome: UploadOutcome) {
    match outcome {
        UploadOutcome::Delivered { status, body } => {
            log::debug!("{label}: status {status}, response {body:?}");
        }
        UploadOutcome::Failed { reason } => {
            log::warn!("{label}: upload failed: {reason}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_from_base() {
        let endpoints = Endpoints::from_base("http://192.168.86.246:5055").unwrap();
        assert_eq!(
            endpoints.frame.as_str(),
            "http://192.168.86.246:5055/image/upload"
        );
        assert_eq!(
            endpoints.end.as_str(),
            "http://192.168.86.246:5055/video/end"
        );
        assert_eq!(
            endpoints.feedback.as_str(),
            "http://192.168.86.246:5055/feedback"
        );
    }

    #[test]
    fn endpoints_tolerate_trailing_slash() {
        let endpoints = Endpoints::from_base("http://localhost:5055/").unwrap();
        assert_eq!(endpoints.frame.as_str(), "http://localhost:5055/image/upload");
    }

    #[test]
    fn endpoints_reject_garbage() {
        let err = Endpoints::from_base("not a url").unwrap_err();
        assert!(matches!(err, JumpsafeError::InvalidServerUrl { .. }));
    }
}
