//! Feedback reporting, independent of the upload pipeline.

use reqwest::{Client, header::CONTENT_TYPE};

use crate::{
    error::Result,
    types::{FeedbackRating, FeedbackRecord, UploadOutcome},
    upload::{self, Endpoints},
};

/// Sends one rating/comment record to the feedback endpoint.
///
/// Unlike frame uploads this awaits the server's answer: "sent" means
/// acknowledged, and the caller decides whether to mark it as such. A
/// failed record is not queued or retried.
pub struct FeedbackReporter {
    client: Client,
    endpoints: Endpoints,
}

impl FeedbackReporter {
    pub fn new(endpoints: Endpoints) -> Self {
        Self {
            client: Client::new(),
            endpoints,
        }
    }

    pub async fn send(&self, rating: FeedbackRating, comment: &str) -> Result<UploadOutcome> {
        let record = FeedbackRecord::new(rating, comment);
        let body = serde_json::to_vec(&record)?;

        let request = self
            .client
            .post(self.endpoints.feedback.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body);
        Ok(upload::send(request).await)
    }
}
