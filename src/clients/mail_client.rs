use crate::framework::FetchClient;
use crate::model::{EmailSendRequest, SubmissionResult, MAIL_SEND_PATH};
use tracing::{debug, info, instrument, warn};

/// Client for the confirmation-mail write path.
#[derive(Clone)]
pub struct MailClient {
    inner: FetchClient,
}

impl MailClient {
    pub fn new(inner: FetchClient) -> Self {
        Self { inner }
    }

    /// Sends one confirmation email.
    ///
    /// Never fails: transport and decode errors come back as an unsuccessful
    /// [`SubmissionResult`] carrying the error text.
    #[instrument(skip(self, request), fields(to = %request.to))]
    pub async fn send(&self, request: &EmailSendRequest) -> SubmissionResult {
        debug!(subject = %request.subject, "Sending request");
        match self
            .inner
            .send::<_, SubmissionResult>(MAIL_SEND_PATH, request)
            .await
        {
            Ok(result) => {
                if result.success {
                    info!(message = %result.message, "Mail accepted");
                } else {
                    warn!(message = %result.message, "Mail rejected");
                }
                result
            }
            Err(e) => {
                warn!(error = %e, "Mail request failed");
                SubmissionResult::failed(e.to_string())
            }
        }
    }
}
