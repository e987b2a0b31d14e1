use serde::{Deserialize, Serialize};

/// Body of `POST /api/mail/send`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailSendRequest {
    pub to: String,
    pub subject: String,
    pub html_body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plain_text_body: Option<String>,
}

/// Outcome of one sign-up attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionResult {
    pub success: bool,
    pub message: String,
}

impl SubmissionResult {
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
