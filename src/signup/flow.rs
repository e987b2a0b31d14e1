use tracing::{info, warn};

use crate::clients::MailClient;
use crate::model::{EmailSendRequest, EventPackage, SubmissionResult};

use super::template::Confirmation;
use super::validation::{validate_email, ValidationError};

/// Where the sub-flow is. `Collecting` always carries the chosen package.
#[derive(Debug, Clone, PartialEq)]
pub enum SignupPhase {
    Browsing,
    Collecting { package: EventPackage },
}

/// The event a sign-up is for.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SignupContext {
    pub event_id: String,
    pub event_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The field failed validation; nothing was sent.
    Invalid(ValidationError),
    /// The mail was accepted and the flow is back to `Browsing`.
    Sent,
    /// The write failed; the form keeps the entered address.
    Failed,
    /// Not collecting, or a submission is already running.
    Ignored,
}

/// Result banner, e.g. `Email Status: Email processed successfully.`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub success: bool,
    pub text: String,
}

impl From<&SubmissionResult> for Banner {
    fn from(result: &SubmissionResult) -> Self {
        Self {
            success: result.success,
            text: format!("Email Status: {}", result.message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageButton {
    pub package_id: String,
    pub label: String,
}

impl From<&EventPackage> for PackageButton {
    fn from(package: &EventPackage) -> Self {
        Self {
            package_id: package.id.clone(),
            label: format!("{} | {} {}", package.title, package.price, package.currency),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignupView {
    Packages {
        buttons: Vec<PackageButton>,
        banner: Option<Banner>,
    },
    Form {
        heading: String,
        email: String,
        field_error: Option<String>,
        banner: Option<Banner>,
        submit_label: &'static str,
        inputs_disabled: bool,
    },
}

/// Sign-up state machine owned by one overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct SignupFlow {
    phase: SignupPhase,
    email: String,
    field_error: Option<ValidationError>,
    result: Option<SubmissionResult>,
    submitting: bool,
}

impl Default for SignupFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl SignupFlow {
    pub fn new() -> Self {
        Self {
            phase: SignupPhase::Browsing,
            email: String::new(),
            field_error: None,
            result: None,
            submitting: false,
        }
    }

    pub fn phase(&self) -> &SignupPhase {
        &self.phase
    }

    pub fn selected_package(&self) -> Option<&EventPackage> {
        match &self.phase {
            SignupPhase::Collecting { package } => Some(package),
            SignupPhase::Browsing => None,
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn field_error(&self) -> Option<&ValidationError> {
        self.field_error.as_ref()
    }

    pub fn result(&self) -> Option<&SubmissionResult> {
        self.result.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// `Browsing -> Collecting`. Opens a fresh form for `package`.
    pub fn select(&mut self, package: EventPackage) -> bool {
        if !matches!(self.phase, SignupPhase::Browsing) {
            return false;
        }
        self.phase = SignupPhase::Collecting { package };
        self.email.clear();
        self.field_error = None;
        self.result = None;
        true
    }

    /// `Collecting -> Browsing`, unless a submission is running.
    pub fn go_back(&mut self) -> bool {
        if self.submitting || !matches!(self.phase, SignupPhase::Collecting { .. }) {
            return false;
        }
        *self = Self::new();
        true
    }

    /// Back to the initial state, unconditionally.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Edits the email field. A field already showing an error re-validates.
    pub fn set_email(&mut self, email: impl Into<String>) {
        if self.submitting {
            return;
        }
        self.email = email.into();
        if self.field_error.is_some() {
            self.field_error = validate_email(&self.email).err();
        }
    }

    /// Validates the field and builds the confirmation mail.
    ///
    /// On success the flow is marked as submitting until [`finish`](Self::finish).
    pub fn prepare(&mut self, context: &SignupContext) -> Result<EmailSendRequest, SubmitOutcome> {
        let SignupPhase::Collecting { package } = &self.phase else {
            return Err(SubmitOutcome::Ignored);
        };
        if self.submitting {
            return Err(SubmitOutcome::Ignored);
        }

        if let Err(error) = validate_email(&self.email) {
            warn!(event_id = %context.event_id, error = %error, "Email failed validation");
            self.field_error = Some(error.clone());
            return Err(SubmitOutcome::Invalid(error));
        }

        let request = Confirmation {
            to: &self.email,
            package_title: Some(package.title.as_str()),
            event_name: context.event_name.as_deref(),
        }
        .to_request();

        self.field_error = None;
        self.result = None;
        self.submitting = true;
        Ok(request)
    }

    /// Applies the write result of a prepared submission.
    pub fn finish(&mut self, context: &SignupContext, result: SubmissionResult) -> SubmitOutcome {
        if !self.submitting {
            return SubmitOutcome::Ignored;
        }
        self.submitting = false;

        let package = self.selected_package().map(|p| p.title.clone()).unwrap_or_default();
        if result.success {
            info!(to = %self.email, package = %package, event_id = %context.event_id, "Successfully sent email");
            *self = Self::new();
            self.result = Some(result);
            SubmitOutcome::Sent
        } else {
            warn!(package = %package, event_id = %context.event_id, message = %result.message, "Failed to send email");
            self.result = Some(result);
            SubmitOutcome::Failed
        }
    }

    /// Validates, sends through `mail`, and applies the result.
    pub async fn submit(&mut self, context: &SignupContext, mail: &MailClient) -> SubmitOutcome {
        match self.prepare(context) {
            Ok(request) => {
                let result = mail.send(&request).await;
                self.finish(context, result)
            }
            Err(outcome) => outcome,
        }
    }

    pub fn view(&self, packages: &[EventPackage]) -> SignupView {
        let banner = self.result.as_ref().map(Banner::from);
        match &self.phase {
            SignupPhase::Browsing => SignupView::Packages {
                buttons: packages.iter().map(PackageButton::from).collect(),
                banner,
            },
            SignupPhase::Collecting { package } => SignupView::Form {
                heading: format!(
                    "Sign up to: {}",
                    Some(package.title.as_str())
                        .filter(|t| !t.is_empty())
                        .unwrap_or("this Event")
                ),
                email: self.email.clone(),
                field_error: self.field_error.as_ref().map(ToString::to_string),
                banner,
                submit_label: if self.submitting {
                    "Signing up..."
                } else {
                    "Signing me up!"
                },
                inputs_disabled: self.submitting,
            },
        }
    }
}
