use crate::model::EmailSendRequest;

const GENERIC_SUBJECT: &str = "Your Event Sign-Up Confirmation";

/// Everything the confirmation mail interpolates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Confirmation<'a> {
    pub to: &'a str,
    pub package_title: Option<&'a str>,
    pub event_name: Option<&'a str>,
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

impl Confirmation<'_> {
    pub fn subject(&self) -> String {
        match (present(self.package_title), present(self.event_name)) {
            (Some(package), Some(event)) => format!("Confirmation: {package} (Event: {event})"),
            (Some(package), None) => format!("Confirmation: {package}"),
            (None, Some(event)) => format!("Confirmation for Event: {event}"),
            (None, None) => GENERIC_SUBJECT.to_string(),
        }
    }

    fn html_message(&self) -> String {
        match (present(self.package_title), present(self.event_name)) {
            (Some(package), Some(event)) => format!(
                "<p>You have signed up for the <strong>{package}</strong> package for event <strong>{event}</strong>.</p>\
                 <p>Thank you and please save this email for your records.</p>"
            ),
            _ => "<p>Thank you for signing up! Please save this email for your records.</p>".to_string(),
        }
    }

    fn text_message(&self) -> String {
        match (present(self.package_title), present(self.event_name)) {
            (Some(package), Some(event)) => format!(
                "You have signed up for the {package} package for event {event}.\n\n\
                 Thank you and please save this email for your records."
            ),
            _ => "Thank you for signing up! Please save this email for your records.".to_string(),
        }
    }

    pub fn html_body(&self) -> String {
        format!(
            "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"UTF-8\"><title>{subject}</title></head>\
             <body><h1>Hello {to},</h1>{message}\
             <p>If you have any questions, feel free to reply to this email.</p>\
             <p>Best regards,<br>The Example Team</p></body></html>",
            subject = self.subject(),
            to = self.to,
            message = self.html_message(),
        )
    }

    pub fn plain_text_body(&self) -> String {
        format!(
            "Hello {},\n\n{}\n\nBest regards,\nThe Zealot Team",
            self.to,
            self.text_message()
        )
    }

    pub fn to_request(&self) -> EmailSendRequest {
        EmailSendRequest {
            to: self.to.to_string(),
            subject: self.subject(),
            html_body: self.html_body(),
            plain_text_body: Some(self.plain_text_body()),
        }
    }
}
