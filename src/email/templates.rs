use askama::Template;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::SubmissionRequest;

/// Field values shared by the HTML and plain-text bodies, already trimmed.
pub struct Notification<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub zip_code: &'a str,
    pub case_type: &'a str,
    pub description: Option<&'a str>,
    pub client: &'a str,
    pub reference: Uuid,
    pub submitted_at: String,
}

#[derive(Template)]
#[template(path = "contact/notification.html")]
struct HtmlBody<'a> {
    n: &'a Notification<'a>,
}

#[derive(Template)]
#[template(path = "contact/notification.txt")]
struct TextBody<'a> {
    n: &'a Notification<'a>,
}

pub struct RenderedNotification {
    pub subject: String,
    pub html: String,
    pub plain_text: String,
}

impl<'a> Notification<'a> {
    pub fn new(
        submission: &'a SubmissionRequest,
        client: &'a str,
        reference: Uuid,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            first_name: submission.first_name.trim(),
            last_name: submission.last_name.trim(),
            email: submission.email.trim(),
            phone: submission.phone.trim(),
            zip_code: submission.zip_code.trim(),
            case_type: submission.case_type.trim(),
            description: submission.description(),
            client,
            reference,
            submitted_at: submitted_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        }
    }

    pub fn subject(&self) -> String {
        format!(
            "New {} inquiry from {} {}",
            self.case_type, self.first_name, self.last_name
        )
    }

    pub fn render(&self) -> Result<RenderedNotification, askama::Error> {
        Ok(RenderedNotification {
            subject: self.subject(),
            html: HtmlBody { n: self }.render()?,
            plain_text: TextBody { n: self }.render()?,
        })
    }
}
