pub mod templates;

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::SmtpConfig;

/// A rendered notification ready for delivery.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundEmail {
    pub sender: String,
    pub reply_to: Option<String>,
    pub recipients: Vec<String>,
    pub subject: String,
    pub html: String,
    pub plain_text: String,
}

#[derive(Debug)]
pub struct DispatchError {
    pub message: String,
}

impl std::fmt::Display for DispatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<String> for DispatchError {
    fn from(s: String) -> Self {
        DispatchError { message: s }
    }
}

/// Send-and-confirm delivery of a single message.
#[async_trait]
pub trait EmailDispatcher: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> Result<(), DispatchError>;
}

pub struct SmtpDispatcher {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpDispatcher {
    pub fn new(config: &SmtpConfig) -> Result<Self, String> {
        let creds = Credentials::new(config.user.clone(), config.pass.clone());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| format!("SMTP error: {e}"))?
            .port(config.port)
            .credentials(creds)
            .build();

        Ok(Self { transport })
    }
}

#[async_trait]
impl EmailDispatcher for SmtpDispatcher {
    async fn send(&self, email: &OutboundEmail) -> Result<(), DispatchError> {
        let message = build_message(email)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| format!("Failed to send email: {e}"))?;

        Ok(())
    }
}

pub fn build_message(email: &OutboundEmail) -> Result<Message, String> {
    let from: Mailbox = email
        .sender
        .parse()
        .map_err(|e| format!("Invalid from address: {e}"))?;

    let mut builder = Message::builder().from(from).subject(email.subject.clone());

    for recipient in &email.recipients {
        builder = builder.to(recipient
            .parse()
            .map_err(|e| format!("Invalid to address '{recipient}': {e}"))?);
    }

    if let Some(reply_to) = &email.reply_to {
        // A submitter address lettre can't parse only costs us the Reply-To header.
        match reply_to.parse::<Mailbox>() {
            Ok(mailbox) => builder = builder.reply_to(mailbox),
            Err(e) => tracing::debug!("Skipping Reply-To: {e}"),
        }
    }

    builder
        .multipart(MultiPart::alternative_plain_html(
            email.plain_text.clone(),
            email.html.clone(),
        ))
        .map_err(|e| format!("Failed to build email: {e}"))
}
