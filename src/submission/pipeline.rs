use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::email::OutboundEmail;
use crate::email::templates::Notification;
use crate::error::AppError;
use crate::models::SubmissionRequest;
use crate::state::AppState;

use super::fields;
use super::heuristics;
use super::honeypot;
use super::validators;

pub struct PipelineResult {
    pub reference: Uuid,
}

/// Runs every check on a parsed submission in a fixed order, stopping at the
/// first failure, then relays it. Nothing is retried.
pub async fn run(
    state: &AppState,
    client: &str,
    submission: &SubmissionRequest,
) -> Result<PipelineResult, AppError> {
    if honeypot::is_spam(submission) {
        return Err(AppError::SpamDetected);
    }

    if state.blocklist.is_blocked(&submission.email) {
        return Err(AppError::InputRejected);
    }

    let policy = &state.config.rate_limit;
    if !state
        .limiter
        .allow(client, policy.max_requests, Duration::milliseconds(policy.window_ms))
        .await
    {
        return Err(AppError::RateLimited);
    }

    fields::check_required(submission)?;
    fields::check_lengths(submission)?;

    if !validators::is_valid_email(submission.email.trim()) {
        return Err(AppError::FormatInvalid("email"));
    }
    if !validators::is_valid_phone(&submission.phone) {
        return Err(AppError::FormatInvalid("phone"));
    }
    if !validators::is_valid_zip_code(submission.zip_code.trim()) {
        return Err(AppError::FormatInvalid("zipCode"));
    }

    if heuristics::is_gibberish(&submission.first_name) {
        return Err(AppError::InvalidName("firstName"));
    }
    if heuristics::is_gibberish(&submission.last_name) {
        return Err(AppError::InvalidName("lastName"));
    }

    if submission.description().is_some_and(heuristics::contains_urls) {
        return Err(AppError::SpamDetected);
    }

    if let Some(token) = submission.captcha_token() {
        let verifier = state.captcha.as_ref().ok_or_else(|| {
            AppError::ServiceMisconfigured("captcha token supplied but no secret key configured".into())
        })?;

        let result = verifier.verify(token).await;
        if !result.passes(state.config.captcha.min_score) {
            tracing::info!(client, success = result.success, score = result.score, "Captcha rejected");
            return Err(AppError::CaptchaFailed);
        }
    }

    let reference = Uuid::now_v7();
    dispatch(state, client, submission, reference).await?;

    Ok(PipelineResult { reference })
}

async fn dispatch(
    state: &AppState,
    client: &str,
    submission: &SubmissionRequest,
    reference: Uuid,
) -> Result<(), AppError> {
    let dispatcher = state
        .dispatcher
        .as_ref()
        .ok_or_else(|| AppError::ServiceMisconfigured("email transport not configured".into()))?;

    let mail = &state.config.mail;
    if mail.recipients.is_empty() {
        return Err(AppError::ServiceMisconfigured("no recipients configured".into()));
    }

    let rendered = Notification::new(submission, client, reference, Utc::now())
        .render()
        .map_err(|e| AppError::Internal(format!("Failed to render notification: {e}")))?;

    let email = OutboundEmail {
        sender: mail.sender.clone(),
        reply_to: Some(submission.email.trim().to_string()),
        recipients: mail.recipients.clone(),
        subject: rendered.subject,
        html: rendered.html,
        plain_text: rendered.plain_text,
    };

    dispatcher
        .send(&email)
        .await
        .map_err(|e| AppError::UpstreamSendFailed(format!("{reference}: {e}")))?;

    tracing::info!(%reference, recipients = email.recipients.len(), "Submission relayed");
    Ok(())
}
