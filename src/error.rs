use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    NotFound,
    MethodNotAllowed,
    PayloadTooLarge,
    RequestMalformed(String),
    /// Honeypot filled or link spam in the description.
    SpamDetected,
    /// Submitter address is on the deny-list.
    InputRejected,
    RateLimited,
    MissingField(&'static str),
    FieldTooLong(&'static str),
    FormatInvalid(&'static str),
    InvalidName(&'static str),
    CaptchaFailed,
    ServiceMisconfigured(String),
    UpstreamSendFailed(String),
    Internal(String),
}

impl AppError {
    /// Stable identifier returned alongside the message.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound => "not_found",
            AppError::MethodNotAllowed => "method_not_allowed",
            AppError::PayloadTooLarge => "payload_too_large",
            AppError::RequestMalformed(_) => "request_malformed",
            AppError::SpamDetected => "spam_detected",
            AppError::InputRejected => "input_rejected",
            AppError::RateLimited => "rate_limited",
            AppError::MissingField(_) => "missing_field",
            AppError::FieldTooLong(_) => "field_too_long",
            AppError::FormatInvalid(_) => "format_invalid",
            AppError::InvalidName(_) => "invalid_name",
            AppError::CaptchaFailed => "captcha_failed",
            AppError::ServiceMisconfigured(_) => "service_misconfigured",
            AppError::UpstreamSendFailed(_) => "upstream_send_failed",
            AppError::Internal(_) => "internal_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::ServiceMisconfigured(_)
            | AppError::UpstreamSendFailed(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::NotFound => write!(f, "Not found"),
            AppError::MethodNotAllowed => write!(f, "Method not allowed"),
            AppError::PayloadTooLarge => write!(f, "Request body is too large"),
            AppError::RequestMalformed(msg) => write!(f, "Malformed request: {msg}"),
            AppError::SpamDetected => write!(f, "Submission flagged as spam"),
            AppError::InputRejected => write!(f, "Submission rejected"),
            AppError::RateLimited => write!(f, "Too many requests. Please try again later."),
            AppError::MissingField(field) => write!(f, "Missing required field: {field}"),
            AppError::FieldTooLong(field) => write!(f, "Field is too long: {field}"),
            AppError::FormatInvalid(field) => write!(f, "Invalid format: {field}"),
            AppError::InvalidName(field) => write!(f, "Please enter a valid name: {field}"),
            AppError::CaptchaFailed => write!(f, "Captcha verification failed"),
            AppError::ServiceMisconfigured(msg) => write!(f, "Service misconfigured: {msg}"),
            AppError::UpstreamSendFailed(msg) => write!(f, "Failed to send message: {msg}"),
            AppError::Internal(msg) => write!(f, "Internal Error: {msg}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::ServiceMisconfigured(msg) => {
                tracing::error!("Service misconfigured: {msg}");
                "Service is temporarily unavailable".to_string()
            }
            AppError::UpstreamSendFailed(msg) => {
                tracing::error!("Email dispatch failed: {msg}");
                "Failed to send your message. Please try again later.".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                "Internal server error".to_string()
            }
            // Serde detail stays in the logs.
            AppError::RequestMalformed(msg) => {
                tracing::debug!("Malformed request: {msg}");
                "Malformed request body".to_string()
            }
            other => other.to_string(),
        };

        let body = json!({ "error": message, "code": self.code() });
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_faults_are_client_errors() {
        for err in [
            AppError::RequestMalformed("x".into()),
            AppError::SpamDetected,
            AppError::InputRejected,
            AppError::MissingField("email"),
            AppError::FieldTooLong("phone"),
            AppError::FormatInvalid("zipCode"),
            AppError::InvalidName("firstName"),
            AppError::CaptchaFailed,
        ] {
            assert_eq!(err.status(), StatusCode::BAD_REQUEST, "{}", err.code());
        }
        assert_eq!(AppError::RateLimited.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(AppError::MethodNotAllowed.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(AppError::PayloadTooLarge.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(AppError::NotFound.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn downstream_faults_hide_detail() {
        let resp = AppError::UpstreamSendFailed("smtp 535 auth failed for user x".into())
            .into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn missing_field_names_the_field() {
        assert_eq!(
            AppError::MissingField("zipCode").to_string(),
            "Missing required field: zipCode"
        );
    }
}
