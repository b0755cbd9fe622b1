use crate::error::AppError;
use crate::models::SubmissionRequest;

/// Parse a JSON request body into a submission.
pub fn parse_body(body: &[u8]) -> Result<SubmissionRequest, AppError> {
    if body.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(AppError::RequestMalformed("empty body".to_string()));
    }

    serde_json::from_slice(body).map_err(|e| AppError::RequestMalformed(format!("Invalid JSON: {e}")))
}
