use crate::error::AppError;
use crate::models::SubmissionRequest;

pub const MAX_DESCRIPTION_LEN: usize = 1200;

/// Required fields in the order they are reported.
fn required(submission: &SubmissionRequest) -> [(&'static str, &str); 6] {
    [
        ("firstName", submission.first_name.as_str()),
        ("lastName", submission.last_name.as_str()),
        ("email", submission.email.as_str()),
        ("phone", submission.phone.as_str()),
        ("zipCode", submission.zip_code.as_str()),
        ("caseType", submission.case_type.as_str()),
    ]
}

/// Every required field must be non-empty once trimmed.
pub fn check_required(submission: &SubmissionRequest) -> Result<(), AppError> {
    for (name, value) in required(submission) {
        if value.trim().is_empty() {
            return Err(AppError::MissingField(name));
        }
    }
    Ok(())
}

/// Per-field character limits, measured on the trimmed value.
pub fn check_lengths(submission: &SubmissionRequest) -> Result<(), AppError> {
    let limits: [(&'static str, &str, usize); 6] = [
        ("firstName", submission.first_name.as_str(), 50),
        ("lastName", submission.last_name.as_str(), 50),
        ("email", submission.email.as_str(), 100),
        ("phone", submission.phone.as_str(), 20),
        ("zipCode", submission.zip_code.as_str(), 10),
        ("caseType", submission.case_type.as_str(), 100),
    ];

    for (name, value, max) in limits {
        if value.trim().chars().count() > max {
            return Err(AppError::FieldTooLong(name));
        }
    }

    if let Some(description) = submission.description() {
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(AppError::FieldTooLong("description"));
        }
    }

    Ok(())
}
