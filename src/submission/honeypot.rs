use crate::models::SubmissionRequest;

/// Check if the hidden `website` field is filled. Returns true if spam detected.
pub fn is_spam(submission: &SubmissionRequest) -> bool {
    submission
        .website
        .as_deref()
        .is_some_and(|s| !s.trim().is_empty())
}
