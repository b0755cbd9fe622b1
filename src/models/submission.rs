use serde::Deserialize;

/// Contact form payload as posted by the site.
///
/// Absent fields deserialize to empty strings so the presence check can name
/// the missing field; anything that isn't a string is a malformed request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubmissionRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub zip_code: String,
    pub case_type: String,
    pub description: Option<String>,
    pub captcha_token: Option<String>,
    /// Honeypot. Hidden from humans, so only bots fill it in.
    pub website: Option<String>,
}

impl SubmissionRequest {
    /// Description with surrounding whitespace removed, `None` when blank.
    pub fn description(&self) -> Option<&str> {
        self.description
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn captcha_token(&self) -> Option<&str> {
        self.captcha_token
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}
