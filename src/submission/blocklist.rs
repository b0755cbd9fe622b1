/// Addresses that have repeatedly abused the form.
const BLOCKED_EMAILS: &[&str] = &[
    "test@test.com",
    "example@example.com",
    "spam@spam.com",
    "noreply@gmail.com",
    "asdf@asdf.com",
];

pub struct Blocklist {
    extra: Vec<String>,
}

impl Blocklist {
    /// Built-in entries plus any configured extras.
    pub fn new(extra: &[String]) -> Self {
        Self {
            extra: extra.iter().map(|e| e.trim().to_lowercase()).collect(),
        }
    }

    /// Case-insensitive exact match on the trimmed address.
    pub fn is_blocked(&self, email: &str) -> bool {
        let email = email.trim().to_lowercase();
        if email.is_empty() {
            return false;
        }
        BLOCKED_EMAILS.contains(&email.as_str()) || self.extra.iter().any(|e| *e == email)
    }
}
