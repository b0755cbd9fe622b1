use regex::Regex;
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

static ZIP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{5}(-\d{4})?$").unwrap());

/// `local@domain.tld` shape: no whitespace, a single `@`, a dot after it.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// At least ten digits once punctuation and spaces are stripped.
pub fn is_valid_phone(phone: &str) -> bool {
    phone.chars().filter(|c| c.is_ascii_digit()).count() >= 10
}

/// US ZIP or ZIP+4.
pub fn is_valid_zip_code(zip: &str) -> bool {
    ZIP_RE.is_match(zip)
}
