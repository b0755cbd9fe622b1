use axum::http::HeaderMap;

/// Shared bucket for requests that carry no client address. Every such
/// client is counted together.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Rate-limit identifier taken from the forwarding headers set by the
/// platform's front end: leftmost `X-Forwarded-For` entry, then `X-Real-IP`.
pub fn client_identifier(headers: &HeaderMap) -> String {
    if let Some(xff) = header_str(headers, "x-forwarded-for") {
        if let Some(first) = xff.split(',').map(|s| s.trim()).find(|s| !s.is_empty()) {
            return first.to_string();
        }
    }

    if let Some(real_ip) = header_str(headers, "x-real-ip").map(|s| s.trim()) {
        if !real_ip.is_empty() {
            return real_ip.to_string();
        }
    }

    UNKNOWN_CLIENT.to_string()
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
