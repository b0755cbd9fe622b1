use std::net::IpAddr;

pub const DEFAULT_VERIFY_URL: &str = "https://www.google.com/recaptcha/api/siteverify";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub max_body_size: usize,
    pub rate_limit: RateLimitConfig,
    pub mail: MailConfig,
    pub smtp: Option<SmtpConfig>,
    pub captcha: CaptchaConfig,
    /// Extra addresses rejected on top of the built-in deny-list.
    pub blocklist: Vec<String>,
    pub http_timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window_ms: i64,
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub sender: String,
    pub recipients: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
}

#[derive(Debug, Clone)]
pub struct CaptchaConfig {
    pub secret: Option<String>,
    pub verify_url: String,
    pub min_score: f64,
}

/// Longest window accepted from configuration (one day).
pub const MAX_RATE_WINDOW_MS: i64 = 86_400_000;

impl RateLimitConfig {
    /// A zero or negative window would expire every bucket immediately and
    /// disable limiting; a zero budget would refuse every submission.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_requests == 0 {
            return Err("CONTACT_RELAY_RATE_LIMIT must be at least 1".to_string());
        }
        if self.window_ms <= 0 || self.window_ms > MAX_RATE_WINDOW_MS {
            return Err(format!(
                "CONTACT_RELAY_RATE_WINDOW_MS must be between 1 and {MAX_RATE_WINDOW_MS}, got {}",
                self.window_ms
            ));
        }
        Ok(())
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 3,
            window_ms: 60_000,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let host: IpAddr = env_or("CONTACT_RELAY_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid CONTACT_RELAY_HOST: {e}"))?;

        let port: u16 = env_or("CONTACT_RELAY_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid CONTACT_RELAY_PORT: {e}"))?;

        let log_level = env_or("CONTACT_RELAY_LOG_LEVEL", "info");

        let max_body_size: usize = env_or("CONTACT_RELAY_MAX_BODY_SIZE", "16384")
            .parse()
            .map_err(|e| format!("Invalid CONTACT_RELAY_MAX_BODY_SIZE: {e}"))?;

        let rate_limit = RateLimitConfig {
            max_requests: env_or("CONTACT_RELAY_RATE_LIMIT", "3")
                .parse()
                .map_err(|e| format!("Invalid CONTACT_RELAY_RATE_LIMIT: {e}"))?,
            window_ms: env_or("CONTACT_RELAY_RATE_WINDOW_MS", "60000")
                .parse()
                .map_err(|e| format!("Invalid CONTACT_RELAY_RATE_WINDOW_MS: {e}"))?,
        };
        rate_limit.validate()?;

        let mail = MailConfig {
            sender: env_or("CONTACT_RELAY_SENDER", "noreply@localhost"),
            recipients: split_list(&env_or("CONTACT_RELAY_RECIPIENTS", "")),
        };

        // Credentials are all-or-nothing; absence only matters once a send is attempted.
        let smtp = match (
            std::env::var("CONTACT_RELAY_SMTP_HOST").ok(),
            std::env::var("CONTACT_RELAY_SMTP_PORT").ok(),
            std::env::var("CONTACT_RELAY_SMTP_USER").ok(),
            std::env::var("CONTACT_RELAY_SMTP_PASS").ok(),
        ) {
            (Some(host), Some(port), Some(user), Some(pass)) => Some(SmtpConfig {
                host,
                port: port
                    .parse()
                    .map_err(|e| format!("Invalid CONTACT_RELAY_SMTP_PORT: {e}"))?,
                user,
                pass,
            }),
            _ => None,
        };

        let captcha = CaptchaConfig {
            secret: std::env::var("CAPTCHA_SECRET_KEY")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            verify_url: env_or("CAPTCHA_VERIFY_URL", DEFAULT_VERIFY_URL),
            min_score: env_or("CAPTCHA_MIN_SCORE", "0.5")
                .parse()
                .map_err(|e| format!("Invalid CAPTCHA_MIN_SCORE: {e}"))?,
        };

        let blocklist = split_list(&env_or("CONTACT_RELAY_BLOCKLIST", ""));

        let http_timeout_secs: u64 = env_or("CONTACT_RELAY_HTTP_TIMEOUT_SECS", "10")
            .parse()
            .map_err(|e| format!("Invalid CONTACT_RELAY_HTTP_TIMEOUT_SECS: {e}"))?;

        Ok(Config {
            host,
            port,
            log_level,
            max_body_size,
            rate_limit,
            mail,
            smtp,
            captcha,
            blocklist,
            http_timeout_secs,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}
