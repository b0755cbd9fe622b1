use async_trait::async_trait;
use serde::Deserialize;

/// Outcome of a verification round-trip. Transport and parse failures
/// collapse into the default (`success = false`, `score = 0`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct CaptchaResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub score: f64,
}

impl CaptchaResult {
    pub fn passes(&self, min_score: f64) -> bool {
        self.success && self.score >= min_score
    }
}

#[async_trait]
pub trait CaptchaVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> CaptchaResult;
}

/// Verifier speaking the reCAPTCHA `siteverify` protocol.
pub struct SiteVerifyClient {
    client: reqwest::Client,
    verify_url: String,
    secret: String,
}

impl SiteVerifyClient {
    pub fn new(client: reqwest::Client, verify_url: String, secret: String) -> Self {
        Self {
            client,
            verify_url,
            secret,
        }
    }

    async fn request(&self, token: &str) -> Result<CaptchaResult, reqwest::Error> {
        self.client
            .post(&self.verify_url)
            .form(&[("secret", self.secret.as_str()), ("response", token)])
            .send()
            .await?
            .json::<CaptchaResult>()
            .await
    }
}

#[async_trait]
impl CaptchaVerifier for SiteVerifyClient {
    async fn verify(&self, token: &str) -> CaptchaResult {
        match self.request(token).await {
            Ok(result) => {
                tracing::debug!(success = result.success, score = result.score, "Captcha verified");
                result
            }
            Err(e) => {
                tracing::warn!("Captcha verification request failed: {e}");
                CaptchaResult::default()
            }
        }
    }
}
