use std::sync::Arc;

use crate::captcha::CaptchaVerifier;
use crate::config::Config;
use crate::email::EmailDispatcher;
use crate::rate_limit::RateLimiter;
use crate::submission::blocklist::Blocklist;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub limiter: RateLimiter,
    pub blocklist: Blocklist,
    /// `None` when no captcha secret is configured.
    pub captcha: Option<Arc<dyn CaptchaVerifier>>,
    /// `None` when no email credentials are configured.
    pub dispatcher: Option<Arc<dyn EmailDispatcher>>,
}

impl AppState {
    pub fn new(
        config: Config,
        limiter: RateLimiter,
        captcha: Option<Arc<dyn CaptchaVerifier>>,
        dispatcher: Option<Arc<dyn EmailDispatcher>>,
    ) -> Self {
        let blocklist = Blocklist::new(&config.blocklist);
        Self {
            config,
            limiter,
            blocklist,
            captcha,
            dispatcher,
        }
    }
}
