pub mod captcha;
pub mod config;
pub mod email;
pub mod error;
pub mod models;
pub mod rate_limit;
pub mod routes;
pub mod state;
pub mod submission;

use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderName, HeaderValue, header};
use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::captcha::{CaptchaVerifier, SiteVerifyClient};
use crate::config::Config;
use crate::email::{EmailDispatcher, SmtpDispatcher};
use crate::rate_limit::RateLimiter;
use crate::state::{AppState, SharedState};

/// Wire production collaborators from configuration. Missing credentials
/// leave the collaborator unset; requests that need it fail then.
pub fn build_app(config: Config) -> Result<Router, String> {
    let captcha = match config.captcha.secret.clone() {
        Some(secret) => {
            let client = reqwest::Client::builder()
                .timeout(Duration::from_secs(config.http_timeout_secs))
                .build()
                .map_err(|e| format!("Failed to build HTTP client: {e}"))?;
            tracing::info!("Captcha verification enabled");
            Some(Arc::new(SiteVerifyClient::new(
                client,
                config.captcha.verify_url.clone(),
                secret,
            )) as Arc<dyn CaptchaVerifier>)
        }
        None => {
            tracing::warn!("CAPTCHA_SECRET_KEY not set; submissions carrying a token will fail");
            None
        }
    };

    let dispatcher = config.smtp.as_ref().and_then(|smtp| match SmtpDispatcher::new(smtp) {
        Ok(dispatcher) => {
            tracing::info!("SMTP relay configured");
            Some(Arc::new(dispatcher) as Arc<dyn EmailDispatcher>)
        }
        Err(e) => {
            tracing::warn!("SMTP relay not available: {e}");
            None
        }
    });
    if config.smtp.is_none() {
        tracing::warn!("SMTP credentials not set; submissions cannot be relayed");
    }

    let state: SharedState = Arc::new(AppState::new(
        config,
        RateLimiter::in_memory(),
        captcha,
        dispatcher,
    ));

    Ok(build_router(state))
}

pub fn build_router(state: SharedState) -> Router {
    let max_body_size = state.config.max_body_size;

    Router::new()
        .merge(routes::contact_routes())
        .route("/health", axum::routing::get(health))
        .fallback(routes::contact::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(SetResponseHeaderLayer::overriding(
                    header::ACCESS_CONTROL_ALLOW_ORIGIN,
                    HeaderValue::from_static("*"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::ACCESS_CONTROL_ALLOW_METHODS,
                    HeaderValue::from_static("POST, OPTIONS"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::ACCESS_CONTROL_ALLOW_HEADERS,
                    HeaderValue::from_static("Content-Type"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("application/json"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    HeaderName::from_static("x-content-type-options"),
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(DefaultBodyLimit::max(max_body_size)),
        )
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
