use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use contact_relay::captcha::{CaptchaResult, CaptchaVerifier};
use contact_relay::config::{CaptchaConfig, Config, MailConfig, RateLimitConfig, DEFAULT_VERIFY_URL};
use contact_relay::email::{DispatchError, EmailDispatcher, OutboundEmail};
use contact_relay::rate_limit::RateLimiter;
use contact_relay::state::AppState;

/// Dispatcher that records every message instead of sending it.
#[derive(Default)]
pub struct RecordingDispatcher {
    pub sent: Mutex<Vec<OutboundEmail>>,
    pub fail: bool,
}

impl RecordingDispatcher {
    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl EmailDispatcher for RecordingDispatcher {
    async fn send(&self, email: &OutboundEmail) -> Result<(), DispatchError> {
        if self.fail {
            return Err(DispatchError::from("relay unavailable".to_string()));
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

/// Verifier that returns a fixed result and counts calls.
pub struct StubCaptcha {
    pub result: CaptchaResult,
    pub calls: Mutex<Vec<String>>,
}

#[async_trait]
impl CaptchaVerifier for StubCaptcha {
    async fn verify(&self, token: &str) -> CaptchaResult {
        self.calls.lock().unwrap().push(token.to_string());
        self.result
    }
}

/// A running test server instance.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub dispatcher: Arc<RecordingDispatcher>,
    pub captcha: Option<Arc<StubCaptcha>>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Post JSON to the contact endpoint from the given client address.
    pub async fn submit_from(&self, ip: &str, data: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/api/contact"))
            .header("x-forwarded-for", ip)
            .json(data)
            .send()
            .await
            .expect("submit request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn submit(&self, data: &Value) -> (Value, StatusCode) {
        self.submit_from("203.0.113.9", data).await
    }
}

pub fn test_config() -> Config {
    Config {
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        log_level: "warn".to_string(),
        max_body_size: 16_384,
        rate_limit: RateLimitConfig::default(),
        mail: MailConfig {
            sender: "noreply@firm.example".to_string(),
            recipients: vec![
                "intake@firm.example".to_string(),
                "partner@firm.example".to_string(),
            ],
        },
        smtp: None,
        captcha: CaptchaConfig {
            secret: None,
            verify_url: DEFAULT_VERIFY_URL.to_string(),
            min_score: 0.5,
        },
        blocklist: vec!["blocked@bad.example".to_string()],
        http_timeout_secs: 5,
    }
}

/// A well-formed submission that passes every check.
pub fn valid_submission() -> Value {
    json!({
        "firstName": "Jane",
        "lastName": "Doe",
        "email": "jane.doe@example.com",
        "phone": "(316) 684-4400",
        "zipCode": "67202",
        "caseType": "Personal Injury",
        "description": "I was injured in a car accident on Kellogg and need advice.",
    })
}

pub async fn spawn_app() -> TestApp {
    spawn_with(test_config(), None, false).await
}

pub async fn spawn_with(config: Config, captcha: Option<CaptchaResult>, dispatch_fails: bool) -> TestApp {
    let dispatcher = Arc::new(RecordingDispatcher {
        fail: dispatch_fails,
        ..Default::default()
    });
    let captcha = captcha.map(|result| {
        Arc::new(StubCaptcha {
            result,
            calls: Mutex::new(Vec::new()),
        })
    });

    let state = Arc::new(AppState::new(
        config,
        RateLimiter::in_memory(),
        captcha.clone().map(|c| c as Arc<dyn CaptchaVerifier>),
        Some(dispatcher.clone() as Arc<dyn EmailDispatcher>),
    ));

    serve(contact_relay::build_router(state), dispatcher, captcha).await
}

pub async fn serve(
    app: axum::Router,
    dispatcher: Arc<RecordingDispatcher>,
    captcha: Option<Arc<StubCaptcha>>,
) -> TestApp {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    TestApp {
        addr,
        client: Client::new(),
        dispatcher,
        captcha,
    }
}
