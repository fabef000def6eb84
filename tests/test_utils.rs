#![allow(dead_code)]

use actix_web::{middleware::NormalizePath, web, App, HttpResponse, HttpServer};
use parking_lot::Mutex;
use portfolio_contact::{
    middlewares::cors::CorsHeaders,
    routes::configure_routes,
    settings::{AppConfig, AppEnvironment},
    AppState,
};
use reqwest::Client;
use serde_json::{json, Value};
use std::{
    collections::HashMap,
    net::TcpListener,
    sync::{atomic::{AtomicBool, Ordering}, Arc},
    time::Duration,
};

pub const DEFAULT_CLIENT_IP: &str = "203.0.113.1";
pub const OWNER: &str = "owner@example.com";
pub const SENDER: &str = "ada@example.com";

/// What the fake SendGrid / reCAPTCHA endpoints have seen, plus knobs to make
/// them misbehave.
pub struct ProviderState {
    pub mails: Mutex<Vec<Value>>,
    pub captcha_calls: Mutex<Vec<HashMap<String, String>>>,
    pub captcha_success: AtomicBool,
    pub failing_recipient: Mutex<Option<String>>,
}

pub struct FakeProviders {
    pub address: String,
    pub state: Arc<ProviderState>,
}

impl FakeProviders {
    pub async fn spawn() -> Self {
        let state = Arc::new(ProviderState {
            mails: Mutex::new(Vec::new()),
            captcha_calls: Mutex::new(Vec::new()),
            captcha_success: AtomicBool::new(true),
            failing_recipient: Mutex::new(None),
        });

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let state_clone = state.clone();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(web::Data::from(state_clone.clone()))
                .route("/v3/mail/send", web::post().to(fake_mail_send))
                .route("/recaptcha/api/siteverify", web::post().to(fake_siteverify))
        })
        .listen(listener)
        .expect("Failed to bind fake provider server")
        .workers(1)
        .disable_signals()
        .run();

        actix_rt::spawn(server);

        Self { address, state }
    }

    pub fn mails(&self) -> Vec<Value> {
        self.state.mails.lock().clone()
    }

    pub fn mail_to(&self, recipient: &str) -> Value {
        self.mails()
            .into_iter()
            .find(|mail| mail["personalizations"][0]["to"][0]["email"] == recipient)
            .unwrap_or_else(|| panic!("No mail sent to {}", recipient))
    }

    pub fn captcha_calls(&self) -> Vec<HashMap<String, String>> {
        self.state.captcha_calls.lock().clone()
    }

    pub fn set_captcha_success(&self, success: bool) {
        self.state.captcha_success.store(success, Ordering::SeqCst);
    }

    pub fn fail_mail_to(&self, recipient: Option<&str>) {
        *self.state.failing_recipient.lock() = recipient.map(str::to_string);
    }
}

async fn fake_mail_send(state: web::Data<ProviderState>, body: web::Json<Value>) -> HttpResponse {
    let recipient = body["personalizations"][0]["to"][0]["email"]
        .as_str()
        .unwrap_or_default()
        .to_string();
    state.mails.lock().push(body.into_inner());

    if state.failing_recipient.lock().as_deref() == Some(recipient.as_str()) {
        HttpResponse::InternalServerError().body("upstream exploded")
    } else {
        HttpResponse::Accepted().finish()
    }
}

async fn fake_siteverify(
    state: web::Data<ProviderState>,
    form: web::Form<HashMap<String, String>>,
) -> HttpResponse {
    state.captcha_calls.lock().push(form.into_inner());

    if state.captcha_success.load(Ordering::SeqCst) {
        HttpResponse::Ok().json(json!({"success": true, "hostname": "localhost"}))
    } else {
        HttpResponse::Ok().json(json!({"success": false, "error-codes": ["invalid-input-response"]}))
    }
}

pub struct TestApp {
    pub state: web::Data<AppState>,
    pub address: String,
    pub client: Client,
    pub config: AppConfig,
    pub providers: FakeProviders,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(|_| {}).await
    }

    pub async fn spawn_with(customize: impl FnOnce(&mut AppConfig)) -> Self {
        let providers = FakeProviders::spawn().await;

        let mut config = test_config(&providers.address);
        customize(&mut config);

        let state = web::Data::new(AppState::new(&config).expect("Failed to build app state"));

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let state_clone = state.clone();
        let cors = CorsHeaders::new(config.cors_origin());
        let server = HttpServer::new(move || {
            App::new()
                .app_data(state_clone.clone())
                .wrap(NormalizePath::trim())
                .wrap(cors.clone())
                .configure(configure_routes)
        })
        .listen(listener)
        .expect("Failed to bind server")
        .workers(config.worker_count)
        .disable_signals()
        .run();

        actix_rt::spawn(server);

        let client = Client::new();
        while client.get(&format!("{}/health", address)).send().await.is_err() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        Self {
            state,
            address,
            client,
            config,
            providers,
        }
    }

    pub fn contact_url(&self) -> String {
        format!("{}/api/contact", self.address)
    }

    pub async fn post_contact(&self, body: &Value) -> reqwest::Response {
        self.post_contact_from(DEFAULT_CLIENT_IP, body).await
    }

    pub async fn post_contact_from(&self, client_ip: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(self.contact_url())
            .header("X-Forwarded-For", client_ip)
            .json(body)
            .send()
            .await
            .expect("Failed to post contact form")
    }
}

fn test_config(provider_address: &str) -> AppConfig {
    AppConfig {
        env: AppEnvironment::Testing,
        name: "Portfolio Contact Test".to_string(),
        port: 0,
        host: "127.0.0.1".to_string(),
        worker_count: 1,
        allowed_origin: None,
        sendgrid_api_key: "SG.test-key".into(),
        sendgrid_api_url: format!("{}/v3/mail/send", provider_address),
        notify_to: OWNER.into(),
        mail_from: "noreply@example.com".into(),
        owner_name: "Jane Doe".into(),
        recaptcha_secret: None,
        recaptcha_verify_url: format!("{}/recaptcha/api/siteverify", provider_address),
        rate_limit_window_secs: 60,
        rate_limit_max_requests: 5,
        rate_limit_eviction_secs: 300,
        trust_forwarded_for: true,
        outbound_timeout_secs: 5,
    }
}

pub fn valid_form() -> Value {
    json!({
        "from_name": "Ada Lovelace",
        "reply_to": SENDER,
        "subject": "Collaboration",
        "message": "I enjoyed your portfolio.",
        "token": "captcha-token"
    })
}
