use actix_web::http::header::HeaderValue;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use dotenv::dotenv;
use std::{env, fmt, str::FromStr, time::Duration};

use crate::constants::{RECAPTCHA_VERIFY_URL, SENDGRID_API_URL};

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "testing" => Ok(AppEnvironment::Testing),
            _ => Err(ConfigError::Message(format!("Invalid environment: {}", s))),
        }
    }
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    /// Resolved from `APP_ENV` before deserializing, case-insensitively.
    #[serde(skip, default = "default_env")]
    pub env: AppEnvironment,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    /// Origin advertised in `Access-Control-Allow-Origin`. When unset the
    /// request's own `Origin` is echoed.
    #[serde(default)]
    pub allowed_origin: Option<String>,

    #[serde(default)]
    pub sendgrid_api_key: String,

    #[serde(default = "default_sendgrid_api_url")]
    pub sendgrid_api_url: String,

    /// Owner address receiving the notification email.
    #[serde(default)]
    pub notify_to: String,

    /// Verified sender address used as `from` on both emails.
    #[serde(default)]
    pub mail_from: String,

    #[serde(default = "default_owner_name")]
    pub owner_name: String,

    /// Verification is skipped entirely when this is absent.
    #[serde(default)]
    pub recaptcha_secret: Option<String>,

    #[serde(default = "default_recaptcha_verify_url")]
    pub recaptcha_verify_url: String,

    #[serde(default = "default_rate_limit_window")]
    pub rate_limit_window_secs: u64,

    #[serde(default = "default_rate_limit_max")]
    pub rate_limit_max_requests: u32,

    #[serde(default = "default_rate_limit_eviction")]
    pub rate_limit_eviction_secs: u64,

    #[serde(default = "default_trust_forwarded_for")]
    pub trust_forwarded_for: bool,

    #[serde(default = "default_outbound_timeout")]
    pub outbound_timeout_secs: u64,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_name() -> String {
    "Portfolio-Contact".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_worker_count() -> usize {
    num_cpus::get()
}
fn default_sendgrid_api_url() -> String {
    SENDGRID_API_URL.to_string()
}
fn default_owner_name() -> String {
    "Portfolio Owner".to_string()
}
fn default_recaptcha_verify_url() -> String {
    RECAPTCHA_VERIFY_URL.to_string()
}
fn default_rate_limit_window() -> u64 {
    60
}
fn default_rate_limit_max() -> u32 {
    5
}
fn default_rate_limit_eviction() -> u64 {
    300
}
fn default_trust_forwarded_for() -> bool {
    true
}
fn default_outbound_timeout() -> u64 {
    10
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let raw_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        Self::load(&raw_env, env_source())
    }

    fn load(raw_env: &str, env_source: Environment) -> Result<Self, ConfigError> {
        let env_name = AppEnvironment::from_str(raw_env)
            .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", raw_env)))?;

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name)).required(false))
            .add_source(env_source);

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;
        config.recaptcha_secret = config.recaptcha_secret
            .filter(|secret| !secret.trim().is_empty());

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.sendgrid_api_key.trim().is_empty() {
            errors.push("SENDGRID_API_KEY must be set");
        }
        if self.notify_to.trim().is_empty() {
            errors.push("NOTIFY_TO must be set");
        }
        if self.mail_from.trim().is_empty() {
            errors.push("MAIL_FROM must be set");
        }
        if self.worker_count == 0 {
            errors.push("WORKER_COUNT must be greater than zero");
        }
        if self.rate_limit_window_secs == 0 {
            errors.push("RATE_LIMIT_WINDOW_SECS must be greater than zero");
        }
        if self.rate_limit_max_requests == 0 {
            errors.push("RATE_LIMIT_MAX_REQUESTS must be greater than zero");
        }
        match self.cors_origin() {
            Some(origin) if HeaderValue::from_str(origin).is_err() => {
                errors.push("ALLOWED_ORIGIN is not a valid header value");
            }
            Some("*") | None if self.is_production() => {
                errors.push("ALLOWED_ORIGIN must name a single origin in production");
            }
            _ => {}
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(errors.join(", ")))
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnvironment::Production
    }

    pub fn captcha_enabled(&self) -> bool {
        self.recaptcha_secret.is_some()
    }

    pub fn cors_origin(&self) -> Option<&str> {
        self.allowed_origin
            .as_deref()
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_secs)
    }

    pub fn rate_limit_eviction_interval(&self) -> Duration {
        Duration::from_secs(self.rate_limit_eviction_secs.max(1))
    }

    pub fn outbound_timeout(&self) -> Duration {
        Duration::from_secs(self.outbound_timeout_secs.max(1))
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("APP")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
        .ignore_empty(true)
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Testing => "testing",
        };
        write!(f, "{s}")
    }
}

trait Redact {
    fn redact(&self) -> &str;
}

impl Redact for str {
    fn redact(&self) -> &str {
        if self.is_empty() {
            "[MISSING]"
        } else {
            "[REDACTED]"
        }
    }
}

impl Redact for String {
    fn redact(&self) -> &str {
        self.as_str().redact()
    }
}

impl Redact for Option<String> {
    fn redact(&self) -> &str {
        match self {
            Some(secret) => secret.redact(),
            None => "[DISABLED]",
        }
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("name", &self.name)
            .field("port", &self.port)
            .field("host", &self.host)
            .field("worker_count", &self.worker_count)
            .field("allowed_origin", &self.cors_origin())
            .field("sendgrid_api_key", &self.sendgrid_api_key.redact())
            .field("sendgrid_api_url", &self.sendgrid_api_url)
            .field("notify_to", &self.notify_to)
            .field("mail_from", &self.mail_from)
            .field("owner_name", &self.owner_name)
            .field("recaptcha_secret", &self.recaptcha_secret.redact())
            .field("recaptcha_verify_url", &self.recaptcha_verify_url)
            .field("rate_limit_window_secs", &self.rate_limit_window_secs)
            .field("rate_limit_max_requests", &self.rate_limit_max_requests)
            .field("rate_limit_eviction_secs", &self.rate_limit_eviction_secs)
            .field("trust_forwarded_for", &self.trust_forwarded_for)
            .field("outbound_timeout_secs", &self.outbound_timeout_secs)
            .finish()
    }
}
