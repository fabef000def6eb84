mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod telemetry;
pub mod graceful_shutdown;
pub mod background_task;

pub use domain::{entities, templates, use_cases};
pub use interfaces::{handlers, middlewares, repositories, routes};
pub use infrastructure::{captcha, limiter, mail, utils};

use captcha::recaptcha::RecaptchaClient;
use limiter::rate_limiter::FixedWindowLimiter;
use mail::sendgrid::SendGridMailer;
use use_cases::contact::{ContactMeConfig, ContactMeHandler};
use utils::http_client::build_http_client;

pub struct AppState {
    pub contact_handler: AppContactHandler,
    pub trust_forwarded_for: bool,
}

pub type AppContactHandler = ContactMeHandler<FixedWindowLimiter, RecaptchaClient, SendGridMailer>;

impl AppState {
    pub fn new(config: &settings::AppConfig) -> anyhow::Result<Self> {
        let http = build_http_client(config.outbound_timeout())?;

        let rate_limiter = FixedWindowLimiter::new(
            config.rate_limit_window(),
            config.rate_limit_max_requests,
        );
        let captcha = RecaptchaClient::from_config(http.clone(), config);
        let mailer = SendGridMailer::from_config(http, config);

        if captcha.is_none() {
            tracing::warn!("RECAPTCHA_SECRET not set; contact submissions will not be verified");
        }

        let contact_handler = ContactMeHandler::new(
            ContactMeConfig::from(config),
            rate_limiter,
            captcha,
            mailer,
        );

        Ok(AppState {
            contact_handler,
            trust_forwarded_for: config.trust_forwarded_for,
        })
    }
}
