use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use zeroize::Zeroizing;

use crate::{errors::CaptchaError, repositories::captcha::CaptchaVerifier, settings::AppConfig};

/// Server-side reCAPTCHA `siteverify` client.
#[derive(Clone)]
pub struct RecaptchaClient {
    client: reqwest::Client,
    secret: Arc<Zeroizing<String>>,
    verify_url: String,
}

#[derive(Debug, Deserialize)]
struct SiteVerifyResponse {
    success: bool,
    #[serde(default, rename = "error-codes")]
    error_codes: Vec<String>,
}

impl RecaptchaClient {
    pub fn new(client: reqwest::Client, secret: String, verify_url: String) -> Self {
        RecaptchaClient {
            client,
            secret: Arc::new(Zeroizing::new(secret)),
            verify_url,
        }
    }

    /// Builds a client only when a secret is configured.
    pub fn from_config(client: reqwest::Client, config: &AppConfig) -> Option<Self> {
        config.recaptcha_secret.as_ref().map(|secret| {
            RecaptchaClient::new(client, secret.clone(), config.recaptcha_verify_url.clone())
        })
    }
}

#[async_trait]
impl CaptchaVerifier for RecaptchaClient {
    async fn verify(&self, token: &str) -> Result<bool, CaptchaError> {
        let params = [("secret", self.secret.as_str()), ("response", token)];

        let verdict: SiteVerifyResponse = self.client
            .post(&self.verify_url)
            .form(&params)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if !verdict.success {
            tracing::debug!(error_codes = ?verdict.error_codes, "reCAPTCHA verification unsuccessful");
        }

        Ok(verdict.success)
    }
}
