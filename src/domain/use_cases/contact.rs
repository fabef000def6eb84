use crate::{
    entities::contact_me::{ContactMeForm, ContactMeResponse, ContactSubmission},
    errors::RelayError,
    repositories::{captcha::CaptchaVerifier, mailer::EmailSender, rate_limit::RateLimiter},
    settings::AppConfig,
    templates::{acknowledgment_email, notification_email},
};

/// Addresses and names the relay needs to build its two emails.
#[derive(Debug, Clone)]
pub struct ContactMeConfig {
    pub notify_to: String,
    pub mail_from: String,
    pub owner_name: String,
}

impl From<&AppConfig> for ContactMeConfig {
    fn from(config: &AppConfig) -> Self {
        ContactMeConfig {
            notify_to: config.notify_to.clone(),
            mail_from: config.mail_from.clone(),
            owner_name: config.owner_name.clone(),
        }
    }
}

pub struct ContactMeHandler<L, C, M>
where
    L: RateLimiter,
    C: CaptchaVerifier,
    M: EmailSender,
{
    pub rate_limiter: L,
    /// `None` when no verification secret is configured.
    pub captcha: Option<C>,
    pub mailer: M,
    config: ContactMeConfig,
}

impl<L, C, M> ContactMeHandler<L, C, M>
where
    L: RateLimiter,
    C: CaptchaVerifier,
    M: EmailSender,
{
    pub fn new(config: ContactMeConfig, rate_limiter: L, captcha: Option<C>, mailer: M) -> Self {
        ContactMeHandler {
            rate_limiter,
            captcha,
            mailer,
            config,
        }
    }

    pub fn captcha_enabled(&self) -> bool {
        self.captcha.is_some()
    }

    /// Runs one submission through rate limiting, validation, optional
    /// captcha verification and email dispatch, stopping at the first failure.
    pub async fn submit(
        &self,
        client_ip: &str,
        form: ContactMeForm,
    ) -> Result<ContactMeResponse, RelayError> {
        if !self.rate_limiter.allow(client_ip).await {
            tracing::warn!(client_ip, "Contact submission rate limited");
            return Err(RelayError::TooManyRequests);
        }

        let submission = ContactSubmission::try_from(form)?;

        self.verify_captcha(&submission).await?;
        self.dispatch(&submission).await?;

        tracing::info!(client_ip, "Contact message relayed");
        Ok(ContactMeResponse::delivered())
    }

    /// Verification is opportunistic: it only happens when both a verifier and
    /// a token are present.
    async fn verify_captcha(&self, submission: &ContactSubmission) -> Result<(), RelayError> {
        let (Some(verifier), Some(token)) = (&self.captcha, submission.captcha_token.as_deref())
        else {
            return Ok(());
        };

        let passed = verifier.verify(token).await.map_err(|e| {
            tracing::error!("Captcha verification error: {}", e);
            RelayError::from(e)
        })?;

        if passed {
            Ok(())
        } else {
            tracing::warn!("Captcha rejected by provider");
            Err(RelayError::CaptchaFailed)
        }
    }

    /// Sends the owner notification and the sender acknowledgment concurrently.
    /// Both sends settle before returning; either failing fails the request.
    async fn dispatch(&self, submission: &ContactSubmission) -> Result<(), RelayError> {
        let notification =
            notification_email(submission, &self.config.notify_to, &self.config.mail_from);
        let acknowledgment =
            acknowledgment_email(submission, &self.config.mail_from, &self.config.owner_name);

        let (notified, acknowledged) = futures::join!(
            self.mailer.send(&notification),
            self.mailer.send(&acknowledgment)
        );

        let failures: Vec<String> = [("notification", notified), ("acknowledgment", acknowledged)]
            .into_iter()
            .filter_map(|(kind, result)| result.err().map(|e| format!("{kind}: {e}")))
            .collect();

        if failures.is_empty() {
            return Ok(());
        }

        let detail = failures.join("; ");
        tracing::error!("Email dispatch failed: {}", detail);
        Err(RelayError::internal(detail))
    }
}
