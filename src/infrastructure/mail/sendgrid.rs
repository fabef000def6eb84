use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use zeroize::Zeroizing;

use crate::{
    entities::email::OutboundEmail,
    errors::MailError,
    repositories::mailer::EmailSender,
    settings::AppConfig,
};

/// Relays messages through the SendGrid v3 `mail/send` API.
#[derive(Clone)]
pub struct SendGridMailer {
    client: reqwest::Client,
    api_key: Arc<Zeroizing<String>>,
    api_url: String,
}

#[derive(Debug, Serialize)]
struct Address<'a> {
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct Personalization<'a> {
    to: [Address<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(rename = "type")]
    mime: &'static str,
    value: &'a str,
}

#[derive(Debug, Serialize)]
struct MailSendRequest<'a> {
    personalizations: [Personalization<'a>; 1],
    from: Address<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<Address<'a>>,
    subject: &'a str,
    content: [Content<'a>; 2],
}

impl<'a> From<&'a OutboundEmail> for MailSendRequest<'a> {
    fn from(email: &'a OutboundEmail) -> Self {
        MailSendRequest {
            personalizations: [Personalization {
                to: [Address { email: &email.to }],
            }],
            from: Address { email: &email.from },
            reply_to: email.reply_to.as_deref().map(|email| Address { email }),
            subject: &email.subject,
            content: [
                Content { mime: "text/plain", value: &email.text },
                Content { mime: "text/html", value: &email.html },
            ],
        }
    }
}

impl SendGridMailer {
    pub fn new(client: reqwest::Client, api_key: String, api_url: String) -> Self {
        SendGridMailer {
            client,
            api_key: Arc::new(Zeroizing::new(api_key)),
            api_url,
        }
    }

    pub fn from_config(client: reqwest::Client, config: &AppConfig) -> Self {
        SendGridMailer::new(
            client,
            config.sendgrid_api_key.clone(),
            config.sendgrid_api_url.clone(),
        )
    }
}

#[async_trait]
impl EmailSender for SendGridMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailError> {
        let response = self.client
            .post(&self.api_url)
            .bearer_auth(self.api_key.as_str())
            .json(&MailSendRequest::from(email))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(MailError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_body_matches_v3_shape() {
        let email = OutboundEmail {
            to: "owner@example.com".into(),
            from: "noreply@example.com".into(),
            reply_to: Some("ada@example.com".into()),
            subject: "[Portfolio] Hi".into(),
            text: "plain".into(),
            html: "<p>html</p>".into(),
        };

        let body = serde_json::to_value(MailSendRequest::from(&email)).unwrap();
        assert_eq!(
            body,
            json!({
                "personalizations": [{"to": [{"email": "owner@example.com"}]}],
                "from": {"email": "noreply@example.com"},
                "reply_to": {"email": "ada@example.com"},
                "subject": "[Portfolio] Hi",
                "content": [
                    {"type": "text/plain", "value": "plain"},
                    {"type": "text/html", "value": "<p>html</p>"}
                ]
            })
        );
    }

    #[test]
    fn reply_to_is_omitted_when_absent() {
        let email = OutboundEmail {
            to: "ada@example.com".into(),
            from: "noreply@example.com".into(),
            reply_to: None,
            subject: "Thanks".into(),
            text: "plain".into(),
            html: "html".into(),
        };

        let body = serde_json::to_value(MailSendRequest::from(&email)).unwrap();
        assert!(body.get("reply_to").is_none());
    }
}
