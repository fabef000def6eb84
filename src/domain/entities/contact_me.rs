use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::errors::RelayError;

/// Contact form payload as posted by the site. Every field is optional on the
/// wire so that absent and empty values are reported the same way.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct ContactMeForm {
    #[serde(default, deserialize_with = "lenient_text")]
    pub from_name: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub reply_to: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub subject: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub message: Option<String>,

    /// reCAPTCHA response token.
    #[serde(default, deserialize_with = "lenient_text")]
    pub token: Option<String>,
}

impl ContactMeForm {
    /// Reads a posted body. Only syntactically broken JSON is an error: an
    /// empty body or a non-object document reads as an empty form.
    pub fn from_body(body: &[u8]) -> Result<Self, serde_json::Error> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(ContactMeForm::default());
        }

        match serde_json::from_slice::<Value>(body)? {
            object @ Value::Object(_) => serde_json::from_value(object),
            _ => Ok(ContactMeForm::default()),
        }
    }
}

/// Numbers and booleans are taken as their text; null, arrays and objects
/// count as absent.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    })
}

/// A submission whose required fields are present and within bounds.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct ContactSubmission {
    #[validate(length(max = 120))]
    pub from_name: String,

    pub reply_to: String,

    #[validate(length(max = 150))]
    pub subject: Option<String>,

    #[validate(length(max = 5000))]
    pub message: String,

    pub captcha_token: Option<String>,
}

impl TryFrom<ContactMeForm> for ContactSubmission {
    type Error = RelayError;

    fn try_from(form: ContactMeForm) -> Result<Self, Self::Error> {
        let (Some(from_name), Some(reply_to), Some(message)) = (
            non_empty(form.from_name),
            non_empty(form.reply_to),
            non_empty(form.message),
        ) else {
            return Err(RelayError::MissingFields);
        };

        let submission = ContactSubmission {
            from_name,
            reply_to,
            subject: non_empty(form.subject),
            message,
            captcha_token: non_empty(form.token),
        };
        submission.validate()?;

        Ok(submission)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ContactMeResponse {
    pub ok: bool,
    pub message: String,
}

impl ContactMeResponse {
    pub fn delivered() -> Self {
        ContactMeResponse {
            ok: true,
            message: "Message sent and acknowledgment email delivered!".to_string(),
        }
    }
}
