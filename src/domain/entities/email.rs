use serde::Serialize;

/// A single message handed to the mail provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundEmail {
    pub to: String,
    pub from: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub text: String,
    pub html: String,
}
