use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse
};
use derive_more::Display;
use validator::ValidationErrors;

/// Terminal outcome of a contact submission that did not succeed.
///
/// Client errors carry a fixed, descriptive message. Everything that goes
/// wrong downstream collapses into `Internal`, whose detail is logged but
/// never rendered.
#[derive(Debug, Display)]
pub enum RelayError {
    #[display("Method Not Allowed")]
    MethodNotAllowed,

    #[display("Too many requests. Please try again later.")]
    TooManyRequests,

    #[display("Invalid JSON payload.")]
    InvalidJson,

    #[display("Missing required fields.")]
    MissingFields,

    #[display("Payload too large.")]
    PayloadTooLarge,

    #[display("reCAPTCHA failed")]
    CaptchaFailed,

    #[display("Server error")]
    Internal(String),
}

impl RelayError {
    pub fn internal(detail: impl Into<String>) -> Self {
        RelayError::Internal(detail.into())
    }
}

impl ResponseError for RelayError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(serde_json::json!({"error": self.to_string()}))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            RelayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            RelayError::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            RelayError::InvalidJson => StatusCode::BAD_REQUEST,
            RelayError::MissingFields => StatusCode::BAD_REQUEST,
            RelayError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            RelayError::CaptchaFailed => StatusCode::BAD_REQUEST,
            RelayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationErrors> for RelayError {
    fn from(_: ValidationErrors) -> Self {
        RelayError::PayloadTooLarge
    }
}

impl From<MailError> for RelayError {
    fn from(err: MailError) -> Self {
        RelayError::Internal(err.to_string())
    }
}

impl From<CaptchaError> for RelayError {
    fn from(err: CaptchaError) -> Self {
        RelayError::Internal(err.to_string())
    }
}

#[derive(Debug, Display)]
pub enum MailError {
    #[display("Mail transport failed: {_0}")]
    Transport(String),

    #[display("Mail provider rejected message ({status}): {body}")]
    Rejected { status: u16, body: String },
}

impl From<reqwest::Error> for MailError {
    fn from(err: reqwest::Error) -> Self {
        MailError::Transport(err.to_string())
    }
}

#[derive(Debug, Display)]
pub enum CaptchaError {
    #[display("Captcha verification request failed: {_0}")]
    Transport(String),

    #[display("Captcha verification response unreadable: {_0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for CaptchaError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            CaptchaError::InvalidResponse(err.to_string())
        } else {
            CaptchaError::Transport(err.to_string())
        }
    }
}
