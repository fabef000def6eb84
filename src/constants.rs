use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

/// JSON body ceiling enforced by the extractor, before field validation runs.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

pub const SUBJECT_PREFIX: &str = "[Portfolio]";

pub const SENDGRID_API_URL: &str = "https://api.sendgrid.com/v3/mail/send";
pub const RECAPTCHA_VERIFY_URL: &str = "https://www.google.com/recaptcha/api/siteverify";
