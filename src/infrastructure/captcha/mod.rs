pub mod recaptcha;
