use async_trait::async_trait;

use crate::errors::CaptchaError;

#[async_trait]
pub trait CaptchaVerifier: Send + Sync {
    /// Returns the provider's verdict on `token`. `Err` means no verdict could
    /// be obtained at all.
    async fn verify(&self, token: &str) -> Result<bool, CaptchaError>;
}
