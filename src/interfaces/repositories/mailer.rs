use async_trait::async_trait;

use crate::{entities::email::OutboundEmail, errors::MailError};

#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Hands one message to the provider. `Ok` only means it was accepted.
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailError>;
}
