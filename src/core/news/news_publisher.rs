use super::news_models::{DeliveryMethod, OutboundMessage};
use async_trait::async_trait;

/// Why a message did not reach Discord.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("Discord API error: {status} - {body}")]
    Rejected { status: u16, body: String },
}

#[async_trait]
pub trait NewsPublisher: Send + Sync {
    /// Sends one message. Implementations make exactly one outbound call and
    /// never retry.
    async fn publish(&self, message: &OutboundMessage) -> Result<(), PublishError>;

    fn method(&self) -> DeliveryMethod;
}

#[async_trait]
impl NewsPublisher for Box<dyn NewsPublisher> {
    async fn publish(&self, message: &OutboundMessage) -> Result<(), PublishError> {
        (**self).publish(message).await
    }

    fn method(&self) -> DeliveryMethod {
        (**self).method()
    }
}
