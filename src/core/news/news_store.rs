use super::news_models::NewsItem;
use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Storage for the rolling news log. Implementations own the capacity bound.
#[async_trait]
pub trait NewsStore: Send + Sync {
    /// All stored items, newest first.
    async fn list(&self) -> Result<Vec<NewsItem>, StoreError>;
    /// Inserts `item` at the front, evicting the oldest entry when full.
    async fn push(&self, item: NewsItem) -> Result<(), StoreError>;
}

// Lets the composition root pick a store at runtime.
#[async_trait]
impl NewsStore for Box<dyn NewsStore> {
    async fn list(&self) -> Result<Vec<NewsItem>, StoreError> {
        (**self).list().await
    }

    async fn push(&self, item: NewsItem) -> Result<(), StoreError> {
        (**self).push(item).await
    }
}
