// In-memory NewsStore, used when no news file is configured.
// The feed is lost on restart.

use crate::core::news::{NewsFeed, NewsItem, NewsStore, StoreError};
use async_trait::async_trait;
use tokio::sync::RwLock;

pub struct InMemoryNewsStore {
    feed: RwLock<NewsFeed>,
}

impl InMemoryNewsStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            feed: RwLock::new(NewsFeed::new(capacity)),
        }
    }
}

#[async_trait]
impl NewsStore for InMemoryNewsStore {
    async fn list(&self) -> Result<Vec<NewsItem>, StoreError> {
        Ok(self.feed.read().await.items().to_vec())
    }

    async fn push(&self, item: NewsItem) -> Result<(), StoreError> {
        self.feed.write().await.push(item);
        Ok(())
    }
}
