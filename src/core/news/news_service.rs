// News relay core - forwards posts to Discord and keeps the local feed.
//
// Platform-agnostic: the HTTP layer hands requests in, the infra layer
// provides the Discord client and the store.

use super::news_models::{
    NewsItem, OutboundMessage, PostNewsRequest, PostOutcome, DISCORD_MESSAGE_LIMIT,
};
use super::news_publisher::{NewsPublisher, PublishError};
use super::news_store::NewsStore;
use chrono::Utc;

#[derive(Debug, thiserror::Error)]
pub enum NewsError {
    #[error("Discord bot not configured")]
    NotConfigured,
    #[error("{0}")]
    Validation(String),
    #[error("Upstream error: {0}")]
    Upstream(#[from] PublishError),
}

pub struct NewsService<S: NewsStore, P: NewsPublisher> {
    store: S,
    publisher: Option<P>,
    mention_everyone: bool,
}

impl<S: NewsStore, P: NewsPublisher> NewsService<S, P> {
    /// `publisher` is `None` when no Discord credential is configured; both
    /// endpoints then answer with `NewsError::NotConfigured`.
    pub fn new(store: S, publisher: Option<P>, mention_everyone: bool) -> Self {
        Self {
            store,
            publisher,
            mention_everyone,
        }
    }

    /// Current feed, newest first. A read failure yields an empty feed.
    pub async fn latest(&self) -> Result<Vec<NewsItem>, NewsError> {
        if self.publisher.is_none() {
            return Err(NewsError::NotConfigured);
        }

        match self.store.list().await {
            Ok(items) => Ok(items),
            Err(e) => {
                tracing::error!("Error reading news store: {}", e);
                Ok(Vec::new())
            }
        }
    }

    /// Relays a post to Discord and records it locally once Discord accepts it.
    pub async fn post(&self, request: PostNewsRequest) -> Result<PostOutcome, NewsError> {
        let publisher = self.publisher.as_ref().ok_or(NewsError::NotConfigured)?;

        let content = request.content.unwrap_or_default();
        if trim_text(&content).is_empty() {
            return Err(NewsError::Validation("Content is required".to_string()));
        }

        let body = compose_body(request.title.as_deref(), &content);
        let message = self.outbound(&body);
        if message.content.chars().count() > DISCORD_MESSAGE_LIMIT {
            return Err(NewsError::Validation(format!(
                "Content exceeds {} characters",
                DISCORD_MESSAGE_LIMIT
            )));
        }

        publisher.publish(&message).await?;

        let item = NewsItem::new(body, Utc::now());
        // Discord already has the post, so a local write failure is not fatal.
        if let Err(e) = self.store.push(item.clone()).await {
            tracing::warn!("Error saving news item: {}", e);
        }

        tracing::info!(method = ?publisher.method(), "News posted");
        Ok(PostOutcome {
            item,
            method: publisher.method(),
        })
    }

    fn outbound(&self, body: &str) -> OutboundMessage {
        let content = if self.mention_everyone {
            format!("@everyone\n{}", body)
        } else {
            body.to_string()
        };
        OutboundMessage {
            content,
            mention_everyone: self.mention_everyone,
        }
    }
}

/// Trims whitespace and byte-order marks, which browsers treat as blank.
fn trim_text(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}')
}

/// Text stored locally and sent to Discord (minus any mention prefix).
pub fn compose_body(title: Option<&str>, content: &str) -> String {
    match title.map(trim_text).filter(|t| !t.is_empty()) {
        Some(title) => format!("**{}**\n\n{}", title, content),
        None => content.to_string(),
    }
}
