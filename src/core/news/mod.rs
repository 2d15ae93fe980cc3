pub mod news_models;
pub mod news_publisher;
pub mod news_service;
pub mod news_store;

pub use news_models::{
    DeliveryMethod, NewsFeed, NewsItem, OutboundMessage, PostNewsRequest, DEFAULT_CAPACITY,
};
pub use news_publisher::{NewsPublisher, PublishError};
pub use news_service::{NewsError, NewsService};
pub use news_store::{NewsStore, StoreError};
