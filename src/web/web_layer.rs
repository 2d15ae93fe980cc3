// Web layer - the HTTP surface the website talks to.

#[path = "news_routes.rs"]
pub mod news_routes;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::news::{NewsPublisher, NewsService, NewsStore};

/// The news service with its store and publisher picked at startup.
pub type SharedNewsService = NewsService<Box<dyn NewsStore>, Box<dyn NewsPublisher>>;

/// Shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub news: Arc<SharedNewsService>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/discord-news",
            get(news_routes::get_news).post(news_routes::post_news),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
