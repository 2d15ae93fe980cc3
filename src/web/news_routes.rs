use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use super::AppState;
use crate::core::news::{DeliveryMethod, NewsError, NewsItem, PostNewsRequest};

#[derive(Debug, Serialize)]
pub struct PostNewsResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Failure of a news endpoint, rendered as `{"error": ...}`.
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn from_news(err: NewsError, fallback: &str) -> Self {
        match err {
            NewsError::Validation(message) => Self {
                status: StatusCode::BAD_REQUEST,
                message,
            },
            NewsError::NotConfigured => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: err.to_string(),
            },
            // Upstream details stay in the logs.
            NewsError::Upstream(_) => {
                tracing::error!("{}: {}", fallback, err);
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: fallback.to_string(),
                }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { error: self.message })).into_response()
    }
}

/// `GET /api/discord-news`
pub async fn get_news(State(state): State<AppState>) -> Result<Json<Vec<NewsItem>>, ApiError> {
    state
        .news
        .latest()
        .await
        .map(Json)
        .map_err(|e| ApiError::from_news(e, "Failed to fetch news"))
}

/// `POST /api/discord-news`
///
/// A body that is missing or not a valid request is handled like one without
/// content, so the caller still gets the usual JSON error after the
/// credential check.
pub async fn post_news(
    State(state): State<AppState>,
    payload: Result<Json<PostNewsRequest>, JsonRejection>,
) -> Result<Json<PostNewsResponse>, ApiError> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::debug!("Unreadable news request: {}", rejection.body_text());
            PostNewsRequest::default()
        }
    };

    let outcome = state
        .news
        .post(request)
        .await
        .map_err(|e| ApiError::from_news(e, "Failed to post news"))?;

    tracing::debug!(timestamp = %outcome.item.timestamp, "Stored news item");
    let message = match outcome.method {
        DeliveryMethod::Bot => "News posted with bot and saved!",
        DeliveryMethod::Webhook => "News posted with webhook and saved!",
    };
    Ok(Json(PostNewsResponse {
        success: true,
        message: message.to_string(),
    }))
}
