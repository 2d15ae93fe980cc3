use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};
use reqwest::Client;
use serde::Serialize;

use crate::config::DiscordCredentials;
use crate::core::news::{DeliveryMethod, NewsPublisher, OutboundMessage, PublishError};

/// Minimal Discord REST client that posts one message per call, either as a
/// bot into a channel or through a webhook URL.
pub struct DiscordNewsClient {
    client: Client,
    url: String,
    method: DeliveryMethod,
}

#[derive(Serialize)]
struct MessagePayload<'a> {
    content: &'a str,
    allowed_mentions: AllowedMentions,
}

#[derive(Serialize)]
struct AllowedMentions {
    parse: Vec<&'static str>,
}

impl DiscordNewsClient {
    pub fn new(credentials: DiscordCredentials, api_base: &str) -> Result<Self, PublishError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!(
                "DiscordBot (bananasteal_news, ",
                env!("CARGO_PKG_VERSION"),
                ")"
            )),
        );

        let (url, method) = match credentials {
            DiscordCredentials::Bot { token, channel_id } => {
                headers.insert(
                    AUTHORIZATION,
                    HeaderValue::from_str(&format!("Bot {}", token))
                        .map_err(|e| PublishError::Transport(e.to_string()))?,
                );
                (
                    format!(
                        "{}/channels/{}/messages",
                        api_base.trim_end_matches('/'),
                        channel_id
                    ),
                    DeliveryMethod::Bot,
                )
            }
            DiscordCredentials::Webhook { url } => (url, DeliveryMethod::Webhook),
        };

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| PublishError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            url,
            method,
        })
    }

    fn payload(message: &OutboundMessage) -> MessagePayload<'_> {
        // An empty parse list keeps pasted @everyone/@here text from pinging.
        let parse = if message.mention_everyone {
            vec!["everyone"]
        } else {
            Vec::new()
        };
        MessagePayload {
            content: &message.content,
            allowed_mentions: AllowedMentions { parse },
        }
    }
}

#[async_trait]
impl NewsPublisher for DiscordNewsClient {
    async fn publish(&self, message: &OutboundMessage) -> Result<(), PublishError> {
        let response = self
            .client
            .post(&self.url)
            .json(&Self::payload(message))
            .send()
            .await
            .map_err(|e| PublishError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(PublishError::Rejected { status, body });
        }

        Ok(())
    }

    fn method(&self) -> DeliveryMethod {
        self.method
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::Method::POST;
    use httpmock::MockServer;
    use serde_json::json;

    fn message(content: &str, mention_everyone: bool) -> OutboundMessage {
        OutboundMessage {
            content: content.to_string(),
            mention_everyone,
        }
    }

    #[tokio::test]
    async fn test_bot_post_uses_channel_endpoint_and_token() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/channels/1385176310795473036/messages")
                    .header("authorization", "Bot secret-token")
                    .json_body(json!({
                        "content": "Season 3 is live",
                        "allowed_mentions": { "parse": [] }
                    }));
                then.status(200).json_body(json!({ "id": "1" }));
            })
            .await;

        let client = DiscordNewsClient::new(
            DiscordCredentials::Bot {
                token: "secret-token".to_string(),
                channel_id: "1385176310795473036".to_string(),
            },
            &server.base_url(),
        )
        .unwrap();

        assert_eq!(client.method(), DeliveryMethod::Bot);
        client
            .publish(&message("Season 3 is live", false))
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_webhook_post_has_no_authorization() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/webhooks/99/abc")
                    .header_missing("authorization")
                    .json_body(json!({
                        "content": "@everyone\nMaintenance tonight",
                        "allowed_mentions": { "parse": ["everyone"] }
                    }));
                then.status(204);
            })
            .await;

        let client = DiscordNewsClient::new(
            DiscordCredentials::Webhook {
                url: server.url("/api/webhooks/99/abc"),
            },
            "https://discord.com/api/v10",
        )
        .unwrap();

        assert_eq!(client.method(), DeliveryMethod::Webhook);
        client
            .publish(&message("@everyone\nMaintenance tonight", true))
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_success_status_is_rejected() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/channels/7/messages");
                then.status(403)
                    .json_body(json!({ "message": "Missing Access", "code": 50001 }));
            })
            .await;

        let client = DiscordNewsClient::new(
            DiscordCredentials::Bot {
                token: "t".to_string(),
                channel_id: "7".to_string(),
            },
            &format!("{}/", server.base_url()),
        )
        .unwrap();

        let err = client.publish(&message("hi", false)).await.unwrap_err();
        match err {
            PublishError::Rejected { status, body } => {
                assert_eq!(status, 403);
                assert!(body.contains("Missing Access"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let client = DiscordNewsClient::new(
            DiscordCredentials::Webhook {
                url: "http://127.0.0.1:9/webhook".to_string(),
            },
            "",
        )
        .unwrap();

        let err = client.publish(&message("hi", false)).await.unwrap_err();
        assert!(matches!(err, PublishError::Transport(_)));
    }
}
