use std::path::PathBuf;

use crate::core::news::DEFAULT_CAPACITY;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_NEWS_FILE: &str = "news.json";
const DEFAULT_API_BASE: &str = "https://discord.com/api/v10";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// How the relay authenticates against Discord.
#[derive(Clone, PartialEq, Eq)]
pub enum DiscordCredentials {
    Bot { token: String, channel_id: String },
    Webhook { url: String },
}

// Keep secrets out of logs.
impl std::fmt::Debug for DiscordCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiscordCredentials::Bot { channel_id, .. } => f
                .debug_struct("Bot")
                .field("channel_id", channel_id)
                .finish_non_exhaustive(),
            DiscordCredentials::Webhook { .. } => f.debug_struct("Webhook").finish_non_exhaustive(),
        }
    }
}

/// Service configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub credentials: Option<DiscordCredentials>,
    pub discord_api_base: String,
    pub port: u16,
    /// `None` keeps the feed in memory only.
    pub news_file: Option<PathBuf>,
    pub news_capacity: usize,
    pub mention_everyone: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let bot_token = get("DISCORD_BOT_TOKEN");
        let channel_id = get("DISCORD_CHANNEL_ID");
        let webhook_url = get("DISCORD_WEBHOOK_URL");

        // A bot needs both halves; otherwise fall back to the webhook.
        let credentials = match (bot_token, channel_id, webhook_url) {
            (Some(token), Some(channel_id), _) => Some(DiscordCredentials::Bot { token, channel_id }),
            (_, _, Some(url)) => Some(DiscordCredentials::Webhook { url }),
            _ => None,
        };

        let port = match get("PORT") {
            Some(v) => v.parse::<u16>().map_err(|_| ConfigError::Invalid { key: "PORT", value: v })?,
            None => DEFAULT_PORT,
        };

        let news_capacity = match get("NEWS_CAPACITY") {
            Some(v) => match v.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "NEWS_CAPACITY",
                        value: v,
                    })
                }
            },
            None => DEFAULT_CAPACITY,
        };

        let mention_everyone = match get("NEWS_MENTION_EVERYONE") {
            Some(v) => parse_bool(&v).ok_or(ConfigError::Invalid {
                key: "NEWS_MENTION_EVERYONE",
                value: v,
            })?,
            None => false,
        };

        // An explicitly empty NEWS_FILE disables persistence.
        let news_file = match lookup("NEWS_FILE") {
            Some(v) if v.trim().is_empty() => None,
            Some(v) => Some(PathBuf::from(v.trim())),
            None => Some(PathBuf::from(DEFAULT_NEWS_FILE)),
        };

        Ok(Self {
            credentials,
            discord_api_base: get("DISCORD_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            port,
            news_file,
            news_capacity,
            mention_everyone,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
