use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default number of items kept in the rolling news log.
pub const DEFAULT_CAPACITY: usize = 20;

/// Discord rejects message content longer than this many characters.
pub const DISCORD_MESSAGE_LIMIT: usize = 2000;

/// One relayed news post as shown on the website.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub content: String,
    #[serde(with = "iso_millis")]
    pub timestamp: DateTime<Utc>,
}

impl NewsItem {
    pub fn new(content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            content: content.into(),
            timestamp,
        }
    }
}

/// Browsers parse `Date#toISOString()` output, so timestamps go out with
/// millisecond precision and a `Z` suffix. On read, RFC 3339 is accepted, as
/// are ISO dates and offset-less date-times (taken as UTC).
mod iso_millis {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(raw.trim())
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {:?}", raw)))
    }

    fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(naive.and_utc());
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }
}

/// Bounded, newest-first list of news items.
///
/// Inserting into a full feed drops the oldest (last) entry, so `len()` never
/// exceeds `capacity()`.
#[derive(Debug, Clone)]
pub struct NewsFeed {
    items: Vec<NewsItem>,
    capacity: usize,
}

impl NewsFeed {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Builds a feed from items already ordered newest-first, keeping at most
    /// `capacity` of them.
    pub fn from_items(mut items: Vec<NewsItem>, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        items.truncate(capacity);
        Self { items, capacity }
    }

    /// Puts `item` at the front and returns whatever fell off the back.
    pub fn push(&mut self, item: NewsItem) -> Option<NewsItem> {
        self.items.insert(0, item);
        if self.items.len() > self.capacity {
            self.items.pop()
        } else {
            None
        }
    }

    pub fn items(&self) -> &[NewsItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Body of `POST /api/discord-news`. Older site builds send only `content`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostNewsRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// How a post reached Discord.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMethod {
    Bot,
    Webhook,
}

/// Message ready to hand to a publisher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    /// Exact text sent to Discord, including any mention prefix.
    pub content: String,
    /// Whether Discord may turn `@everyone` in `content` into a ping.
    pub mention_everyone: bool,
}

/// Result of a successful relay.
#[derive(Debug, Clone)]
pub struct PostOutcome {
    pub item: NewsItem,
    pub method: DeliveryMethod,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn item(n: u32) -> NewsItem {
        NewsItem::new(
            format!("news {}", n),
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, n).unwrap(),
        )
    }

    #[test]
    fn test_push_keeps_newest_first() {
        let mut feed = NewsFeed::new(5);
        feed.push(item(1));
        feed.push(item(2));

        assert_eq!(feed.items()[0].content, "news 2");
        assert_eq!(feed.items()[1].content, "news 1");
    }

    #[test]
    fn test_push_evicts_oldest_when_full() {
        let mut feed = NewsFeed::new(3);
        for n in 1..=3 {
            assert!(feed.push(item(n)).is_none());
        }

        let evicted = feed.push(item(4));

        assert_eq!(evicted.map(|i| i.content), Some("news 1".to_string()));
        assert_eq!(feed.len(), 3);
        assert_eq!(feed.items()[0].content, "news 4");
        assert_eq!(feed.items()[2].content, "news 2");
    }

    #[test]
    fn test_from_items_truncates_to_capacity() {
        let items: Vec<NewsItem> = (1..=30).rev().map(item).collect();
        let feed = NewsFeed::from_items(items, DEFAULT_CAPACITY);

        assert_eq!(feed.len(), DEFAULT_CAPACITY);
        // Newest entries survive
        assert_eq!(feed.items()[0].content, "news 30");
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let mut feed = NewsFeed::new(0);
        feed.push(item(1));
        feed.push(item(2));

        assert_eq!(feed.capacity(), 1);
        assert_eq!(feed.items()[0].content, "news 2");
    }

    #[test]
    fn test_timestamp_uses_millisecond_iso_format() {
        let news = NewsItem::new(
            "hello",
            Utc.with_ymd_and_hms(2025, 3, 4, 5, 6, 7).unwrap(),
        );

        let json = serde_json::to_string(&news).unwrap();

        assert_eq!(
            json,
            r#"{"content":"hello","timestamp":"2025-03-04T05:06:07.000Z"}"#
        );
    }

    #[test]
    fn test_timestamp_accepts_offsets() {
        let news: NewsItem =
            serde_json::from_str(r#"{"content":"hi","timestamp":"2025-03-04T07:06:07+02:00"}"#)
                .unwrap();

        assert_eq!(
            news.timestamp,
            Utc.with_ymd_and_hms(2025, 3, 4, 5, 6, 7).unwrap()
        );
    }

    #[test]
    fn test_timestamp_accepts_plain_dates() {
        let news: NewsItem =
            serde_json::from_str(r#"{"content":"hi","timestamp":"2025-01-15"}"#).unwrap();
        assert_eq!(
            news.timestamp,
            Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap()
        );

        let news: NewsItem =
            serde_json::from_str(r#"{"content":"hi","timestamp":"2025-01-15T08:30:00"}"#)
                .unwrap();
        assert_eq!(
            news.timestamp,
            Utc.with_ymd_and_hms(2025, 1, 15, 8, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_timestamp_rejects_garbage() {
        let parsed: Result<NewsItem, _> =
            serde_json::from_str(r#"{"content":"hi","timestamp":"yesterday"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_request_without_title() {
        let req: PostNewsRequest = serde_json::from_str(r#"{"content":"x"}"#).unwrap();
        assert!(req.title.is_none());
        assert_eq!(req.content.as_deref(), Some("x"));
    }
}
