use crate::core::news::{NewsFeed, NewsItem, NewsStore, StoreError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::RwLock;

/// JSON file store for the news feed. The file holds a plain array of items,
/// newest first; the feed is cached in memory and the file rewritten on every push.
pub struct JsonNewsStore {
    path: PathBuf,
    cache: RwLock<NewsFeed>,
}

impl JsonNewsStore {
    /// Opens the store at `path`, creating it as an empty array when missing.
    ///
    /// Entries that cannot be parsed are skipped; the rest are kept. A file
    /// that is not a JSON array at all is copied to `<path>.bak` and the feed
    /// starts empty.
    pub async fn open(path: impl AsRef<Path>, capacity: usize) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let feed = if fs::try_exists(&path).await? {
            match Self::read(&path).await {
                Ok(items) => NewsFeed::from_items(items, capacity),
                Err(e) => {
                    let backup = backup_path(&path);
                    tracing::warn!(
                        "Error reading news file {}: {}; saving a copy to {}",
                        path.display(),
                        e,
                        backup.display()
                    );
                    fs::copy(&path, &backup).await?;
                    NewsFeed::new(capacity)
                }
            }
        } else {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).await?;
            }
            fs::write(&path, "[]").await?;
            tracing::info!("Created news file at {}", path.display());
            NewsFeed::new(capacity)
        };

        tracing::debug!(
            items = feed.len(),
            capacity = feed.capacity(),
            "Loaded news feed"
        );
        Ok(Self {
            path,
            cache: RwLock::new(feed),
        })
    }

    async fn read(path: &Path) -> Result<Vec<NewsItem>, StoreError> {
        let text = fs::read_to_string(path).await?;
        let entries: Vec<serde_json::Value> = serde_json::from_str(&text)?;

        let items: Vec<NewsItem> = entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match serde_json::from_value(entry) {
                Ok(item) => Some(item),
                Err(e) => {
                    tracing::warn!("Skipping news entry {} in {}: {}", index, path.display(), e);
                    None
                }
            })
            .collect();
        Ok(items)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}

#[async_trait]
impl NewsStore for JsonNewsStore {
    async fn list(&self) -> Result<Vec<NewsItem>, StoreError> {
        let cache = self.cache.read().await;
        Ok(cache.items().to_vec())
    }

    async fn push(&self, item: NewsItem) -> Result<(), StoreError> {
        // Hold the write lock through the file write so concurrent posts
        // land on disk in the same order as in memory.
        let mut cache = self.cache.write().await;
        cache.push(item);
        let text = serde_json::to_string_pretty(cache.items())?;
        fs::write(&self.path, text).await?;
        Ok(())
    }
}
