// News infra layer.
// - `discord_client.rs` talks to the Discord HTTP API.
// - `json_store.rs` persists the feed to disk.
// - `in_memory.rs` keeps it in memory only.

#[path = "discord_client.rs"]
pub mod discord_client;

#[path = "json_store.rs"]
pub mod json_store;

#[path = "in_memory.rs"]
pub mod in_memory;

pub use discord_client::DiscordNewsClient;
pub use in_memory::InMemoryNewsStore;
pub use json_store::JsonNewsStore;
