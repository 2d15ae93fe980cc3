// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "news/mod.rs"]
pub mod news;
