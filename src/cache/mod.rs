//! Local JSON cache of fetched business data.
//!
//! Each dataset is stored as a timestamped JSON file under the cache
//! directory so the dashboard can render immediately on startup while
//! fresh data is fetched in the background.

pub mod manager;

pub use manager::{CacheAges, CacheManager};
