//! Emoji metadata catalog scraped from a reference site.
//!
//! The crate has two halves. `scrape` builds a fresh list of `EmojiRecord`s by
//! walking the site's category listings and each emoji's detail page.
//! `catalog` holds that list, persists it as `emojis.json`, and answers
//! lookups by code point, name, short name or slug. `CatalogStore` ties them
//! together: it loads the cached snapshot on `initialize` and only scrapes when
//! asked to `rebuild`.
//!
//! ```text
//! let config = ScrapeConfig::from_env()?;
//! let mut store = config.store()?;
//! store.initialize()?;
//! if store.is_empty() {
//!     store.rebuild(&config.http_builder()?)?;
//! }
//! let apple = store.lookup(":apple:");
//! ```

pub mod catalog;
pub mod config;
pub mod scrape;

mod schema_loader;

pub use catalog::{
    CatalogIndex, CatalogSource, CatalogStore, CategorySpec, EmojiCategory, EmojiRecord, NameSlug,
    RebuildOutcome, SNAPSHOT_FILE_NAME, ShortName, StalenessCheck, default_categories,
    load_snapshot_from_path, write_snapshot_to_path,
};
pub use config::ScrapeConfig;
pub use scrape::{
    CancelToken, CatalogBuilder, FetchError, HttpFetcher, PageFetcher, RetryPolicy, ScrapeError,
};
