//! Catalog builder: walks the category listings and enriches every entry.
//!
//! Categories are scraped one after another. Within a category, detail pages
//! are fetched by a bounded set of scoped worker threads that pull entries off
//! a shared cursor; results land in listing order regardless of which worker
//! finished first. Any fetch that exhausts the retry policy (or hits the
//! deadline, or is cancelled) aborts the whole build so a partial catalog is
//! never handed to the store.

pub mod fetch;
pub mod parse;
pub mod retry;

pub use fetch::{FetchError, HttpFetcher, PageFetcher};
pub use parse::{DetailFields, ListingEntry, parse_detail, parse_listing};
pub use retry::{CancelToken, RetryPolicy, ScrapeError, fetch_with_retry};

use crate::catalog::{CatalogSource, CategorySpec, EmojiRecord, default_categories};
use log::{debug, info, trace};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use std::time::Instant;

/// Source site used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://emojipedia.org";
/// Detail pages fetched concurrently within one category.
pub const DEFAULT_PARALLELISM: usize = 16;

/// Scrapes a fresh catalog through a `PageFetcher`.
pub struct CatalogBuilder<F> {
    fetcher: F,
    base_url: String,
    categories: Vec<CategorySpec>,
    retry: RetryPolicy,
    parallelism: usize,
    cancel: CancelToken,
}

impl<F: PageFetcher> CatalogBuilder<F> {
    /// Builder over the canonical categories, default site and unbounded retry.
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            base_url: DEFAULT_BASE_URL.to_string(),
            categories: default_categories(),
            retry: RetryPolicy::unbounded(),
            parallelism: DEFAULT_PARALLELISM,
            cancel: CancelToken::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_categories(mut self, categories: Vec<CategorySpec>) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism.max(1);
        self
    }

    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    fn category_url(&self, category: &CategorySpec) -> String {
        format!("{}/{}", self.base_url, category.url.trim_matches('/'))
    }

    fn detail_url(&self, entry: &ListingEntry) -> String {
        format!("{}/{}/", self.base_url, entry.slug)
    }

    /// Scrape every category and return the concatenated records.
    pub fn build(&self) -> Result<Vec<EmojiRecord>, ScrapeError> {
        // A limit too large to represent as an instant means no deadline.
        let deadline = self
            .retry
            .deadline
            .and_then(|limit| Instant::now().checked_add(limit));
        let mut emojis = Vec::new();
        for category in &self.categories {
            let url = self.category_url(category);
            info!(target: "emoji_catalog", "getting all emojis of {} ({url})", category.name);
            let html = fetch_with_retry(&self.fetcher, &url, &self.retry, deadline, &self.cancel)?;
            let entries = parse_listing(&html)?;
            debug!(
                target: "emoji_catalog::numbers",
                "{} listing entries in {}",
                entries.len(),
                category.name
            );
            emojis.extend(self.enrich_all(&entries, deadline)?);
            debug!(target: "emoji_catalog::numbers", "loaded {} emojis", emojis.len());
        }
        Ok(emojis)
    }

    fn enrich(
        &self,
        entry: &ListingEntry,
        deadline: Option<Instant>,
    ) -> Result<EmojiRecord, ScrapeError> {
        trace!(target: "emoji_catalog::all", "fetching {}", entry.name);
        let url = self.detail_url(entry);
        let html = fetch_with_retry(&self.fetcher, &url, &self.retry, deadline, &self.cancel)?;
        let detail = parse_detail(&html)?;
        let record = EmojiRecord {
            name: entry.name.clone(),
            name_url: entry.slug.clone(),
            emoji: entry.emoji.clone(),
            unicode: detail.unicode,
            short_names: detail.short_names,
        };
        trace!(target: "emoji_catalog::all", "got a valid emoji: {record:?}");
        Ok(record)
    }

    fn enrich_all(
        &self,
        entries: &[ListingEntry],
        deadline: Option<Instant>,
    ) -> Result<Vec<EmojiRecord>, ScrapeError> {
        if entries.is_empty() {
            return Ok(Vec::new());
        }
        let workers = self.parallelism.min(entries.len());
        let cursor = AtomicUsize::new(0);
        let failed = AtomicBool::new(false);

        let mut enriched: Vec<(usize, EmojiRecord)> = Vec::with_capacity(entries.len());
        let mut first_error: Option<ScrapeError> = None;

        thread::scope(|scope| {
            let cursor = &cursor;
            let failed = &failed;
            let mut handles = Vec::with_capacity(workers);
            for _ in 0..workers {
                handles.push(scope.spawn(
                    move || -> Result<Vec<(usize, EmojiRecord)>, ScrapeError> {
                        let mut done = Vec::new();
                        while !failed.load(Ordering::SeqCst) {
                            let position = cursor.fetch_add(1, Ordering::SeqCst);
                            let Some(entry) = entries.get(position) else {
                                break;
                            };
                            match self.enrich(entry, deadline) {
                                Ok(record) => done.push((position, record)),
                                Err(err) => {
                                    failed.store(true, Ordering::SeqCst);
                                    return Err(err);
                                }
                            }
                        }
                        Ok(done)
                    },
                ));
            }

            for handle in handles {
                match handle.join() {
                    Ok(Ok(done)) => enriched.extend(done),
                    Ok(Err(err)) => {
                        first_error.get_or_insert(err);
                    }
                    Err(_) => {
                        first_error.get_or_insert(ScrapeError::WorkerPanicked);
                    }
                }
            }
        });

        if let Some(err) = first_error {
            return Err(err);
        }
        enriched.sort_by_key(|(position, _)| *position);
        Ok(enriched.into_iter().map(|(_, record)| record).collect())
    }
}

impl<F: PageFetcher> CatalogSource for CatalogBuilder<F> {
    fn build_catalog(&self) -> anyhow::Result<Vec<EmojiRecord>> {
        Ok(self.build()?)
    }
}
