//! Retry policy for page fetches.
//!
//! The default policy retries forever with no pause, which is how the catalog
//! has always been built: a flaky source only slows the build down. Bounded
//! attempts, a fixed backoff, an overall deadline and a shared cancel flag let
//! callers put a ceiling on that wait.

use crate::scrape::fetch::{FetchError, PageFetcher};
use log::warn;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// How often and how long to retry a failing fetch.
pub struct RetryPolicy {
    /// Total attempts per URL, including the first. `None` retries forever.
    pub max_attempts: Option<u32>,
    /// Pause between attempts.
    pub backoff: Duration,
    /// Ceiling on a whole build, measured from its start.
    pub deadline: Option<Duration>,
}

impl RetryPolicy {
    /// Retry forever without pausing.
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts.max(1));
        self
    }

    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    fn exhausted(&self, attempts: u32) -> bool {
        self.max_attempts.is_some_and(|max| attempts >= max)
    }
}

/// Shared flag that aborts an in-flight build.
///
/// Clones observe the same flag, so a caller can keep one half and hand the
/// other to the builder (or to a timer thread).
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Why a build stopped before producing a catalog.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScrapeError {
    #[error("gave up on {url} after {attempts} attempts")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        #[source]
        last: FetchError,
    },
    #[error("deadline exceeded while fetching {url} after {attempts} attempts")]
    DeadlineExceeded { url: String, attempts: u32 },
    #[error("cancelled while fetching {url}")]
    Cancelled { url: String },
    #[error("invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },
    #[error("scrape worker panicked")]
    WorkerPanicked,
}

/// Fetch `url`, retrying transport failures according to `policy`.
///
/// `deadline` is the absolute instant for the whole build (see
/// `RetryPolicy::deadline`). Cancellation is checked before every attempt and
/// after every pause.
pub fn fetch_with_retry<F>(
    fetcher: &F,
    url: &str,
    policy: &RetryPolicy,
    deadline: Option<Instant>,
    cancel: &CancelToken,
) -> Result<String, ScrapeError>
where
    F: PageFetcher + ?Sized,
{
    let mut attempts: u32 = 0;
    loop {
        if cancel.is_cancelled() {
            return Err(ScrapeError::Cancelled {
                url: url.to_string(),
            });
        }
        if deadline.is_some_and(|at| Instant::now() >= at) {
            return Err(ScrapeError::DeadlineExceeded {
                url: url.to_string(),
                attempts,
            });
        }

        attempts = attempts.saturating_add(1);
        let err = match fetcher.fetch(url) {
            Ok(body) => return Ok(body),
            Err(err) => err,
        };

        if policy.exhausted(attempts) {
            return Err(ScrapeError::RetriesExhausted {
                url: url.to_string(),
                attempts,
                last: err,
            });
        }
        warn!(target: "emoji_catalog", "attempt {attempts} failed: {err}; retrying");

        if !policy.backoff.is_zero() {
            let pause = match deadline {
                Some(at) => policy
                    .backoff
                    .min(at.saturating_duration_since(Instant::now())),
                None => policy.backoff,
            };
            thread::sleep(pause);
        }
    }
}
