//! Runtime configuration for building and caching the catalog.
//!
//! Values start from defaults, are overridden by `EMOJI_CATALOG_*` environment
//! variables, and the CLI applies its flags on top. Empty variables count as
//! unset. Parsing goes through a lookup closure so tests can supply values
//! without touching the process environment.

use crate::catalog::{CatalogStore, SNAPSHOT_FILE_NAME, StalenessCheck};
use crate::scrape::{
    CatalogBuilder, DEFAULT_BASE_URL, DEFAULT_PARALLELISM, HttpFetcher, PageFetcher, RetryPolicy,
};
use anyhow::{Context, Result, bail};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const ENV_BASE_URL: &str = "EMOJI_CATALOG_BASE_URL";
pub const ENV_SNAPSHOT: &str = "EMOJI_CATALOG_SNAPSHOT";
pub const ENV_MAX_ATTEMPTS: &str = "EMOJI_CATALOG_MAX_ATTEMPTS";
pub const ENV_BACKOFF_MS: &str = "EMOJI_CATALOG_BACKOFF_MS";
pub const ENV_DEADLINE_SECS: &str = "EMOJI_CATALOG_DEADLINE_SECS";
pub const ENV_PARALLELISM: &str = "EMOJI_CATALOG_PARALLELISM";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "EMOJI_CATALOG_REQUEST_TIMEOUT_SECS";
pub const ENV_STALENESS: &str = "EMOJI_CATALOG_STALENESS";

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone, Debug, PartialEq, Eq)]
/// Everything needed to construct a store and a builder.
pub struct ScrapeConfig {
    pub base_url: String,
    /// Explicit snapshot location; `None` means `emojis.json` in the working directory.
    pub snapshot_path: Option<PathBuf>,
    pub retry: RetryPolicy,
    pub parallelism: usize,
    pub request_timeout: Duration,
    pub staleness: StalenessCheck,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            snapshot_path: None,
            retry: RetryPolicy::unbounded(),
            parallelism: DEFAULT_PARALLELISM,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            staleness: StalenessCheck::default(),
        }
    }
}

impl ScrapeConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup<L>(lookup: L) -> Result<Self>
    where
        L: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(base_url) = get(ENV_BASE_URL) {
            config.base_url = base_url;
        }
        if let Some(path) = get(ENV_SNAPSHOT) {
            config.snapshot_path = Some(PathBuf::from(path));
        }
        if let Some(raw) = get(ENV_MAX_ATTEMPTS) {
            config.retry.max_attempts = match parse_number::<u32>(ENV_MAX_ATTEMPTS, &raw)? {
                0 => None,
                attempts => Some(attempts),
            };
        }
        if let Some(raw) = get(ENV_BACKOFF_MS) {
            config.retry.backoff = Duration::from_millis(parse_number(ENV_BACKOFF_MS, &raw)?);
        }
        if let Some(raw) = get(ENV_DEADLINE_SECS) {
            config.retry.deadline = Some(Duration::from_secs(parse_number(
                ENV_DEADLINE_SECS,
                &raw,
            )?));
        }
        if let Some(raw) = get(ENV_PARALLELISM) {
            let parallelism: usize = parse_number(ENV_PARALLELISM, &raw)?;
            if parallelism == 0 {
                bail!("{ENV_PARALLELISM} must be at least 1");
            }
            config.parallelism = parallelism;
        }
        if let Some(raw) = get(ENV_REQUEST_TIMEOUT_SECS) {
            config.request_timeout =
                Duration::from_secs(parse_number(ENV_REQUEST_TIMEOUT_SECS, &raw)?);
        }
        if let Some(raw) = get(ENV_STALENESS) {
            config.staleness =
                StalenessCheck::parse(&raw).with_context(|| format!("parsing {ENV_STALENESS}"))?;
        }
        Ok(config)
    }

    /// Configured snapshot path, or `emojis.json` under the working directory.
    pub fn resolved_snapshot_path(&self) -> Result<PathBuf> {
        match &self.snapshot_path {
            Some(path) => Ok(path.clone()),
            None => Ok(env::current_dir()
                .context("resolving current working directory")?
                .join(SNAPSHOT_FILE_NAME)),
        }
    }

    /// An empty store at the resolved snapshot path.
    pub fn store(&self) -> Result<CatalogStore> {
        Ok(CatalogStore::new(self.resolved_snapshot_path()?).with_staleness(self.staleness))
    }

    /// A builder over `fetcher` with this configuration's site, retry and fan-out.
    pub fn builder_with<F: PageFetcher>(&self, fetcher: F) -> CatalogBuilder<F> {
        CatalogBuilder::new(fetcher)
            .with_base_url(self.base_url.clone())
            .with_retry_policy(self.retry.clone())
            .with_parallelism(self.parallelism)
    }

    /// A builder that talks to the real site over HTTP.
    pub fn http_builder(&self) -> Result<CatalogBuilder<HttpFetcher>> {
        Ok(self.builder_with(HttpFetcher::new(self.request_timeout)?))
    }
}

fn parse_number<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.parse::<T>()
        .with_context(|| format!("{key} must be a non-negative integer, got '{raw}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: BTreeMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_retry_forever_against_emojipedia() {
        let config = ScrapeConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, ScrapeConfig::default());
        assert_eq!(config.base_url, "https://emojipedia.org");
        assert_eq!(config.retry.max_attempts, None);
        assert!(config.retry.backoff.is_zero());
        assert_eq!(config.retry.deadline, None);
        assert_eq!(config.staleness, StalenessCheck::Length);
    }

    #[test]
    fn environment_overrides_every_field() {
        let config = ScrapeConfig::from_lookup(lookup_from(&[
            (ENV_BASE_URL, "http://127.0.0.1:8080"),
            (ENV_SNAPSHOT, "/tmp/cache/emojis.json"),
            (ENV_MAX_ATTEMPTS, "5"),
            (ENV_BACKOFF_MS, "250"),
            (ENV_DEADLINE_SECS, "600"),
            (ENV_PARALLELISM, "4"),
            (ENV_REQUEST_TIMEOUT_SECS, "10"),
            (ENV_STALENESS, "content"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:8080");
        assert_eq!(
            config.resolved_snapshot_path().unwrap(),
            PathBuf::from("/tmp/cache/emojis.json")
        );
        assert_eq!(config.retry.max_attempts, Some(5));
        assert_eq!(config.retry.backoff, Duration::from_millis(250));
        assert_eq!(config.retry.deadline, Some(Duration::from_secs(600)));
        assert_eq!(config.parallelism, 4);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.staleness, StalenessCheck::Content);
    }

    #[test]
    fn zero_attempts_and_blank_values_mean_default() {
        let config = ScrapeConfig::from_lookup(lookup_from(&[
            (ENV_MAX_ATTEMPTS, "0"),
            (ENV_BASE_URL, "   "),
        ]))
        .unwrap();
        assert_eq!(config.retry.max_attempts, None);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn invalid_values_name_the_variable() {
        let err = ScrapeConfig::from_lookup(lookup_from(&[(ENV_BACKOFF_MS, "soon")]))
            .expect_err("non-numeric backoff");
        assert!(err.to_string().contains(ENV_BACKOFF_MS), "{err:#}");

        let err = ScrapeConfig::from_lookup(lookup_from(&[(ENV_PARALLELISM, "0")]))
            .expect_err("zero workers");
        assert!(err.to_string().contains(ENV_PARALLELISM), "{err:#}");

        let err = ScrapeConfig::from_lookup(lookup_from(&[(ENV_STALENESS, "hash")]))
            .expect_err("unknown staleness");
        assert!(format!("{err:#}").contains(ENV_STALENESS), "{err:#}");
    }
}
