#![allow(dead_code)]

use anyhow::{Context, Result, bail};
use emoji_catalog::{
    CatalogBuilder, CategorySpec, EmojiRecord, FetchError, NameSlug, PageFetcher, RetryPolicy,
    ShortName,
};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::Mutex;

pub const BASE_URL: &str = "https://emoji.test";

pub fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    fs::read_to_string(&path)
        .with_context(|| format!("reading fixture {}", path.display()))
        .expect("fixture present")
}

/// Serves HTML fixtures by URL path; unknown paths answer 404.
///
/// `fail_first` makes the first N requests to a path fail at the transport level before the
/// fixture is served, to exercise the retry loop.
#[derive(Default)]
pub struct FixtureFetcher {
    pages: BTreeMap<String, String>,
    fail_first: BTreeMap<String, u32>,
    calls: Mutex<BTreeMap<String, u32>>,
}

impl FixtureFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, path: &str, fixture_name: &str) -> Self {
        self.pages.insert(path.to_string(), fixture(fixture_name));
        self
    }

    pub fn flaky(mut self, path: &str, failures: u32) -> Self {
        self.fail_first.insert(path.to_string(), failures);
        self
    }

    pub fn calls(&self, path: &str) -> u32 {
        self.calls
            .lock()
            .unwrap_or_else(|err| err.into_inner())
            .get(path)
            .copied()
            .unwrap_or(0)
    }

    /// Listing and detail pages for `food-drink` (one good entry, one without a link).
    pub fn food_drink() -> Self {
        Self::new()
            .page("/food-drink", "food-drink.html")
            .page("/apple/", "apple.html")
    }

    /// `food-drink` plus a three-entry `people` listing.
    pub fn people_and_food() -> Self {
        Self::food_drink()
            .page("/people", "people.html")
            .page("/grinning-face/", "grinning-face.html")
            .page(
                "/grinning-face-with-big-eyes/",
                "grinning-face-with-big-eyes.html",
            )
            .page("/winking-face/", "winking-face.html")
    }
}

impl PageFetcher for FixtureFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let path = url.strip_prefix(BASE_URL).unwrap_or(url).to_string();
        let seen = {
            let mut calls = self.calls.lock().unwrap_or_else(|err| err.into_inner());
            let count = calls.entry(path.clone()).or_insert(0);
            *count += 1;
            *count
        };
        if seen <= self.fail_first.get(&path).copied().unwrap_or(0) {
            return Err(FetchError::Transport {
                url: url.to_string(),
                message: "connection reset".to_string(),
            });
        }
        self.pages
            .get(&path)
            .cloned()
            .ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: 404,
            })
    }
}

/// Local address nothing listens on, so `update` fails fast at the transport.
pub const UNREACHABLE_BASE_URL: &str = "http://127.0.0.1:1";

/// The `emoji-catalog` binary pointed at `snapshot`, with no ambient
/// `EMOJI_CATALOG_*` settings leaking in from the caller's environment.
pub fn catalog_cli(snapshot: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_emoji-catalog"));
    for (key, _) in std::env::vars() {
        if key.starts_with("EMOJI_CATALOG_") {
            cmd.env_remove(&key);
        }
    }
    cmd.env_remove("RUST_LOG");
    cmd.arg("--snapshot").arg(snapshot);
    cmd
}

pub fn run_command(mut cmd: Command) -> Result<Output> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to run command: {:?}", cmd))?;
    if output.status.success() {
        Ok(output)
    } else {
        bail!(
            "command {:?} failed: status {:?}\nstdout: {}\nstderr: {}",
            cmd,
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        )
    }
}

pub fn category(name: &str, url: &str) -> CategorySpec {
    CategorySpec {
        name: name.to_string(),
        url: url.to_string(),
    }
}

/// Builder against the fixture site with a bounded policy so a missing
/// fixture fails fast instead of retrying forever.
pub fn fixture_builder(
    fetcher: &FixtureFetcher,
    categories: Vec<CategorySpec>,
) -> CatalogBuilder<&FixtureFetcher> {
    CatalogBuilder::new(fetcher)
        .with_base_url(BASE_URL)
        .with_categories(categories)
        .with_retry_policy(RetryPolicy::unbounded().with_max_attempts(3))
}

pub fn record(name: &str, slug: &str, emoji: &str, unicode: &str, shorts: &[&str]) -> EmojiRecord {
    EmojiRecord {
        name: name.to_string(),
        name_url: NameSlug(slug.to_string()),
        emoji: emoji.to_string(),
        unicode: unicode.to_string(),
        short_names: shorts.iter().map(|s| ShortName(s.to_string())).collect(),
    }
}

pub fn apple() -> EmojiRecord {
    record("Apple", "apple", "🍎", "1F34E", &[":apple:"])
}

pub fn sample_catalog() -> Vec<EmojiRecord> {
    vec![
        record("Grinning Face", "grinning-face", "😀", "1F600", &[":grinning:"]),
        apple(),
        record("Flag: France", "flag-france", "🇫🇷", "1F1EB 1F1F7", &[":fr:", ":flag_fr:"]),
        record("Thumbs Up", "thumbs-up", "👍", "1F44D", &[":+1:", ":thumbsup:"]),
        // Shares the :+1: alias; lookups must return the first record.
        record("Thumbs Up Light Skin Tone", "thumbs-up-light", "👍🏻", "1F44D 1F3FB", &[":+1:"]),
    ]
}
