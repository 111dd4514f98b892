//! Owns the active catalog and the cache-vs-rebuild decision.
//!
//! A store is constructed without touching the filesystem. `initialize` loads
//! the snapshot when one exists; `rebuild` runs a `CatalogSource` and, when the
//! staleness check reports a change, writes the snapshot before swapping the
//! in-memory index. Readers borrow the store, so they can never observe a
//! half-replaced catalog.

use crate::catalog::index::CatalogIndex;
use crate::catalog::model::{EmojiRecord, load_snapshot_from_path, write_snapshot_to_path};
use crate::catalog::SNAPSHOT_FILE_NAME;
use anyhow::{Context, Result, bail};
use log::{debug, info};
use std::env;
use std::path::{Path, PathBuf};

/// Anything that can produce a fresh catalog (the scraper, or a stub in tests).
pub trait CatalogSource {
    fn build_catalog(&self) -> Result<Vec<EmojiRecord>>;
}

impl<F> CatalogSource for F
where
    F: Fn() -> Result<Vec<EmojiRecord>>,
{
    fn build_catalog(&self) -> Result<Vec<EmojiRecord>> {
        self()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// How `rebuild` decides whether a fresh catalog replaces the current one.
pub enum StalenessCheck {
    /// Replace only when the record count differs. Content-only changes with
    /// an unchanged count are ignored.
    #[default]
    Length,
    /// Replace whenever any record differs.
    Content,
}

impl StalenessCheck {
    pub fn as_str(&self) -> &'static str {
        match self {
            StalenessCheck::Length => "length",
            StalenessCheck::Content => "content",
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "length" => Ok(StalenessCheck::Length),
            "content" => Ok(StalenessCheck::Content),
            other => bail!("unknown staleness check '{other}' (expected 'length' or 'content')"),
        }
    }

    fn is_stale(&self, current: &[EmojiRecord], fresh: &[EmojiRecord]) -> bool {
        match self {
            StalenessCheck::Length => current.len() != fresh.len(),
            StalenessCheck::Content => current != fresh,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// What a `rebuild` did.
pub enum RebuildOutcome {
    Replaced { previous: usize, current: usize },
    Unchanged { count: usize },
}

#[derive(Debug)]
/// In-memory catalog backed by a snapshot file.
pub struct CatalogStore {
    snapshot_path: PathBuf,
    staleness: StalenessCheck,
    index: CatalogIndex,
}

impl CatalogStore {
    /// Create an empty store; nothing is read until `initialize`.
    pub fn new(snapshot_path: impl Into<PathBuf>) -> Self {
        Self {
            snapshot_path: snapshot_path.into(),
            staleness: StalenessCheck::default(),
            index: CatalogIndex::default(),
        }
    }

    /// Store rooted at `emojis.json` in the current working directory.
    pub fn in_working_dir() -> Result<Self> {
        let cwd = env::current_dir().context("resolving current working directory")?;
        Ok(Self::new(cwd.join(SNAPSHOT_FILE_NAME)))
    }

    pub fn with_staleness(mut self, staleness: StalenessCheck) -> Self {
        self.staleness = staleness;
        self
    }

    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }

    pub fn staleness(&self) -> StalenessCheck {
        self.staleness
    }

    /// Load the snapshot if present.
    ///
    /// Returns `Ok(false)` and leaves the catalog empty when no snapshot
    /// exists. A snapshot that fails to parse or validate is an error; the
    /// in-memory catalog is left untouched in that case.
    pub fn initialize(&mut self) -> Result<bool> {
        if !self.snapshot_path.is_file() {
            debug!(
                target: "emoji_catalog",
                "no snapshot at {}; catalog stays empty until rebuild",
                self.snapshot_path.display()
            );
            return Ok(false);
        }
        let records = load_snapshot_from_path(&self.snapshot_path)?;
        info!(
            target: "emoji_catalog",
            "loaded {} emojis from {}",
            records.len(),
            self.snapshot_path.display()
        );
        self.index = CatalogIndex::new(records);
        Ok(true)
    }

    /// Build a fresh catalog and install it when it differs from the current one.
    ///
    /// The snapshot is written before the in-memory swap; if the write fails
    /// the error is returned and the old catalog stays active.
    pub fn rebuild<S>(&mut self, source: &S) -> Result<RebuildOutcome>
    where
        S: CatalogSource + ?Sized,
    {
        let fresh = source.build_catalog().context("building emoji catalog")?;
        let previous = self.index.len();
        if !self.staleness.is_stale(self.index.records(), &fresh) {
            debug!(
                target: "emoji_catalog",
                "rebuild produced {} emojis; unchanged under {} check",
                fresh.len(),
                self.staleness.as_str()
            );
            return Ok(RebuildOutcome::Unchanged { count: previous });
        }

        info!(
            target: "emoji_catalog",
            "writing emojis ({}) at {}",
            fresh.len(),
            self.snapshot_path.display()
        );
        write_snapshot_to_path(&self.snapshot_path, &fresh)?;
        let current = fresh.len();
        self.index = CatalogIndex::new(fresh);
        Ok(RebuildOutcome::Replaced { previous, current })
    }

    /// First record whose code point, name, short name or slug matches `query`.
    pub fn lookup(&self, query: &str) -> Option<&EmojiRecord> {
        self.index.lookup(query)
    }

    /// The full catalog in build order.
    pub fn list(&self) -> &[EmojiRecord] {
        self.index.records()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
