//! Emoji catalog wiring.
//!
//! This module wraps the `emojis.json` snapshot so callers can load a
//! validated catalog and query it. Types here mirror the snapshot fields;
//! `CatalogIndex` answers lookups and `CatalogStore` decides between the cached
//! snapshot and a fresh scrape.

pub mod identity;
pub mod index;
pub mod model;
pub mod repository;

pub use identity::{EmojiCategory, NameSlug, ShortName};
pub use index::CatalogIndex;
pub use model::{CategorySpec, EmojiRecord, default_categories};
pub use repository::{CatalogSource, CatalogStore, RebuildOutcome, StalenessCheck};

pub use model::{load_snapshot_from_path, write_snapshot_to_path};

/// Snapshot file name, resolved against the working directory by default.
pub const SNAPSHOT_FILE_NAME: &str = "emojis.json";
