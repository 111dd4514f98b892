//! Serializable representation of `emojis.json`.
//!
//! The snapshot is a bare JSON array of records with camelCase keys. There is
//! no version field, so any change to these structs is a breaking format
//! change. Reads are validated against the bundled schema before they reach
//! serde; writes go through a temp file in the same directory and an atomic
//! rename so readers never see a half-written snapshot.

use crate::catalog::identity::{EmojiCategory, NameSlug, ShortName};
use crate::schema_loader::validate_snapshot;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// One catalog entry as scraped from the source site.
pub struct EmojiRecord {
    pub name: String,
    pub name_url: NameSlug,
    pub emoji: String,
    /// Empty when the detail page had no code-point link.
    #[serde(default)]
    pub unicode: String,
    #[serde(default)]
    pub short_names: Vec<ShortName>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Listing page to scrape: display label plus URL segment.
pub struct CategorySpec {
    pub name: String,
    pub url: String,
}

impl From<&EmojiCategory> for CategorySpec {
    fn from(category: &EmojiCategory) -> Self {
        Self {
            name: category.display_name().to_string(),
            url: category.as_str().to_string(),
        }
    }
}

/// The eight canonical listing categories in scrape order.
pub fn default_categories() -> Vec<CategorySpec> {
    EmojiCategory::ALL.iter().map(CategorySpec::from).collect()
}

/// Read, validate and parse a snapshot from disk.
pub fn load_snapshot_from_path(path: &Path) -> Result<Vec<EmojiRecord>> {
    let data =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let value: Value =
        serde_json::from_str(&data).with_context(|| format!("parsing {}", path.display()))?;
    validate_snapshot(&value).with_context(|| format!("validating {}", path.display()))?;
    let records: Vec<EmojiRecord> = serde_json::from_value(value)
        .with_context(|| format!("decoding records from {}", path.display()))?;
    Ok(records)
}

/// Serialize `records` and atomically replace the snapshot at `path`.
pub fn write_snapshot_to_path(path: &Path, records: &[EmojiRecord]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir)
        .with_context(|| format!("creating temp snapshot in {}", dir.display()))?;
    serde_json::to_writer(&mut file, records).context("serializing snapshot")?;
    file.flush().context("flushing snapshot")?;
    file.persist(path)
        .with_context(|| format!("replacing snapshot {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn apple() -> EmojiRecord {
        EmojiRecord {
            name: "Apple".to_string(),
            name_url: NameSlug("apple".to_string()),
            emoji: "🍎".to_string(),
            unicode: "1F34E".to_string(),
            short_names: vec![ShortName(":apple:".to_string())],
        }
    }

    #[test]
    fn record_serializes_with_snapshot_keys() {
        let value = serde_json::to_value(apple()).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "Apple",
                "nameUrl": "apple",
                "emoji": "🍎",
                "unicode": "1F34E",
                "shortNames": [":apple:"]
            })
        );
    }

    #[test]
    fn snapshot_write_then_load() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("emojis.json");
        write_snapshot_to_path(&path, &[apple()])?;
        let loaded = load_snapshot_from_path(&path)?;
        assert_eq!(loaded, vec![apple()]);
        Ok(())
    }

    #[test]
    fn load_rejects_records_missing_fields() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("emojis.json");
        fs::write(&path, r#"[{"name": "Apple", "emoji": "🍎"}]"#)?;
        let err = load_snapshot_from_path(&path).expect_err("missing nameUrl should fail");
        assert!(
            format!("{err:#}").contains("nameUrl"),
            "error should name the missing field: {err:#}"
        );
        Ok(())
    }

    #[test]
    fn load_accepts_records_without_code_point() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("emojis.json");
        fs::write(
            &path,
            r#"[{"name": "Apple", "nameUrl": "apple", "emoji": "🍎", "shortNames": []}]"#,
        )?;
        let loaded = load_snapshot_from_path(&path)?;
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].unicode, "");
        Ok(())
    }

    #[test]
    fn default_categories_follow_canonical_order() {
        let categories = default_categories();
        assert_eq!(categories.len(), 8);
        assert_eq!(
            categories[2],
            CategorySpec {
                name: "Food & Drink".to_string(),
                url: "food-drink".to_string()
            }
        );
        assert_eq!(categories[7].url, "flags");
    }
}
