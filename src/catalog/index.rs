//! Indexed view of one catalog instance.
//!
//! Lookups are first-match in catalog order across four keys (code point,
//! name, short name, slug), so the index keeps the records in a `Vec` and
//! precomputes case-folded keys alongside them rather than using maps that
//! would lose the cross-key ordering.

use crate::catalog::identity::ShortName;
use crate::catalog::model::EmojiRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
struct LookupKeys {
    unicode: String,
    name: String,
    short_names: Vec<String>,
}

impl LookupKeys {
    fn for_record(record: &EmojiRecord) -> Self {
        Self {
            unicode: record.unicode.to_lowercase(),
            name: record.name.to_lowercase(),
            short_names: record
                .short_names
                .iter()
                .map(|short| short.as_str().to_lowercase())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Immutable catalog plus derived lookup keys.
pub struct CatalogIndex {
    records: Vec<EmojiRecord>,
    keys: Vec<LookupKeys>,
}

impl CatalogIndex {
    pub fn new(records: Vec<EmojiRecord>) -> Self {
        let keys = records.iter().map(LookupKeys::for_record).collect();
        Self { records, keys }
    }

    /// Find the first record matching `query`.
    ///
    /// The query is lower-cased once and compared against the record's code
    /// point, name and short names (all case-folded) and against the raw slug.
    /// Slugs are compared as stored, so an upper-case slug is only reachable
    /// through the other keys. Blank queries never match.
    pub fn lookup(&self, query: &str) -> Option<&EmojiRecord> {
        if query.trim().is_empty() {
            return None;
        }
        let value = query.to_lowercase();
        let alias = ShortName::normalize(&value);
        self.records
            .iter()
            .zip(&self.keys)
            .find(|(record, keys)| {
                keys.unicode == value
                    || keys.name == value
                    || keys.short_names.iter().any(|short| short == alias.as_str())
                    || record.name_url.as_str() == value
            })
            .map(|(record, _)| record)
    }

    /// Records in build order.
    pub fn records(&self) -> &[EmojiRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
