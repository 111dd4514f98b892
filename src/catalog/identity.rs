use serde::{Deserialize, Serialize};
use std::fmt;

/// Source-site path segment identifying one emoji (e.g., `apple`).
///
/// Stored in snapshots as `nameUrl` and used to build detail-page URLs, so it
/// never carries leading or trailing slashes.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NameSlug(pub String);

impl NameSlug {
    /// Normalize an `href` from a listing page into a slug.
    ///
    /// Returns `None` when nothing is left after trimming slashes and
    /// whitespace; such entries cannot be fetched.
    pub fn from_href(href: &str) -> Option<Self> {
        let slug = href.trim().trim_matches('/');
        if slug.is_empty() {
            return None;
        }
        Some(Self(slug.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NameSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Colon-wrapped alias such as `:apple:`.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShortName(pub String);

impl ShortName {
    /// Wrap a raw alias or query in colons.
    ///
    /// At most one leading and one trailing colon are stripped before
    /// re-wrapping, so `smile`, `:smile` and `:smile:` all normalize to
    /// `:smile:`.
    pub fn normalize(value: &str) -> Self {
        let inner = value.strip_prefix(':').unwrap_or(value);
        let inner = inner.strip_suffix(':').unwrap_or(inner);
        Self(format!(":{inner}:"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShortName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Listing category on the source site.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EmojiCategory {
    People,
    Nature,
    FoodDrink,
    Activity,
    TravelPlaces,
    Objects,
    Symbols,
    Flags,
}

impl EmojiCategory {
    /// The canonical category sequence, in scrape order.
    pub const ALL: [EmojiCategory; 8] = [
        EmojiCategory::People,
        EmojiCategory::Nature,
        EmojiCategory::FoodDrink,
        EmojiCategory::Activity,
        EmojiCategory::TravelPlaces,
        EmojiCategory::Objects,
        EmojiCategory::Symbols,
        EmojiCategory::Flags,
    ];

    /// URL segment of the category listing page.
    pub fn as_str(&self) -> &'static str {
        match self {
            EmojiCategory::People => "people",
            EmojiCategory::Nature => "nature",
            EmojiCategory::FoodDrink => "food-drink",
            EmojiCategory::Activity => "activity",
            EmojiCategory::TravelPlaces => "travel-places",
            EmojiCategory::Objects => "objects",
            EmojiCategory::Symbols => "symbols",
            EmojiCategory::Flags => "flags",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            EmojiCategory::People => "Smileys & People",
            EmojiCategory::Nature => "Animals & Nature",
            EmojiCategory::FoodDrink => "Food & Drink",
            EmojiCategory::Activity => "Activity",
            EmojiCategory::TravelPlaces => "Travel & Places",
            EmojiCategory::Objects => "Objects",
            EmojiCategory::Symbols => "Symbols",
            EmojiCategory::Flags => "Flags",
        }
    }
}
