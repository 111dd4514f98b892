//! HTML extraction for listing and detail pages.
//!
//! Pure functions over page text: no fetching, no retries. Selectors follow
//! the source site's markup:
//! - listing pages: every `.emoji-list li a`, whose text is `<glyph> <name>`
//!   and whose `href` is the detail-page path;
//! - detail pages: the first `a[href^="/emoji/"]` carries the code point as
//!   its second word (`🍎 U+1F34E`), and every `.shortcode` is one alias.

use crate::catalog::identity::{NameSlug, ShortName};
use crate::scrape::retry::ScrapeError;
use log::trace;
use scraper::{ElementRef, Html, Selector};

const LISTING_ENTRY_SELECTOR: &str = ".emoji-list li a";
const CODE_POINT_SELECTOR: &str = r#"a[href^="/emoji/"]"#;
const SHORT_CODE_SELECTOR: &str = ".shortcode";

#[derive(Clone, Debug, PartialEq, Eq)]
/// One usable entry from a category listing.
pub struct ListingEntry {
    pub emoji: String,
    pub name: String,
    pub slug: NameSlug,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Fields pulled from an emoji's detail page.
pub struct DetailFields {
    pub unicode: String,
    pub short_names: Vec<ShortName>,
}

fn selector(css: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(css).map_err(|err| ScrapeError::Selector {
        selector: css.to_string(),
        message: err.to_string(),
    })
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>()
}

/// Extract every well-formed entry from a listing page, in page order.
///
/// Entries without an `href` (or with an empty path) and entries whose label
/// has no name after the glyph are dropped.
pub fn parse_listing(html: &str) -> Result<Vec<ListingEntry>, ScrapeError> {
    let document = Html::parse_document(html);
    let entries = selector(LISTING_ENTRY_SELECTOR)?;

    let mut parsed = Vec::new();
    for anchor in document.select(&entries) {
        let label = element_text(anchor);
        let mut words = label.split_whitespace();
        let emoji = words.next().unwrap_or_default().to_string();
        let name = words.collect::<Vec<_>>().join(" ");

        let Some(slug) = anchor.value().attr("href").and_then(NameSlug::from_href) else {
            trace!(target: "emoji_catalog::all", "dropping '{}': no detail link", label.trim());
            continue;
        };
        if name.is_empty() {
            trace!(target: "emoji_catalog::all", "dropping /{slug}/: no name in label");
            continue;
        }
        parsed.push(ListingEntry { emoji, name, slug });
    }
    Ok(parsed)
}

/// Extract the code point and short names from a detail page.
///
/// A missing code-point link yields an empty `unicode`. Short names are
/// trimmed, colon-wrapped and de-duplicated in page order.
pub fn parse_detail(html: &str) -> Result<DetailFields, ScrapeError> {
    let document = Html::parse_document(html);
    let code_point = selector(CODE_POINT_SELECTOR)?;
    let short_code = selector(SHORT_CODE_SELECTOR)?;

    let unicode = document
        .select(&code_point)
        .next()
        .map(|anchor| code_point_from_text(&element_text(anchor)))
        .unwrap_or_default();

    let mut short_names: Vec<ShortName> = Vec::new();
    for element in document.select(&short_code) {
        let text = element_text(element);
        let text = text.trim();
        if text.is_empty() {
            continue;
        }
        let short = ShortName::normalize(text);
        if !short_names.contains(&short) {
            short_names.push(short);
        }
    }

    Ok(DetailFields {
        unicode,
        short_names,
    })
}

/// `🍎 U+1F34E` -> `1F34E`.
fn code_point_from_text(text: &str) -> String {
    let mut words = text.split_whitespace();
    let first = words.next();
    let word = words.next().or(first).unwrap_or_default();
    word.strip_prefix("U+")
        .or_else(|| word.strip_prefix("u+"))
        .unwrap_or(word)
        .to_string()
}
