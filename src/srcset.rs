// SPDX-License-Identifier: MPL-2.0
//! Responsive source-set resolution.
//!
//! Parses width-described candidate lists (`"<url> <N>w, ..."`) into a
//! [`SourceSet`] sorted by natural width, and derives the sizing hint that
//! keeps a rendered image from upscaling past its best available candidate.

use serde::{Deserialize, Serialize};

/// One responsive image candidate: a URL and its natural width in pixels.
///
/// Immutable once created; `width` is always greater than zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "source-item", try_from = "RawSourceItem")]
pub struct SourceItem {
    url: String,
    width: u32,
}

/// Decoded candidate shape before the width invariant is checked.
#[derive(Deserialize)]
#[serde(tag = "type", rename = "source-item")]
struct RawSourceItem {
    url: String,
    width: u32,
}

impl TryFrom<RawSourceItem> for SourceItem {
    type Error = String;

    fn try_from(raw: RawSourceItem) -> std::result::Result<Self, Self::Error> {
        SourceItem::new(raw.url, raw.width)
            .ok_or_else(|| "source candidate width must be positive".to_owned())
    }
}

impl SourceItem {
    /// Creates a candidate. Returns `None` when `width` is zero.
    #[must_use]
    pub fn new(url: impl Into<String>, width: u32) -> Option<Self> {
        if width == 0 {
            return None;
        }
        Some(Self {
            url: url.into(),
            width,
        })
    }

    /// Returns the candidate URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the natural width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }
}

/// An ordered collection of responsive candidates, sorted by width descending.
///
/// Construction never yields an empty set: callers represent "no source set"
/// as `Option::None` so that absent and single-candidate sets are handled
/// uniformly. The descending sort makes [`highest`](Self::highest) and
/// [`lowest`](Self::lowest) O(1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "source-set", try_from = "RawSourceSet")]
pub struct SourceSet {
    items: Vec<SourceItem>,
}

/// Decoded set shape before the construction invariants are re-established.
///
/// Encoded text is an opaque channel, so a hand-authored or reordered
/// payload must not produce a set whose candidates are unsorted; decoding
/// goes through [`SourceSet::from_items`] like every other construction.
#[derive(Deserialize)]
#[serde(tag = "type", rename = "source-set")]
struct RawSourceSet {
    items: Vec<SourceItem>,
}

impl TryFrom<RawSourceSet> for SourceSet {
    type Error = String;

    fn try_from(raw: RawSourceSet) -> std::result::Result<Self, Self::Error> {
        SourceSet::from_items(raw.items).ok_or_else(|| "source set has no candidates".to_owned())
    }
}

impl SourceSet {
    /// Parses a comma-separated candidate list of `"<url> <N>w"` tokens.
    ///
    /// Parsing is tolerant: tokens without a positive `w` width descriptor
    /// (density descriptors, missing widths, zero widths) are skipped, and
    /// descriptor text following a valid width is ignored. Returns `None`
    /// when no valid token remains.
    #[must_use]
    pub fn parse(descriptor: &str) -> Option<Self> {
        let items: Vec<SourceItem> = descriptor
            .split(',')
            .filter_map(parse_candidate)
            .collect();
        Self::from_items(items)
    }

    /// Builds a set from pre-parsed candidates, sorting by width descending.
    ///
    /// The sort is stable, so candidates with equal widths keep their
    /// declaration order. Returns `None` for an empty candidate list.
    #[must_use]
    pub fn from_items(mut items: Vec<SourceItem>) -> Option<Self> {
        if items.is_empty() {
            return None;
        }
        items.sort_by(|a, b| b.width.cmp(&a.width));
        Some(Self { items })
    }

    /// Returns the URL of the widest candidate.
    #[must_use]
    pub fn highest(&self) -> &str {
        &self.items[0].url
    }

    /// Returns the URL of the narrowest candidate.
    #[must_use]
    pub fn lowest(&self) -> &str {
        &self.items[self.items.len() - 1].url
    }

    /// Returns the natural width of the widest candidate.
    #[must_use]
    pub fn max_width(&self) -> u32 {
        self.items[0].width
    }

    /// Returns the candidates in width-descending order.
    #[must_use]
    pub fn items(&self) -> &[SourceItem] {
        &self.items
    }

    /// Returns the number of candidates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always `false`: construction rejects empty sets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Re-serializes the set into a candidate list and a sizing hint.
    ///
    /// The hint clamps the rendered width to the widest candidate's natural
    /// width W: viewports at least W pixels wide get exactly `W px`, narrower
    /// viewports get `100vw`. The element therefore shrinks responsively but
    /// never upscales past its best available resolution.
    #[must_use]
    pub fn to_responsive_hint(&self) -> (String, String) {
        let candidates = self
            .items
            .iter()
            .map(|item| format!("{} {}w", item.url, item.width))
            .collect::<Vec<_>>()
            .join(", ");
        let max = self.max_width();
        let sizes = format!("(min-width: {max}px) {max}px, 100vw");
        (candidates, sizes)
    }
}

/// Parses a single `"<url> <N>w"` token, returning `None` for malformed ones.
fn parse_candidate(token: &str) -> Option<SourceItem> {
    let mut fields = token.split_whitespace();
    let url = fields.next()?;
    let descriptor = fields.next()?;
    let width: u32 = descriptor.strip_suffix('w')?.parse().ok()?;
    SourceItem::new(url, width)
}
