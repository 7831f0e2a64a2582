// SPDX-License-Identifier: MPL-2.0
//! Canonical displayable-item model and its extraction rules.
//!
//! A trigger element is handed over by the document scanner as raw attribute
//! strings ([`TriggerData`]); extraction classifies its reference URL and
//! assembles an [`Item`], the single record every later stage (gallery,
//! codec, viewer) operates on. Classification is mutually exclusive: an item
//! is driven by video, in-page content, an embedded frame, or an image, and
//! a poster image never outranks a richer media reference.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::media_query::MediaEnv;
use crate::srcset::SourceSet;

/// File extensions treated as directly displayable images.
const IMAGE_EXTENSIONS: &[&str] = &[
    "avif", "bmp", "gif", "heic", "heif", "jpeg", "jpg", "png", "svg", "webp",
];

/// File extensions treated as video resources.
const VIDEO_EXTENSIONS: &[&str] = &["avi", "m4v", "mkv", "mov", "mp4", "ogv", "webm"];

/// One `<picture>`-style alternative: a candidate set plus the conditions
/// under which it applies. Declaration order is significant; selection is
/// first-match (see [`match_media`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "image-source")]
pub struct ImageSource {
    /// Responsive candidates for this alternative.
    pub set: SourceSet,
    /// Media condition gating the alternative; `None` always applies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<String>,
    /// MIME type of the candidates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime: Option<String>,
    /// Intrinsic width of the alternative in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Intrinsic height of the alternative in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl ImageSource {
    /// Creates an unconditional alternative around one candidate set.
    #[must_use]
    pub fn new(set: SourceSet) -> Self {
        Self {
            set,
            media: None,
            mime: None,
            width: None,
            height: None,
        }
    }
}

/// One video candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "video-source")]
pub struct VideoSource {
    /// Resource URL.
    pub src: String,
    /// MIME type of the resource.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime: Option<String>,
}

impl VideoSource {
    /// Creates a candidate without a declared MIME type.
    #[must_use]
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            mime: None,
        }
    }
}

/// The media kind that drives how an item is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Still image, possibly with responsive alternatives.
    Image,
    /// Video with one or more playable candidates.
    Video,
    /// External page shown in an embedded frame.
    Frame,
    /// Element in the current document, cloned into the viewer.
    InPage,
}

/// Canonical description of one displayable unit.
///
/// Items are value objects: built once by [`Item::from_trigger`], never
/// mutated afterwards except by the codec round trip producing an equivalent
/// copy. An item none of whose media fields are populated is "unavailable"
/// and renders as such rather than raising an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "item")]
pub struct Item {
    /// Fallback single URL: the poster for video, or the direct source when
    /// no candidate set is present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Picture-style alternatives in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source: Vec<ImageSource>,
    /// Video candidates in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub video: Vec<VideoSource>,
    /// URL of external content shown in an embedded frame.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame: Option<String>,
    /// Identifier of in-page content to clone into the viewer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Alternative text for the displayed media.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    /// Caption markup shown under the media.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    /// Explicit intrinsic width override in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Explicit intrinsic height override in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// Raw, already-scanned attribute data for one trigger element.
///
/// The document scanner reads the presentation tree and hands the attribute
/// strings over verbatim; no further tree access happens past this point.
/// URLs stay in their authored (possibly relative) form, both here and in
/// the extracted item.
#[derive(Debug, Clone, Default)]
pub struct TriggerData {
    /// Primary reference URL of the trigger (the anchor target).
    pub reference: Option<String>,
    /// `src` of a thumbnail image wrapped by the trigger.
    pub thumbnail_src: Option<String>,
    /// `srcset` of a thumbnail image wrapped by the trigger.
    pub thumbnail_srcset: Option<String>,
    /// Explicit responsive-set attribute; overrides the thumbnail's set.
    pub srcset: Option<String>,
    /// Explicit intrinsic width in pixels.
    pub width: Option<u32>,
    /// Explicit intrinsic height in pixels.
    pub height: Option<u32>,
    /// Alternative text of the thumbnail.
    pub alt: Option<String>,
    /// Plain title string, the last caption fallback.
    pub title: Option<String>,
    /// Caption of a figure wrapped by the trigger.
    pub figure_caption: Option<String>,
    /// Caption of a figure enclosing the trigger.
    pub enclosing_caption: Option<String>,
    /// Nested picture-style source declarations.
    pub sources: Vec<ImageSource>,
    /// Nested video source declarations.
    pub videos: Vec<VideoSource>,
}

/// The page a trigger lives on, for origin and path classification.
#[derive(Debug, Clone)]
pub struct DocumentContext {
    base: Url,
}

impl DocumentContext {
    /// Creates a context for the document at `base`.
    #[must_use]
    pub fn new(base: Url) -> Self {
        Self { base }
    }

    /// Returns the document URL.
    #[must_use]
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Resolves a possibly relative reference against the document URL.
    fn resolve(&self, reference: &str) -> Option<Url> {
        self.base.join(reference).ok()
    }
}

/// How a trigger's reference URL participates in extraction.
enum ReferenceClass {
    Video,
    InPage(String),
    Image,
    Frame,
}

impl Item {
    /// Builds an item from scanner-provided raw data.
    ///
    /// The reference URL is classified into exactly one branch, evaluated in
    /// fixed priority order: video extension, then same-page fragment, then
    /// image extension, then embedded frame for everything else. Image
    /// detection runs last among the reference classes so that a trigger
    /// carrying both a poster thumbnail and a video or frame reference
    /// favors the richer media type, with the poster kept as fallback
    /// imagery. A trigger with no classifiable media yields an unavailable
    /// item rather than an error.
    #[must_use]
    pub fn from_trigger(data: &TriggerData, context: &DocumentContext) -> Self {
        // The explicit responsive-set attribute overrides the thumbnail's.
        let set = data
            .srcset
            .as_deref()
            .and_then(SourceSet::parse)
            .or_else(|| data.thumbnail_srcset.as_deref().and_then(SourceSet::parse));

        let mut image = data.thumbnail_src.clone();
        if image.is_none() {
            image = set.as_ref().map(|set| set.lowest().to_owned());
        }

        let mut source = data.sources.clone();
        if let Some(set) = set {
            // Declared alternatives come first; the resolved set is the
            // fallback entry, matching picture-element ordering.
            source.push(ImageSource::new(set));
        }

        let mut video = data.videos.clone();
        let mut frame = None;
        let mut id = None;

        if let Some(reference) = data.reference.as_deref() {
            match classify_reference(reference, context) {
                Some(ReferenceClass::Video) => {
                    video.insert(0, VideoSource::new(reference));
                }
                Some(ReferenceClass::InPage(fragment)) => id = Some(fragment),
                Some(ReferenceClass::Image) => {
                    if image.is_none() {
                        image = Some(reference.to_owned());
                    }
                }
                Some(ReferenceClass::Frame) => frame = Some(reference.to_owned()),
                None => {
                    tracing::debug!(reference, "reference URL could not be resolved");
                }
            }
        }

        let caption = data
            .figure_caption
            .clone()
            .or_else(|| data.enclosing_caption.clone())
            .or_else(|| data.title.clone());

        Self {
            image,
            source,
            video,
            frame,
            id,
            alt: data.alt.clone(),
            caption,
            width: data.width,
            height: data.height,
        }
    }

    /// Returns the media kind driving this item, or `None` for an
    /// unavailable item.
    ///
    /// Video outranks a frame, a frame outranks in-page content, and a
    /// poster image never outranks any of them.
    #[must_use]
    pub fn kind(&self) -> Option<MediaKind> {
        if !self.video.is_empty() {
            Some(MediaKind::Video)
        } else if self.frame.is_some() {
            Some(MediaKind::Frame)
        } else if self.id.is_some() {
            Some(MediaKind::InPage)
        } else if self.image.is_some() || !self.source.is_empty() {
            Some(MediaKind::Image)
        } else {
            None
        }
    }

    /// `true` when at least one media field can drive rendering.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.kind().is_some()
    }
}

/// Returns the first alternative whose media condition holds.
///
/// The scan is left to right over declaration order; an entry without a
/// condition always matches. This is first-match selection, not best-match,
/// so callers must preserve source order.
#[must_use]
pub fn match_media<'a>(sources: &'a [ImageSource], env: &MediaEnv) -> Option<&'a ImageSource> {
    sources
        .iter()
        .find(|source| source.media.as_deref().is_none_or(|media| env.matches(media)))
}

fn classify_reference(reference: &str, context: &DocumentContext) -> Option<ReferenceClass> {
    let resolved = context.resolve(reference)?;
    if has_extension(resolved.path(), VIDEO_EXTENSIONS) {
        return Some(ReferenceClass::Video);
    }
    let same_page = resolved.origin() == context.base.origin()
        && resolved.path() == context.base.path();
    if same_page {
        if let Some(fragment) = resolved.fragment().filter(|f| !f.is_empty()) {
            return Some(ReferenceClass::InPage(fragment.to_owned()));
        }
    }
    if has_extension(resolved.path(), IMAGE_EXTENSIONS) {
        return Some(ReferenceClass::Image);
    }
    Some(ReferenceClass::Frame)
}

/// Case-insensitive extension match on the final path segment.
fn has_extension(path: &str, extensions: &[&str]) -> bool {
    let segment = path.rsplit('/').next().unwrap_or(path);
    let Some((_, extension)) = segment.rsplit_once('.') else {
        return false;
    };
    let extension = extension.to_ascii_lowercase();
    extensions.contains(&extension.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> DocumentContext {
        DocumentContext::new(Url::parse("https://example.com/gallery.html").expect("valid URL"))
    }

    fn source_with_media(media: Option<&str>) -> ImageSource {
        let set = SourceSet::parse("a.jpg 100w").expect("valid token");
        ImageSource {
            media: media.map(str::to_owned),
            ..ImageSource::new(set)
        }
    }

    #[test]
    fn match_media_skips_a_false_condition_for_an_unconditional_entry() {
        let sources = vec![
            source_with_media(Some("(min-width: 999999px)")),
            source_with_media(None),
        ];
        let env = MediaEnv::new(1024.0, 768.0);

        let matched = match_media(&sources, &env).expect("second entry matches");
        assert!(std::ptr::eq(matched, &sources[1]));
    }

    #[test]
    fn match_media_is_first_match_not_best_match() {
        let sources = vec![
            source_with_media(Some("(min-width: 600px)")),
            source_with_media(Some("(min-width: 1000px)")),
        ];
        let env = MediaEnv::new(1024.0, 768.0);

        let matched = match_media(&sources, &env).expect("first entry matches");
        assert!(std::ptr::eq(matched, &sources[0]));
    }

    #[test]
    fn match_media_returns_none_when_no_condition_holds() {
        let sources = vec![source_with_media(Some("(min-width: 999999px)"))];
        let env = MediaEnv::new(1024.0, 768.0);
        assert!(match_media(&sources, &env).is_none());
    }

    #[test]
    fn bare_image_link_becomes_an_image_item() {
        let data = TriggerData {
            reference: Some("photos/large.jpg".to_owned()),
            ..TriggerData::default()
        };
        let item = Item::from_trigger(&data, &context());

        assert_eq!(item.kind(), Some(MediaKind::Image));
        assert_eq!(item.image.as_deref(), Some("photos/large.jpg"));
        assert!(item.frame.is_none());
    }

    #[test]
    fn thumbnail_source_outranks_the_reference_image() {
        let data = TriggerData {
            reference: Some("large.jpg".to_owned()),
            thumbnail_src: Some("thumb.jpg".to_owned()),
            ..TriggerData::default()
        };
        let item = Item::from_trigger(&data, &context());

        assert_eq!(item.image.as_deref(), Some("thumb.jpg"));
        assert_eq!(item.kind(), Some(MediaKind::Image));
    }

    #[test]
    fn explicit_srcset_attribute_overrides_the_thumbnail_set() {
        let data = TriggerData {
            thumbnail_srcset: Some("t-small.jpg 100w, t-large.jpg 200w".to_owned()),
            srcset: Some("small.jpg 320w, large.jpg 1280w".to_owned()),
            ..TriggerData::default()
        };
        let item = Item::from_trigger(&data, &context());

        assert_eq!(item.source.len(), 1);
        assert_eq!(item.source[0].set.highest(), "large.jpg");
        // No thumbnail src, so the narrowest candidate backs the poster.
        assert_eq!(item.image.as_deref(), Some("small.jpg"));
    }

    #[test]
    fn declared_sources_precede_the_resolved_set() {
        let declared = source_with_media(Some("(min-width: 600px)"));
        let data = TriggerData {
            sources: vec![declared.clone()],
            srcset: Some("fallback.jpg 640w".to_owned()),
            ..TriggerData::default()
        };
        let item = Item::from_trigger(&data, &context());

        assert_eq!(item.source.len(), 2);
        assert_eq!(item.source[0], declared);
        assert_eq!(item.source[1].set.highest(), "fallback.jpg");
    }

    #[test]
    fn video_reference_outranks_a_poster_thumbnail() {
        let data = TriggerData {
            reference: Some("clip.mp4".to_owned()),
            thumbnail_src: Some("poster.jpg".to_owned()),
            ..TriggerData::default()
        };
        let item = Item::from_trigger(&data, &context());

        assert_eq!(item.kind(), Some(MediaKind::Video));
        assert_eq!(item.video[0].src, "clip.mp4");
        assert_eq!(item.image.as_deref(), Some("poster.jpg"));
    }

    #[test]
    fn reference_video_precedes_declared_video_sources() {
        let data = TriggerData {
            reference: Some("clip.webm".to_owned()),
            videos: vec![VideoSource::new("declared.mp4")],
            ..TriggerData::default()
        };
        let item = Item::from_trigger(&data, &context());

        assert_eq!(item.video.len(), 2);
        assert_eq!(item.video[0].src, "clip.webm");
        assert_eq!(item.video[1].src, "declared.mp4");
    }

    #[test]
    fn cross_origin_reference_becomes_a_frame() {
        let data = TriggerData {
            reference: Some("https://other.example.net/page".to_owned()),
            ..TriggerData::default()
        };
        let item = Item::from_trigger(&data, &context());

        assert_eq!(item.kind(), Some(MediaKind::Frame));
        assert_eq!(item.frame.as_deref(), Some("https://other.example.net/page"));
    }

    #[test]
    fn same_origin_non_media_reference_becomes_a_frame() {
        let data = TriggerData {
            reference: Some("/other.html".to_owned()),
            ..TriggerData::default()
        };
        let item = Item::from_trigger(&data, &context());

        assert_eq!(item.kind(), Some(MediaKind::Frame));
    }

    #[test]
    fn same_page_fragment_becomes_an_in_page_target() {
        let data = TriggerData {
            reference: Some("#details".to_owned()),
            ..TriggerData::default()
        };
        let item = Item::from_trigger(&data, &context());

        assert_eq!(item.kind(), Some(MediaKind::InPage));
        assert_eq!(item.id.as_deref(), Some("details"));
        assert!(item.frame.is_none());
    }

    #[test]
    fn caption_prefers_wrapped_figure_then_enclosing_then_title() {
        let full = TriggerData {
            figure_caption: Some("wrapped".to_owned()),
            enclosing_caption: Some("enclosing".to_owned()),
            title: Some("title".to_owned()),
            ..TriggerData::default()
        };
        assert_eq!(
            Item::from_trigger(&full, &context()).caption.as_deref(),
            Some("wrapped")
        );

        let no_wrapped = TriggerData {
            figure_caption: None,
            ..full.clone()
        };
        assert_eq!(
            Item::from_trigger(&no_wrapped, &context()).caption.as_deref(),
            Some("enclosing")
        );

        let title_only = TriggerData {
            title: Some("title".to_owned()),
            ..TriggerData::default()
        };
        assert_eq!(
            Item::from_trigger(&title_only, &context()).caption.as_deref(),
            Some("title")
        );
    }

    #[test]
    fn empty_trigger_yields_an_unavailable_item() {
        let item = Item::from_trigger(&TriggerData::default(), &context());
        assert!(!item.is_available());
        assert_eq!(item.kind(), None);
    }

    #[test]
    fn kind_priority_favors_video_over_frame_over_in_page() {
        let item = Item {
            video: vec![VideoSource::new("clip.mp4")],
            frame: Some("https://other.example.net/".to_owned()),
            id: Some("section".to_owned()),
            ..Item::default()
        };
        assert_eq!(item.kind(), Some(MediaKind::Video));

        let item = Item {
            frame: Some("https://other.example.net/".to_owned()),
            id: Some("section".to_owned()),
            ..Item::default()
        };
        assert_eq!(item.kind(), Some(MediaKind::Frame));
    }

    #[test]
    fn extension_matching_is_case_insensitive_and_segment_local() {
        assert!(has_extension("/photos/IMG.JPG", IMAGE_EXTENSIONS));
        assert!(has_extension("/a.b/clip.mp4", VIDEO_EXTENSIONS));
        assert!(!has_extension("/a.jpg/listing", IMAGE_EXTENSIONS));
        assert!(!has_extension("/no-extension", IMAGE_EXTENSIONS));
    }
}
