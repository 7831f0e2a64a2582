// SPDX-License-Identifier: MPL-2.0
//! Serialization of the item model through an opaque string channel.
//!
//! Every participating type serializes as a JSON object carrying a `"type"`
//! discriminator, nested typed fields included, so a decoded tree
//! reconstructs the exact types that were encoded: `decode(encode(v))` is
//! structurally equal to `v`. Decoding dispatches exhaustively over the
//! known tags; an unregistered tag means the data came from an incompatible
//! writer and fails loudly with [`Error::UnknownTag`]. The encoded form has
//! no schema version and only needs to stay valid for one page session.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::item::{ImageSource, Item, VideoSource};
use crate::srcset::{SourceItem, SourceSet};

/// Type tags of every entity the codec can reconstruct.
const REGISTERED_TAGS: &[&str] = &[
    "item",
    "image-source",
    "video-source",
    "source-set",
    "source-item",
];

/// Sum of all serializable entities, one variant per registered tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entity {
    Item(Item),
    ImageSource(ImageSource),
    VideoSource(VideoSource),
    SourceSet(SourceSet),
    SourceItem(SourceItem),
}

impl Entity {
    /// Returns the registered tag of the contained entity.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Entity::Item(_) => "item",
            Entity::ImageSource(_) => "image-source",
            Entity::VideoSource(_) => "video-source",
            Entity::SourceSet(_) => "source-set",
            Entity::SourceItem(_) => "source-item",
        }
    }
}

impl From<Item> for Entity {
    fn from(value: Item) -> Self {
        Entity::Item(value)
    }
}

impl From<ImageSource> for Entity {
    fn from(value: ImageSource) -> Self {
        Entity::ImageSource(value)
    }
}

impl From<VideoSource> for Entity {
    fn from(value: VideoSource) -> Self {
        Entity::VideoSource(value)
    }
}

impl From<SourceSet> for Entity {
    fn from(value: SourceSet) -> Self {
        Entity::SourceSet(value)
    }
}

impl From<SourceItem> for Entity {
    fn from(value: SourceItem) -> Self {
        Entity::SourceItem(value)
    }
}

/// Encodes an item into its opaque string form.
///
/// # Errors
///
/// Returns [`Error::Codec`] if JSON serialization fails.
pub fn encode(item: &Item) -> Result<String> {
    Ok(serde_json::to_string(item)?)
}

/// Decodes an item from its opaque string form.
///
/// # Errors
///
/// Returns [`Error::UnknownTag`] when any object in the encoded tree carries
/// an unregistered type tag, and [`Error::Codec`] for malformed JSON, a
/// missing tag, or an encoded entity that is not an item.
pub fn decode(text: &str) -> Result<Item> {
    match decode_entity(text)? {
        Entity::Item(item) => Ok(item),
        other => Err(Error::Codec(format!(
            "expected an encoded item, found tag \"{}\"",
            other.tag()
        ))),
    }
}

/// Encodes any registered entity standalone.
///
/// # Errors
///
/// Returns [`Error::Codec`] if JSON serialization fails.
pub fn encode_entity(entity: &Entity) -> Result<String> {
    let text = match entity {
        Entity::Item(value) => serde_json::to_string(value)?,
        Entity::ImageSource(value) => serde_json::to_string(value)?,
        Entity::VideoSource(value) => serde_json::to_string(value)?,
        Entity::SourceSet(value) => serde_json::to_string(value)?,
        Entity::SourceItem(value) => serde_json::to_string(value)?,
    };
    Ok(text)
}

/// Decodes any registered entity, dispatching on its type tag.
///
/// # Errors
///
/// Returns [`Error::UnknownTag`] for an unregistered tag anywhere in the
/// tree and [`Error::Codec`] for malformed JSON or a mismatched shape.
pub fn decode_entity(text: &str) -> Result<Entity> {
    let value: Value = serde_json::from_str(text)?;
    validate_tags(&value)?;
    entity_from_value(value)
}

fn entity_from_value(value: Value) -> Result<Entity> {
    let tag = tag_of(&value)?.to_owned();
    match tag.as_str() {
        "item" => Ok(Entity::Item(serde_json::from_value(value)?)),
        "image-source" => Ok(Entity::ImageSource(serde_json::from_value(value)?)),
        "video-source" => Ok(Entity::VideoSource(serde_json::from_value(value)?)),
        "source-set" => Ok(Entity::SourceSet(serde_json::from_value(value)?)),
        "source-item" => Ok(Entity::SourceItem(serde_json::from_value(value)?)),
        _ => Err(Error::UnknownTag(tag)),
    }
}

/// Walks the decoded tree and checks that every object carries a registered
/// tag, so corruption nested deep inside an item still surfaces.
fn validate_tags(value: &Value) -> Result<()> {
    match value {
        Value::Object(map) => {
            let tag = tag_of(value)?;
            if !REGISTERED_TAGS.contains(&tag) {
                return Err(Error::UnknownTag(tag.to_owned()));
            }
            map.values().try_for_each(validate_tags)
        }
        Value::Array(values) => values.iter().try_for_each(validate_tags),
        _ => Ok(()),
    }
}

fn tag_of(value: &Value) -> Result<&str> {
    value
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::Codec("encoded object is missing its type tag".to_owned()))
}
