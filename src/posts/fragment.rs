//! Classification of the entries in a post's `data` array.

use serde::Serialize;
use serde_json::Value;

use super::fields;
use super::media::{looks_like_photo, web_uri, MediaMetadata};
use crate::constants::MEANINGFUL_KEYS;

/// What a data entry turned out to be.
#[derive(Debug, Clone, PartialEq)]
pub enum FragmentKind {
    /// An entry carrying a `post` key. `body` is empty when the value is not a string.
    Text { body: String },
    /// An entry carrying a `media` key, which wins over `post`.
    Media(MediaMetadata),
    /// No specialized payload, but at least one recognized key.
    Generic,
    /// Nothing recognized. Kept only so the raw payload stays inspectable.
    Unknown,
}

/// One classified entry of a post's `data` array.
#[derive(Debug, Clone, PartialEq)]
pub struct DataFragment {
    kind: FragmentKind,
    raw: Value,
}

impl DataFragment {
    /// Classify a raw data entry. Never fails.
    #[must_use]
    pub fn classify(raw: Value) -> Self {
        let kind = match raw.as_object() {
            Some(map) if map.contains_key("media") => {
                FragmentKind::Media(MediaMetadata::classify(&map["media"]))
            }
            Some(map) if map.contains_key("post") => FragmentKind::Text {
                body: fields::string(&raw, "post").unwrap_or_default().to_string(),
            },
            Some(map) if map.keys().any(|k| MEANINGFUL_KEYS.contains(&k.as_str())) => {
                FragmentKind::Generic
            }
            _ => FragmentKind::Unknown,
        };
        Self { kind, raw }
    }

    #[must_use]
    pub fn kind(&self) -> &FragmentKind {
        &self.kind
    }

    #[must_use]
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// The non-empty trimmed body of a text fragment.
    #[must_use]
    pub fn text_body(&self) -> Option<&str> {
        match &self.kind {
            FragmentKind::Text { body } => Some(body.trim()).filter(|b| !b.is_empty()),
            _ => None,
        }
    }

    /// `creation_timestamp`, else `update_timestamp`, else 0.
    #[must_use]
    pub fn relevant_timestamp(&self) -> i64 {
        fields::timestamp(&self.raw, "creation_timestamp")
            .or_else(|| fields::timestamp(&self.raw, "update_timestamp"))
            .unwrap_or(0)
    }

    #[must_use]
    pub fn is_meaningful(&self) -> bool {
        !matches!(self.kind, FragmentKind::Unknown)
    }

    /// The media file this fragment refers to, if any.
    #[must_use]
    pub fn media_uri(&self) -> Option<&str> {
        let own_uri = fields::non_empty_string(&self.raw, "uri");
        match &self.kind {
            FragmentKind::Media(media) => media.uri().or(own_uri),
            FragmentKind::Text { .. } | FragmentKind::Generic => own_uri,
            FragmentKind::Unknown => None,
        }
    }

    /// Project into the shape renderers and exporters consume.
    #[must_use]
    pub fn formatted(&self) -> PostFragment {
        let media_uri = self.media_uri().map(String::from);
        let is_photo = match &self.kind {
            FragmentKind::Media(media) if media.is_photo() => true,
            _ => media_uri.as_deref().is_some_and(looks_like_photo),
        };
        let text = fields::non_empty_string(&self.raw, "post")
            .or_else(|| fields::non_empty_string(&self.raw, "description"))
            .unwrap_or_default()
            .to_string();

        PostFragment {
            text,
            timestamp: self.relevant_timestamp(),
            web_uri: media_uri.as_deref().map(web_uri),
            media_uri,
            is_photo,
            is_unknown: matches!(self.kind, FragmentKind::Unknown),
            is_meaningful: self.is_meaningful(),
            raw: self.raw.clone(),
        }
    }
}

/// A display-ready piece of a post: a fragment or an attached media file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostFragment {
    pub text: String,
    pub timestamp: i64,
    pub media_uri: Option<String>,
    pub web_uri: Option<String>,
    pub is_photo: bool,
    pub is_unknown: bool,
    pub is_meaningful: bool,
    #[serde(rename = "_raw")]
    pub raw: Value,
}
