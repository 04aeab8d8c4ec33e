//! Raw export records and their formatted projection.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use serde_json::Value;

use super::fields;
use super::fragment::{DataFragment, PostFragment};
use super::media::{looks_like_photo, web_uri, MediaMetadata};
use super::time::format_timestamp;
use crate::constants::DEFAULT_TAG_COLLECTION;

/// One entry of a post's `attachments` array.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    /// The nested `data` entries. Empty when absent or not an array.
    pub entries: Vec<Value>,
}

impl Attachment {
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        Self {
            entries: fields::array(value, "data").to_vec(),
        }
    }
}

/// A tagged person (or, in future, some other kind of tag).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagHolder {
    pub name: String,
    /// Which kind of record the name refers to, e.g. `people`.
    pub collection: String,
    /// Any other string fields present on the tag.
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl TagHolder {
    /// Build a tag from its raw form. Tags without a non-empty string name are dropped.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        let name = fields::non_empty_string(value, "name")?;
        let collection = fields::non_empty_string(value, "collection").unwrap_or(DEFAULT_TAG_COLLECTION);
        let extra = value
            .as_object()
            .into_iter()
            .flatten()
            .filter(|(key, _)| !matches!(key.as_str(), "name" | "collection"))
            .filter_map(|(key, v)| v.as_str().map(|s| (key.clone(), s.to_string())))
            .collect();

        Some(Self {
            name: name.to_string(),
            collection: collection.to_string(),
            extra,
        })
    }
}

/// One post record from the export, with its known fields pulled out.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPost {
    id: Option<Value>,
    timestamp: Option<i64>,
    created_time: Option<i64>,
    created: Option<i64>,
    title: Option<String>,
    data: Vec<DataFragment>,
    attachments: Vec<Attachment>,
    tags: Vec<Value>,
    /// The record as exported, minus pruned `data` entries.
    raw: Value,
}

impl RawPost {
    /// Wrap a raw export record.
    ///
    /// `data` entries that are empty or not objects/arrays (`{}`, `null`,
    /// numbers, strings) are removed before anything else looks at them.
    /// Anything that is not an object becomes an empty post that still
    /// carries the original value.
    #[must_use]
    pub fn from_value(mut raw: Value) -> Self {
        if let Some(Value::Array(data)) = raw.get_mut("data") {
            data.retain(fields::has_entries);
        }

        Self {
            id: raw.get("id").filter(|id| !id.is_null()).cloned(),
            timestamp: fields::timestamp(&raw, "timestamp"),
            created_time: fields::timestamp(&raw, "created_time"),
            created: fields::timestamp(&raw, "created"),
            title: fields::string(&raw, "title").map(String::from),
            data: fields::array(&raw, "data")
                .iter()
                .cloned()
                .map(DataFragment::classify)
                .collect(),
            attachments: fields::array(&raw, "attachments")
                .iter()
                .map(Attachment::from_value)
                .collect(),
            tags: fields::array(&raw, "tags").to_vec(),
            raw,
        }
    }

    #[must_use]
    pub fn id(&self) -> Option<&Value> {
        self.id.as_ref()
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    #[must_use]
    pub fn fragments(&self) -> &[DataFragment] {
        &self.data
    }

    #[must_use]
    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    #[must_use]
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Number of `data` entries left after pruning.
    #[must_use]
    pub fn data_count(&self) -> usize {
        self.data.len()
    }

    /// The first non-blank text fragment, else the title, else empty. Trimmed.
    #[must_use]
    pub fn text(&self) -> String {
        self.data
            .iter()
            .find_map(DataFragment::text_body)
            .or_else(|| self.title.as_deref().map(str::trim))
            .unwrap_or_default()
            .to_string()
    }

    /// The timestamp that represents this post.
    ///
    /// Export versions populate different fields, so they are tried in a
    /// fixed order: `timestamp`, `created_time`, `created`, then the first
    /// data fragment.
    #[must_use]
    pub fn relevant_timestamp(&self) -> i64 {
        self.timestamp
            .or(self.created_time)
            .or(self.created)
            .or_else(|| self.data.first().map(DataFragment::relevant_timestamp))
            .unwrap_or(0)
    }

    /// Total number of nested attachment entries.
    #[must_use]
    pub fn attachments_count(&self) -> usize {
        self.attachments.iter().map(|a| a.entries.len()).sum()
    }

    #[must_use]
    pub fn tags(&self) -> Vec<TagHolder> {
        self.tags.iter().filter_map(TagHolder::from_value).collect()
    }

    /// Attached media, one entry per distinct uri in first-seen order.
    #[must_use]
    pub fn media(&self) -> Vec<PostFragment> {
        let post_timestamp = self.relevant_timestamp();
        let mut seen = HashSet::new();
        let mut media = Vec::new();

        for entry in self.attachments.iter().flat_map(|a| &a.entries) {
            let metadata = entry.get("media").map(MediaMetadata::classify);
            let Some(uri) = metadata
                .as_ref()
                .and_then(MediaMetadata::uri)
                .or_else(|| fields::non_empty_string(entry, "uri"))
            else {
                continue;
            };
            if !seen.insert(uri.to_string()) {
                continue;
            }

            let is_photo =
                metadata.as_ref().is_some_and(MediaMetadata::is_photo) || looks_like_photo(uri);
            media.push(PostFragment {
                text: String::new(),
                timestamp: fields::timestamp(entry, "update_timestamp").unwrap_or(post_timestamp),
                media_uri: Some(uri.to_string()),
                web_uri: Some(web_uri(uri)),
                is_photo,
                is_unknown: false,
                is_meaningful: true,
                raw: entry.clone(),
            });
        }

        media
    }

    /// Project into the read-only shape renderers and exporters consume.
    ///
    /// Recomputed on every call; nothing is cached on the post.
    #[must_use]
    pub fn formatted(&self) -> FormattedPost {
        let media = self.media();
        let media_uris: HashSet<&str> = media.iter().filter_map(|m| m.media_uri.as_deref()).collect();

        let fragments: Vec<PostFragment> = self
            .data
            .iter()
            .filter(|f| !f.media_uri().is_some_and(|uri| media_uris.contains(uri)))
            .map(DataFragment::formatted)
            .collect();
        let meaningful_entries_count = fragments.iter().filter(|f| f.is_meaningful).count();

        FormattedPost {
            id: self.id.clone(),
            text: self.text(),
            timestamp: self.relevant_timestamp(),
            attachments_count: self.attachments_count(),
            meaningful_entries_count,
            tags: self.tags(),
            fragments,
            media,
            raw: self.raw.clone(),
        }
    }
}

impl From<Value> for RawPost {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}

/// The read-only view of a post handed to renderers and exporters.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedPost {
    pub id: Option<Value>,
    pub text: String,
    pub timestamp: i64,
    pub attachments_count: usize,
    pub meaningful_entries_count: usize,
    pub tags: Vec<TagHolder>,
    pub fragments: Vec<PostFragment>,
    pub media: Vec<PostFragment>,
    #[serde(rename = "_raw")]
    pub raw: Value,
}

impl FormattedPost {
    /// Photo fragments followed by attached media, as exporters lay out a gallery.
    #[must_use]
    pub fn gallery(&self) -> Vec<&PostFragment> {
        self.fragments
            .iter()
            .filter(|f| f.is_photo)
            .chain(&self.media)
            .collect()
    }

    /// Human-readable form of [`FormattedPost::timestamp`].
    #[must_use]
    pub fn display_time(&self) -> Option<String> {
        format_timestamp(self.timestamp)
    }
}
