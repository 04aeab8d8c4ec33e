//! Media metadata attached to fragments and attachments.

use regex::Regex;
use serde_json::Value;

use super::fields;
use crate::constants::MEDIA_WEB_PREFIX;

static PHOTO_EXTENSION: std::sync::LazyLock<Regex> =
    std::sync::LazyLock::new(|| Regex::new(r"(?i)\.(jpg|jpeg|png|gif|webp)$").unwrap());

/// Fields shared by every kind of media metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaInfo {
    pub uri: Option<String>,
    pub creation_timestamp: Option<i64>,
    pub update_timestamp: Option<i64>,
    /// The metadata object exactly as it appeared in the export.
    pub raw: Value,
}

/// Media metadata, classified once when it is read.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaMetadata {
    /// A media reference with no further qualification.
    Generic(MediaInfo),
    /// Media carrying a `media_metadata.photo_metadata` marker.
    Photo(MediaInfo),
}

impl MediaMetadata {
    /// Classify a raw metadata object.
    ///
    /// Anything that is not an object becomes generic media without a uri.
    #[must_use]
    pub fn classify(value: &Value) -> Self {
        let info = MediaInfo {
            uri: fields::non_empty_string(value, "uri").map(String::from),
            creation_timestamp: fields::timestamp(value, "creation_timestamp"),
            update_timestamp: fields::timestamp(value, "update_timestamp"),
            raw: value.clone(),
        };

        let has_photo_marker = value
            .get("media_metadata")
            .and_then(|m| m.get("photo_metadata"))
            .is_some_and(fields::is_truthy);

        if has_photo_marker {
            Self::Photo(info)
        } else {
            Self::Generic(info)
        }
    }

    #[must_use]
    pub fn info(&self) -> &MediaInfo {
        match self {
            Self::Generic(info) | Self::Photo(info) => info,
        }
    }

    #[must_use]
    pub fn uri(&self) -> Option<&str> {
        self.info().uri.as_deref()
    }

    #[must_use]
    pub fn is_photo(&self) -> bool {
        matches!(self, Self::Photo(_))
    }
}

/// Guess from the file extension whether a uri points at an image.
#[must_use]
pub fn looks_like_photo(uri: &str) -> bool {
    PHOTO_EXTENSION.is_match(uri)
}

/// Path under which an exported media file is served.
#[must_use]
pub fn web_uri(uri: &str) -> String {
    format!("{MEDIA_WEB_PREFIX}{uri}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_photo_marker() {
        let media = MediaMetadata::classify(&json!({
            "uri": "photos/a.bin",
            "media_metadata": {"photo_metadata": {"exif_data": []}}
        }));
        assert!(media.is_photo());
        assert_eq!(media.uri(), Some("photos/a.bin"));
    }

    #[test]
    fn test_generic_without_marker() {
        let media = MediaMetadata::classify(&json!({
            "uri": "videos/a.mp4",
            "creation_timestamp": 12,
            "media_metadata": {"video_metadata": {}}
        }));
        assert!(!media.is_photo());
        assert_eq!(media.info().creation_timestamp, Some(12));
    }

    #[test]
    fn test_null_marker_is_not_photo() {
        let media = MediaMetadata::classify(&json!({
            "media_metadata": {"photo_metadata": null}
        }));
        assert!(!media.is_photo());
    }

    #[test]
    fn test_falsy_marker_is_not_photo() {
        for marker in [json!(false), json!(0), json!("")] {
            let media = MediaMetadata::classify(&json!({
                "uri": "v.mp4",
                "media_metadata": {"photo_metadata": marker}
            }));
            assert!(!media.is_photo());
        }
    }

    #[test]
    fn test_non_object_is_generic() {
        let media = MediaMetadata::classify(&json!("photos/a.jpg"));
        assert!(!media.is_photo());
        assert_eq!(media.uri(), None);
    }

    #[test]
    fn test_looks_like_photo() {
        assert!(looks_like_photo("a.jpg"));
        assert!(looks_like_photo("dir/B.JPEG"));
        assert!(looks_like_photo("x.webp"));
        assert!(!looks_like_photo("x.mp4"));
        assert!(!looks_like_photo("jpg"));
        assert!(!looks_like_photo("a.jpg.txt"));
    }

    #[test]
    fn test_web_uri() {
        assert_eq!(web_uri("photos/a.jpg"), "/data/photos/a.jpg");
    }
}
