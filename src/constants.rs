//! Shared constants used across the application.

/// Keys that make an otherwise unrecognized fragment worth keeping.
///
/// A fragment carrying none of these is classified as unknown and is never
/// counted as meaningful.
pub const MEANINGFUL_KEYS: &[&str] = &[
    "post",
    "uri",
    "media",
    "description",
    "attachments",
    "update_timestamp",
    "creation_timestamp",
    "title",
    "tags",
];

/// Collection every normalized tag belongs to unless told otherwise.
pub const DEFAULT_TAG_COLLECTION: &str = "people";

/// Page size used when the requested one is missing or nonsensical.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Prefix under which exported media files are served.
pub const MEDIA_WEB_PREFIX: &str = "/data/";

/// Numeric timestamps below this are seconds, at or above it milliseconds.
pub const MILLIS_THRESHOLD: u64 = 1_000_000_000_000;
