//! Normalization of raw archive export records.
//!
//! Export files drift between tool versions, so nothing here validates its
//! input. Every lookup degrades to an empty or zero default and the original
//! payload is always retained for inspection.

mod fields;
mod fragment;
mod media;
mod post;
mod time;

pub use fragment::{DataFragment, FragmentKind, PostFragment};
pub use media::{looks_like_photo, web_uri, MediaInfo, MediaMetadata};
pub use post::{Attachment, FormattedPost, RawPost, TagHolder};
pub use time::{format_timestamp, timestamp_to_datetime};
