//! Archive reader library.
//!
//! Turns a personal-data archive export (posts with loosely structured
//! fragments, attachments and tags) into a stable typed model, and serves
//! sorted, paginated views over it.

pub mod config;
pub mod constants;
pub mod loader;
pub mod posts;
pub mod query;

pub use loader::{load_posts, LoadError};
pub use posts::{FormattedPost, PostFragment, RawPost};
pub use query::{Page, PageRequest, QueryEngine, SortKey, SortOrder, SortState};
