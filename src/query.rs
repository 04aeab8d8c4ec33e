//! Sorting and pagination over the resident post collection.
//!
//! The collection is loaded once and then only ever re-ordered. Sorting
//! happens in place under a write lock so concurrent readers never observe a
//! half-sorted order; pagination only takes the read lock.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::DEFAULT_PAGE_SIZE;
use crate::posts::{FormattedPost, RawPost};

/// Field the collection is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Timestamp,
    CreatedTime,
    #[default]
    Text,
    Title,
}

impl SortKey {
    /// Parse a sort key name, returning `None` for anything unrecognized.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "timestamp" => Some(Self::Timestamp),
            "created_time" => Some(Self::CreatedTime),
            "text" => Some(Self::Text),
            "title" => Some(Self::Title),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Timestamp => "timestamp",
            Self::CreatedTime => "created_time",
            Self::Text => "text",
            Self::Title => "title",
        }
    }
}

impl FromStr for SortKey {
    type Err = std::convert::Infallible;

    /// Lenient parse for request input: unknown keys sort by text.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s).unwrap_or_default())
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of the sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Parse a sort order, returning `None` for anything unrecognized.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Some(Self::Asc),
            "desc" | "descending" => Some(Self::Desc),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// Orient an ascending comparison result.
    #[must_use]
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

impl FromStr for SortOrder {
    type Err = std::convert::Infallible;

    /// Lenient parse for request input: unknown orders sort ascending.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s).unwrap_or_default())
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The order the collection is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortState {
    pub key: SortKey,
    pub order: SortOrder,
}

impl SortState {
    #[must_use]
    pub const fn new(key: SortKey, order: SortOrder) -> Self {
        Self { key, order }
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    /// Number of pages needed to show `total` items.
    #[must_use]
    pub fn total_pages(&self) -> usize {
        self.total.div_ceil(self.page_size.max(1))
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.page.saturating_mul(self.page_size) < self.total
    }

    #[must_use]
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

/// A page request as it arrives from a caller, before clamping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageRequest {
    pub page: f64,
    pub page_size: f64,
    /// Sort to apply before slicing. `None` keeps the current order.
    pub sort: Option<SortState>,
}

impl PageRequest {
    #[must_use]
    pub const fn new(page: f64, page_size: f64) -> Self {
        Self {
            page,
            page_size,
            sort: None,
        }
    }

    /// Build a request from raw query-string values.
    ///
    /// A missing page means the first page; a missing page size means the
    /// default. Unparseable values become NaN and are clamped later.
    #[must_use]
    pub fn parse(page: Option<&str>, page_size: Option<&str>) -> Self {
        let number = |s: &str| s.trim().parse::<f64>().unwrap_or(f64::NAN);
        Self::new(
            page.map_or(1.0, number),
            page_size.map_or(f64::NAN, number),
        )
    }

    #[must_use]
    pub const fn with_sort(mut self, key: SortKey, order: SortOrder) -> Self {
        self.sort = Some(SortState::new(key, order));
        self
    }
}

/// Clamp a requested page number: floored, at least 1.
#[must_use]
pub fn resolve_page(page: f64) -> usize {
    if !page.is_finite() || page < 1.0 {
        return 1;
    }
    page.floor() as usize
}

/// Clamp a requested page size: floored, at least 1, default for nonsense.
#[must_use]
pub fn resolve_page_size(page_size: f64) -> usize {
    if !page_size.is_finite() || page_size <= 0.0 {
        return DEFAULT_PAGE_SIZE;
    }
    (page_size.floor() as usize).max(1)
}

struct EngineState {
    posts: Vec<RawPost>,
    sort: SortState,
}

/// Holds the normalized posts and serves sorted pages of them.
pub struct QueryEngine {
    state: RwLock<EngineState>,
}

impl QueryEngine {
    /// Create an engine over the loaded posts, sorted by `sort`.
    #[must_use]
    pub fn new(mut posts: Vec<RawPost>, sort: SortState) -> Self {
        sort_posts(&mut posts, sort);
        Self {
            state: RwLock::new(EngineState { posts, sort }),
        }
    }

    /// Re-sort the whole collection in place.
    ///
    /// The new order is visible to every subsequent reader.
    pub fn set_sort(&self, key: SortKey, order: SortOrder) {
        let mut state = self.write();
        let sort = SortState::new(key, order);
        sort_posts(&mut state.posts, sort);
        state.sort = sort;
    }

    /// Slice the collection in its current order.
    ///
    /// Never fails: bad input is clamped and a page past the end is empty.
    #[must_use]
    pub fn paginate(&self, page: f64, page_size: f64) -> Page<FormattedPost> {
        let state = self.read();
        slice(&state.posts, page, page_size)
    }

    /// Apply the request's sort, if any, and slice, as one atomic step.
    #[must_use]
    pub fn query(&self, request: &PageRequest) -> Page<FormattedPost> {
        match request.sort {
            Some(sort) if sort != self.sort_state() => {
                let mut state = self.write();
                if state.sort != sort {
                    sort_posts(&mut state.posts, sort);
                    state.sort = sort;
                }
                slice(&state.posts, request.page, request.page_size)
            }
            _ => self.paginate(request.page, request.page_size),
        }
    }

    #[must_use]
    pub fn sort_state(&self) -> SortState {
        self.read().sort
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.read().posts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().posts.is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, EngineState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, EngineState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for QueryEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.read();
        f.debug_struct("QueryEngine")
            .field("posts", &state.posts.len())
            .field("sort", &state.sort)
            .finish()
    }
}

/// Value a post is compared on for a given key.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum SortValue {
    Number(i64),
    Text(String),
}

impl SortValue {
    fn of(post: &RawPost, key: SortKey) -> Self {
        match key {
            SortKey::Timestamp | SortKey::CreatedTime => Self::Number(post.relevant_timestamp()),
            SortKey::Title => Self::Text(post.title().unwrap_or_default().to_lowercase()),
            SortKey::Text => Self::Text(post.text().to_lowercase()),
        }
    }
}

fn sort_posts(posts: &mut Vec<RawPost>, sort: SortState) {
    let mut keyed: Vec<(SortValue, RawPost)> = posts
        .drain(..)
        .map(|post| (SortValue::of(&post, sort.key), post))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| sort.order.apply(a.cmp(b)));
    posts.extend(keyed.into_iter().map(|(_, post)| post));

    debug!(key = %sort.key, order = %sort.order, count = posts.len(), "Sorted posts");
}

fn slice(posts: &[RawPost], page: f64, page_size: f64) -> Page<FormattedPost> {
    let page = resolve_page(page);
    let page_size = resolve_page_size(page_size);
    let total = posts.len();

    let start = (page - 1)
        .checked_mul(page_size)
        .map_or(total, |start| start.min(total));
    let end = start.saturating_add(page_size).min(total);

    Page {
        page,
        page_size,
        total,
        items: posts[start..end].iter().map(RawPost::formatted).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn post(title: &str, timestamp: i64) -> RawPost {
        RawPost::from_value(json!({"title": title, "timestamp": timestamp}))
    }

    fn titles(page: &Page<FormattedPost>) -> Vec<String> {
        page.items.iter().map(|p| p.text.clone()).collect()
    }

    #[test]
    fn test_resolve_page() {
        assert_eq!(resolve_page(0.0), 1);
        assert_eq!(resolve_page(-3.0), 1);
        assert_eq!(resolve_page(2.9), 2);
        assert_eq!(resolve_page(f64::NAN), 1);
        assert_eq!(resolve_page(f64::INFINITY), 1);
    }

    #[test]
    fn test_resolve_page_size() {
        assert_eq!(resolve_page_size(-5.0), 20);
        assert_eq!(resolve_page_size(0.0), 20);
        assert_eq!(resolve_page_size(0.5), 1);
        assert_eq!(resolve_page_size(10.7), 10);
        assert_eq!(resolve_page_size(f64::NAN), 20);
    }

    #[test]
    fn test_sort_key_parse() {
        assert_eq!(SortKey::parse("created_time"), Some(SortKey::CreatedTime));
        assert_eq!(SortKey::parse(" Title "), Some(SortKey::Title));
        assert_eq!(SortKey::parse("bogus"), None);
        assert_eq!("bogus".parse::<SortKey>().unwrap(), SortKey::Text);
        assert_eq!("DESC".parse::<SortOrder>().unwrap(), SortOrder::Desc);
        assert_eq!("sideways".parse::<SortOrder>().unwrap(), SortOrder::Asc);
    }

    #[test]
    fn test_page_request_parse() {
        let request = PageRequest::parse(Some("3"), Some("abc"));
        assert!((request.page - 3.0).abs() < f64::EPSILON);
        assert!(request.page_size.is_nan());

        let defaults = PageRequest::parse(None, None);
        assert!((defaults.page - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_timestamp_sort_both_directions() {
        let engine = QueryEngine::new(
            vec![post("b", 2), post("c", 3), post("a", 1)],
            SortState::new(SortKey::Timestamp, SortOrder::Asc),
        );
        assert_eq!(titles(&engine.paginate(1.0, 10.0)), ["a", "b", "c"]);

        engine.set_sort(SortKey::CreatedTime, SortOrder::Desc);
        assert_eq!(titles(&engine.paginate(1.0, 10.0)), ["c", "b", "a"]);
    }

    #[test]
    fn test_text_sort_is_case_insensitive() {
        let engine = QueryEngine::new(
            vec![post("banana", 0), post("Apple", 0), post("cherry", 0)],
            SortState::new(SortKey::Text, SortOrder::Asc),
        );
        assert_eq!(
            titles(&engine.paginate(1.0, 10.0)),
            ["Apple", "banana", "cherry"]
        );
    }

    #[test]
    fn test_ties_keep_stable_order() {
        let engine = QueryEngine::new(
            vec![post("first", 5), post("second", 5), post("third", 5)],
            SortState::new(SortKey::Timestamp, SortOrder::Desc),
        );
        assert_eq!(
            titles(&engine.paginate(1.0, 10.0)),
            ["first", "second", "third"]
        );
    }

    #[test]
    fn test_query_applies_sort_before_slicing() {
        let posts = (1..=5).map(|i| post(&format!("p{i}"), i)).collect();
        let engine = QueryEngine::new(posts, SortState::default());

        let request =
            PageRequest::new(1.0, 2.0).with_sort(SortKey::Timestamp, SortOrder::Desc);
        let page = engine.query(&request);
        assert_eq!(titles(&page), ["p5", "p4"]);
        assert_eq!(
            engine.sort_state(),
            SortState::new(SortKey::Timestamp, SortOrder::Desc)
        );
    }

    #[test]
    fn test_huge_page_is_empty() {
        let engine = QueryEngine::new(vec![post("a", 1)], SortState::default());
        let page = engine.paginate(1e300, 1e300);
        assert!(page.items.is_empty());
        assert_eq!(page.total, 1);
    }

    #[test]
    fn test_page_navigation() {
        let page: Page<()> = Page {
            page: 2,
            page_size: 10,
            total: 25,
            items: vec![],
        };
        assert_eq!(page.total_pages(), 3);
        assert!(page.has_next());
        assert!(page.has_prev());
    }
}
