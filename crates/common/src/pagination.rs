//! Cursor-based keyset pagination
//!
//! A listing is a scan over a filtered collection ordered by one sort field
//! with a tie-break on a unique immutable value, which makes the order total.
//! Pages resume strictly after the boundary recorded in the client's cursor,
//! so page N's last item and page N+1's first item are always adjacent.
//!
//! Stores fetch `limit + 1` rows in scan order; the extra row only tells
//! [`Paginator::finish`] whether another page exists.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::cursor::{Boundary, Cursor, CursorCodec, CursorValue, Traversal};
use crate::sort::{SortDirection, SortDirective, SortField};
use crate::{Error, Result};

/// Default page size for list operations
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Maximum page size for list operations
pub const MAX_PAGE_SIZE: usize = 100;

/// Pagination parameters for list operations
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub size: Option<i64>,
    #[serde(default)]
    pub cursor: Option<String>,
    #[serde(default)]
    pub direction: Option<Traversal>,
    #[serde(default)]
    pub total_count: Option<bool>,
}

impl Pagination {
    /// Get the page size, defaulting to `default`, clamped to 1..=100
    pub fn size(&self, default: usize) -> usize {
        match self.size {
            Some(size) => size.clamp(1, MAX_PAGE_SIZE as i64) as usize,
            None => default.clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn wants_total_count(&self) -> bool {
        self.total_count.unwrap_or(false)
    }
}

/// An item that can be placed in a keyset-paginated listing
pub trait Paginated {
    type Field: SortField;

    /// Value of `field` for this item
    fn sort_value(&self, field: Self::Field) -> CursorValue;

    /// Unique immutable value that breaks ties on the sort field
    fn tie_breaker(&self) -> CursorValue;

    fn boundary(&self, field: Self::Field) -> Boundary {
        Boundary {
            value: self.sort_value(field),
            tie: self.tie_breaker(),
        }
    }
}

/// One page of a listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Present iff more items exist beyond this page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
    /// Size of the whole filtered collection, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u64>,
}

impl<T> Page<T> {
    pub fn with_total_count(mut self, total_count: u64) -> Self {
        self.total_count = Some(total_count);
        self
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            next_cursor: self.next_cursor,
            total_count: self.total_count,
        }
    }
}

/// Bounded slice of a sort order that a store must fetch
#[derive(Debug, Clone, PartialEq)]
pub struct Window<F> {
    pub directive: SortDirective<F>,
    pub traversal: Traversal,
    /// Resume strictly after this boundary (in scan order)
    pub after: Option<Boundary>,
    /// Page size; stores fetch one more row than this
    pub limit: usize,
}

impl<F: SortField> Window<F> {
    /// Direction the store must scan in
    pub fn scan_direction(&self) -> SortDirection {
        match self.traversal {
            Traversal::Forward => self.directive.direction,
            Traversal::Backward => self.directive.direction.reversed(),
        }
    }

    /// Number of rows a store should fetch
    pub fn fetch_limit(&self) -> usize {
        self.limit + 1
    }

    fn key_order(&self, value: &CursorValue, tie: &CursorValue, other: &Boundary) -> Ordering {
        let natural = value.cmp(&other.value).then_with(|| tie.cmp(&other.tie));
        match self.scan_direction() {
            SortDirection::Asc => natural,
            SortDirection::Desc => natural.reverse(),
        }
    }

    /// Whether `item` lies strictly past the window's boundary
    pub fn admits<T: Paginated<Field = F>>(&self, item: &T) -> bool {
        match &self.after {
            None => true,
            Some(after) => {
                let value = item.sort_value(self.directive.field);
                let tie = item.tie_breaker();
                self.key_order(&value, &tie, after) == Ordering::Greater
            }
        }
    }

    /// Select this window from a materialized collection, in scan order
    pub fn apply<T: Paginated<Field = F>>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        let field = self.directive.field;
        let mut keyed: Vec<(Boundary, T)> = items
            .into_iter()
            .filter(|item| self.admits(item))
            .map(|item| (item.boundary(field), item))
            .collect();

        keyed.sort_by(|(a, _), (b, _)| self.key_order(&a.value, &a.tie, b));
        keyed
            .into_iter()
            .take(self.fetch_limit())
            .map(|(_, item)| item)
            .collect()
    }
}

/// Turns pagination requests into windows and fetched rows into pages
#[derive(Debug, Clone)]
pub struct Paginator {
    codec: CursorCodec,
    default_size: usize,
}

impl Paginator {
    pub fn new(codec: CursorCodec, default_size: usize) -> Self {
        Self {
            codec,
            default_size,
        }
    }

    /// Build the window for a request. Fails with `InvalidCursor` when the
    /// cursor does not verify or was issued under a different sort.
    pub fn window<F: SortField>(
        &self,
        directive: SortDirective<F>,
        pagination: &Pagination,
    ) -> Result<Window<F>> {
        let limit = pagination.size(self.default_size);

        let Some(token) = pagination.cursor.as_deref() else {
            return Ok(Window {
                directive,
                traversal: pagination.direction.unwrap_or_default(),
                after: None,
                limit,
            });
        };

        let cursor = self.codec.decode(token)?;
        let expected = directive.key();
        if cursor.sort != expected {
            return Err(Error::InvalidCursor(format!(
                "cursor was issued for sort '{}', not '{}'",
                cursor.sort, expected
            )));
        }

        Ok(Window {
            directive,
            traversal: cursor.traversal,
            after: Some(cursor.boundary),
            limit,
        })
    }

    /// Cut fetched rows down to a page and issue the next cursor if needed
    pub fn finish<T: Paginated<Field = F>, F: SortField>(
        &self,
        window: &Window<F>,
        mut fetched: Vec<T>,
    ) -> Result<Page<T>> {
        if fetched.len() <= window.limit {
            return Ok(Page {
                items: fetched,
                next_cursor: None,
                total_count: None,
            });
        }

        fetched.truncate(window.limit);
        let next_cursor = match fetched.last() {
            Some(last) => Some(self.codec.encode(&Cursor {
                sort: window.directive.key(),
                traversal: window.traversal,
                boundary: last.boundary(window.directive.field),
            })?),
            None => None,
        };

        Ok(Page {
            items: fetched,
            next_cursor,
            total_count: None,
        })
    }

    /// Paginate a materialized, already filtered collection
    pub fn paginate<T: Paginated<Field = F>, F: SortField>(
        &self,
        items: impl IntoIterator<Item = T>,
        directive: SortDirective<F>,
        pagination: &Pagination,
    ) -> Result<Page<T>> {
        let window = self.window(directive, pagination)?;
        let fetched = window.apply(items);
        self.finish(&window, fetched)
    }
}
