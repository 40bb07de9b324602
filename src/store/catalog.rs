//! Static item catalog served by the paging endpoint.

use std::ops::Range;

use serde::Serialize;
use utoipa::ToSchema;

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CatalogItem {
    /// Item name.
    pub item_name: String,
}

/// Fixed, read-only list of items.
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    /// Create a catalog from item names.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            items: names
                .into_iter()
                .map(|name| CatalogItem {
                    item_name: name.into(),
                })
                .collect(),
        }
    }

    /// The sample catalog.
    pub fn sample() -> Self {
        Self::new(["Foo", "Bar", "Baz"])
    }

    /// Items from `skip` up to `skip + limit`.
    ///
    /// Bounds follow slice semantics with negative indices counted from the
    /// end; anything out of range is clamped rather than rejected.
    pub fn page(&self, skip: i64, limit: i64) -> &[CatalogItem] {
        &self.items[slice_bounds(self.items.len(), skip, skip.saturating_add(limit))]
    }
}

/// Resolve `[start:stop]` against a sequence of `len` elements.
pub fn slice_bounds(len: usize, start: i64, stop: i64) -> Range<usize> {
    let len_i = i64::try_from(len).unwrap_or(i64::MAX);
    let clamp = |index: i64| -> usize {
        let resolved = if index < 0 { index + len_i } else { index };
        // resolved is within 0..=len here, which always fits in usize
        resolved.clamp(0, len_i) as usize
    };
    let (start, stop) = (clamp(start), clamp(stop));
    if start >= stop {
        start..start
    } else {
        start..stop
    }
}
