//! Memoized filter results for a content store.

use crate::catalog::{ContentItem, ContentStore};
use crate::filter::evaluator;
use crate::filter::state::FilterState;

#[derive(Debug)]
struct CachedResult {
    revision: u64,
    filters: FilterState,
    positions: Vec<usize>,
}

/// Re-evaluates the catalog only when the store revision or the filter state
/// changed since the previous call.
#[derive(Debug, Default)]
pub struct FilterView {
    cached: Option<CachedResult>,
    hits: u64,
    misses: u64,
}

impl FilterView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Items of `store` visible under `filters`, in store order.
    pub fn visible<'a>(
        &mut self,
        store: &'a ContentStore,
        filters: &FilterState,
    ) -> Vec<&'a ContentItem> {
        let items = store.items();
        if let Some(cached) = &self.cached {
            if cached.revision == store.revision() && cached.filters == *filters {
                self.hits += 1;
                tracing::trace!(revision = cached.revision, "filter cache hit");
                return cached.positions.iter().map(|&pos| &items[pos]).collect();
            }
        }

        self.misses += 1;
        let positions: Vec<usize> = items
            .iter()
            .enumerate()
            .filter(|(_, item)| evaluator::matches(item, filters))
            .map(|(pos, _)| pos)
            .collect();
        let visible = positions.iter().map(|&pos| &items[pos]).collect();
        self.cached = Some(CachedResult {
            revision: store.revision(),
            filters: filters.clone(),
            positions,
        });
        visible
    }

    /// Drop the cached result.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    /// (hits, misses) since creation.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}
