//! Session-owned store of content items.
//!
//! The store is the only owner of `ContentItem` values; filters and reports
//! borrow from it. Every mutation takes a fresh `revision` stamp so memoized
//! views can tell when their cached result went stale.

use crate::catalog::identity::ContentId;
use crate::catalog::model::{AiIndexing, ContentItem};
use crate::enrichment::Enricher;
use anyhow::{Context, Result, bail};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

// Stamps are unique across every store in the process, so a stamp names one
// content state even when views are pointed at a different store.
fn next_revision() -> u64 {
    static NEXT: AtomicU64 = AtomicU64::new(1);
    NEXT.fetch_add(1, Ordering::Relaxed)
}

#[derive(Debug, Default, Clone)]
/// In-memory content list with id lookup, kept in insertion order.
pub struct ContentStore {
    items: Vec<ContentItem>,
    by_id: HashMap<ContentId, usize>,
    revision: u64,
}

impl ContentStore {
    /// Build a store from items in catalog order.
    ///
    /// A repeated id replaces the earlier entry in place, matching `insert`.
    pub fn new(items: impl IntoIterator<Item = ContentItem>) -> Self {
        let mut store = Self::default();
        for item in items {
            store.insert(item);
        }
        store
    }

    /// Add an item, or replace the entry with the same id without moving it.
    pub fn insert(&mut self, item: ContentItem) {
        match self.by_id.get(&item.id) {
            Some(&pos) => self.items[pos] = item,
            None => {
                self.by_id.insert(item.id.clone(), self.items.len());
                self.items.push(item);
            }
        }
        self.revision = next_revision();
    }

    /// Fetch an item by id, if present.
    pub fn get(&self, id: &ContentId) -> Option<&ContentItem> {
        self.by_id.get(id).map(|&pos| &self.items[pos])
    }

    pub fn contains(&self, id: &ContentId) -> bool {
        self.by_id.contains_key(id)
    }

    /// Items in catalog order.
    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Stamp of the current content state; changes on every mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replace the enrichment annotations of one item.
    pub fn annotate(&mut self, id: &ContentId, indexing: AiIndexing) -> Result<()> {
        let Some(&pos) = self.by_id.get(id) else {
            bail!("cannot annotate unknown content {id}");
        };
        self.items[pos].ai_indexing = indexing;
        self.revision = next_revision();
        Ok(())
    }

    /// Run `enricher` over every item and store the returned annotations.
    ///
    /// Stops at the first failure; items processed before it keep their new
    /// annotations.
    pub fn enrich_all(&mut self, enricher: &dyn Enricher) -> Result<usize> {
        let mut updated = 0;
        for pos in 0..self.items.len() {
            let indexing = enricher
                .enrich(&self.items[pos])
                .with_context(|| format!("enriching content {}", self.items[pos].id))?;
            if self.items[pos].ai_indexing != indexing {
                self.items[pos].ai_indexing = indexing;
                self.revision = next_revision();
                updated += 1;
            }
        }
        tracing::debug!(updated, total = self.items.len(), "enrichment pass finished");
        Ok(updated)
    }
}
