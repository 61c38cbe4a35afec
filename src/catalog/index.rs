//! Indexed view of a content catalog file.
//!
//! The index validates a catalog against its JSON Schema and the semantic
//! rules the schema cannot express (unique ids, grades permitted for the
//! stage, tracks pointing at real content), then offers lookup by id. It is
//! strict so tools never filter over a half-valid catalog.

use crate::catalog::load_catalog_from_path;
use crate::catalog::{
    CatalogMetadata, ContentCatalog, ContentId, ContentItem, ContentStore, LearningTrack, TrackId,
};
use crate::schema_loader::{is_valid_version_token, load_json_schema};
use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

pub const CATALOG_SCHEMA_VERSION: &str = "edurobolab_catalog_v1";
pub const CATALOG_SCHEMA_RELATIVE_PATH: &str = "schema/content_catalog.schema.json";

#[derive(Debug)]
/// Content catalog plus position indexes keyed by item and track id.
pub struct CatalogIndex {
    catalog: ContentCatalog,
    item_pos: BTreeMap<ContentId, usize>,
    track_pos: BTreeMap<TrackId, usize>,
}

impl CatalogIndex {
    /// Load and validate the catalog from disk.
    pub fn load(path: &Path) -> Result<Self> {
        validate_against_schema(path)?;

        let catalog =
            load_catalog_from_path(path).with_context(|| format!("loading {}", path.display()))?;
        let index = Self::from_catalog(catalog)
            .with_context(|| format!("validating {}", path.display()))?;
        tracing::info!(
            path = %path.display(),
            items = index.catalog.items.len(),
            tracks = index.catalog.tracks.len(),
            "catalog loaded"
        );
        Ok(index)
    }

    /// Validate an already parsed catalog and build the id indexes.
    pub fn from_catalog(catalog: ContentCatalog) -> Result<Self> {
        validate_schema_version(&catalog.schema_version)?;
        validate_catalog_metadata(&catalog.catalog)?;
        let item_pos = build_item_index(&catalog.items)?;
        let track_pos = build_track_index(&catalog.tracks, &item_pos)?;
        Ok(Self {
            catalog,
            item_pos,
            track_pos,
        })
    }

    /// The catalog metadata declared in the loaded file.
    pub fn metadata(&self) -> &CatalogMetadata {
        &self.catalog.catalog
    }

    /// Resolve a content item by id.
    ///
    /// Returns `None` instead of erroring; callers report the missing id with
    /// their own context.
    pub fn item(&self, id: &ContentId) -> Option<&ContentItem> {
        self.item_pos.get(id).map(|&pos| &self.catalog.items[pos])
    }

    pub fn track(&self, id: &TrackId) -> Option<&LearningTrack> {
        self.track_pos.get(id).map(|&pos| &self.catalog.tracks[pos])
    }

    /// Iterates content ids in stable order.
    pub fn ids(&self) -> impl Iterator<Item = &ContentId> {
        self.item_pos.keys()
    }

    /// Access the underlying catalog.
    pub fn catalog(&self) -> &ContentCatalog {
        &self.catalog
    }

    /// Hand the items over to a session store, keeping catalog order.
    pub fn into_store(self) -> ContentStore {
        ContentStore::new(self.catalog.items)
    }

    /// Split into the item store and the learning tracks.
    pub fn into_parts(self) -> (ContentStore, Vec<LearningTrack>) {
        (ContentStore::new(self.catalog.items), self.catalog.tracks)
    }
}

fn validate_schema_version(schema_version: &str) -> Result<()> {
    if schema_version.is_empty() {
        bail!("schema_version must not be empty");
    }
    if !is_valid_version_token(schema_version) {
        bail!(
            "schema_version must match ^[A-Za-z0-9_.-]+$, got {}",
            schema_version
        );
    }
    let allowed = allowed_schema_versions();
    if !allowed.contains(schema_version) {
        bail!(
            "schema_version '{}' not in allowed set {:?}",
            schema_version,
            allowed
        );
    }
    Ok(())
}

fn allowed_schema_versions() -> BTreeSet<String> {
    BTreeSet::from_iter([CATALOG_SCHEMA_VERSION.to_string()])
}

fn validate_catalog_metadata(meta: &CatalogMetadata) -> Result<()> {
    if !is_valid_version_token(&meta.key) {
        bail!("catalog.key must match ^[A-Za-z0-9_.-]+$, got {}", meta.key);
    }
    if meta.title.trim().is_empty() {
        bail!("catalog.title must not be empty");
    }
    Ok(())
}

fn build_item_index(items: &[ContentItem]) -> Result<BTreeMap<ContentId, usize>> {
    let mut map = BTreeMap::new();
    for (pos, item) in items.iter().enumerate() {
        item.validate()?;
        if map.insert(item.id.clone(), pos).is_some() {
            bail!("duplicate content id {}", item.id);
        }
    }
    Ok(map)
}

fn build_track_index(
    tracks: &[LearningTrack],
    items: &BTreeMap<ContentId, usize>,
) -> Result<BTreeMap<TrackId, usize>> {
    let mut map = BTreeMap::new();
    for (pos, track) in tracks.iter().enumerate() {
        track.validate()?;
        for entry in &track.items {
            if !items.contains_key(&entry.content_id) {
                bail!(
                    "track {} references unknown content {}",
                    track.id,
                    entry.content_id
                );
            }
        }
        if map.insert(track.id.clone(), pos).is_some() {
            bail!("duplicate track id {}", track.id);
        }
    }
    Ok(map)
}

fn validate_against_schema(catalog_path: &Path) -> Result<()> {
    let catalog_file = File::open(catalog_path)
        .with_context(|| format!("opening catalog {}", catalog_path.display()))?;
    let catalog_value: Value = serde_json::from_reader(BufReader::new(catalog_file))
        .with_context(|| format!("parsing catalog {}", catalog_path.display()))?;

    let schema_path = resolve_catalog_schema_path(catalog_path);
    let allowed = allowed_schema_versions();
    let schema = load_json_schema(&schema_path, Some(&allowed))
        .with_context(|| format!("loading catalog schema {}", schema_path.display()))?;

    schema.validate(&catalog_value).with_context(|| {
        format!(
            "content catalog {} failed schema validation",
            catalog_path.display()
        )
    })
}

/// Prefer the schema shipped next to the catalog's data directory, falling
/// back to the one in this crate.
fn resolve_catalog_schema_path(catalog_path: &Path) -> PathBuf {
    if let Some(base) = catalog_path.parent().and_then(|p| p.parent()) {
        let candidate = base.join(CATALOG_SCHEMA_RELATIVE_PATH);
        if candidate.exists() {
            return candidate;
        }
    }

    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(CATALOG_SCHEMA_RELATIVE_PATH)
}
