//! Deserializable representation of a content catalog file.
//!
//! The types mirror `schema/content_catalog.schema.json` so loaders, the
//! filter evaluator, and reports share one view of content metadata. Use
//! `CatalogIndex` to load a validated catalog; `load_catalog_from_path` only
//! parses.

use crate::catalog::identity::{
    Category, ContentId, ContentType, EstimatedTime, Format, Grade, SkillCode, Stage, Subject,
    TrackId, Visibility,
};
use anyhow::{Result, anyhow, bail};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Deserialize, Serialize)]
/// Full catalog as stored on disk.
pub struct ContentCatalog {
    pub schema_version: String,
    pub catalog: CatalogMetadata,
    pub items: Vec<ContentItem>,
    #[serde(default)]
    pub tracks: Vec<LearningTrack>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
/// Identifying metadata for a catalog snapshot.
pub struct CatalogMetadata {
    pub key: String,
    pub title: String,
}

/// One lesson plan or project in the catalog.
///
/// Set-valued fields default to empty when absent so partially specified
/// items still load; the filter evaluator excludes them from any active
/// dimension whose field is empty.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ContentItem {
    pub id: ContentId,
    pub title: String,
    pub stage: Stage,
    #[serde(default)]
    pub grades: BTreeSet<Grade>,
    #[serde(default)]
    pub subjects: BTreeSet<Subject>,
    #[serde(default)]
    pub categories: BTreeSet<Category>,
    pub content_type: ContentType,
    #[serde(default)]
    pub formats: BTreeSet<Format>,
    pub estimated_time: EstimatedTime,
    #[serde(default)]
    pub curricular_skill_codes: BTreeSet<SkillCode>,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub file_ids: Vec<String>,
    #[serde(default)]
    pub ai_indexing: AiIndexing,
    pub visibility: Visibility,
    pub author: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Annotations produced by an external enrichment service.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct AiIndexing {
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub suggested_skill_codes: Vec<SkillCode>,
    #[serde(default)]
    pub key_terms: Vec<String>,
}

/// Ordered sequence of catalog entries forming a learning path.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct LearningTrack {
    pub id: TrackId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub stage: Stage,
    #[serde(default)]
    pub grades: BTreeSet<Grade>,
    #[serde(default)]
    pub subjects: BTreeSet<Subject>,
    #[serde(default)]
    pub items: Vec<TrackItem>,
    #[serde(default)]
    pub target_skill_codes: BTreeSet<SkillCode>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct TrackItem {
    pub content_id: ContentId,
    pub order: u32,
}

impl ContentItem {
    /// Check the invariants a catalog entry must satisfy before it is indexed.
    ///
    /// Grades must be non-empty and permitted for the item's stage; at least
    /// one subject is required. Skill codes are opaque and not checked.
    pub fn validate(&self) -> Result<()> {
        if self.id.0.trim().is_empty() {
            bail!("encountered content item with no id");
        }
        if self.title.trim().is_empty() {
            bail!("content {} has an empty title", self.id);
        }
        if self.grades.is_empty() {
            bail!("content {} lists no grades", self.id);
        }
        if self.subjects.is_empty() {
            bail!("content {} lists no subjects", self.id);
        }
        check_grades(&self.grades, self.stage).map_err(|grade| {
            anyhow!(
                "content {} lists grade {grade} outside stage {}",
                self.id,
                self.stage
            )
        })?;
        Ok(())
    }

    /// One-line rendering used by listings.
    pub fn summary_line(&self) -> String {
        format!(
            "{} | {} | {} / {} | {} | {}",
            self.id,
            self.title,
            self.stage,
            join_labels(self.grades.iter().map(|g| g.as_str())),
            join_labels(self.subjects.iter().map(|s| s.as_str())),
            self.estimated_time
        )
    }
}

impl LearningTrack {
    /// Track items sorted by their declared position.
    pub fn ordered_items(&self) -> Vec<&TrackItem> {
        let mut items: Vec<&TrackItem> = self.items.iter().collect();
        items.sort_by_key(|item| item.order);
        items
    }

    /// Structural checks that do not need the rest of the catalog.
    pub fn validate(&self) -> Result<()> {
        if self.id.0.trim().is_empty() {
            bail!("encountered learning track with no id");
        }
        check_grades(&self.grades, self.stage).map_err(|grade| {
            anyhow!(
                "track {} lists grade {grade} outside stage {}",
                self.id,
                self.stage
            )
        })?;
        let mut seen = HashSet::new();
        for item in &self.items {
            if !seen.insert(item.order) {
                bail!("track {} repeats order {}", self.id, item.order);
            }
        }
        Ok(())
    }
}

fn check_grades(grades: &BTreeSet<Grade>, stage: Stage) -> std::result::Result<(), Grade> {
    match grades.iter().find(|grade| !stage.allows(**grade)) {
        Some(grade) => Err(*grade),
        None => Ok(()),
    }
}

fn join_labels<'a>(labels: impl Iterator<Item = &'a str>) -> String {
    labels.collect::<Vec<_>>().join(", ")
}

/// Read and parse a content catalog from disk without additional validation.
pub fn load_catalog_from_path(path: &Path) -> Result<ContentCatalog> {
    let data = fs::read_to_string(path)?;
    let catalog: ContentCatalog = serde_json::from_str(&data)?;
    Ok(catalog)
}
