//! Coverage accounting between the skill registry, content, and tracks.
//!
//! Helpers here build the skill→content mapping and per-grade counts the
//! coverage dashboard shows, plus the target-skill coverage of a learning
//! track. Codes that content references but the registry lacks are reported
//! separately rather than rejected, since codes are opaque to the catalog.

use crate::catalog::{ContentItem, ContentStore, Grade, LearningTrack, SkillCode};
use crate::skills::SkillRegistry;
use anyhow::{Result, bail};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Whether a skill is addressed by any content plus the ids of that content.
pub struct CoverageEntry {
    pub has_content: bool,
    pub content_ids: Vec<String>,
}

/// Build a mapping of registry skill code to the content that references it.
///
/// Every registry code gets an entry; content ids are deduplicated and kept
/// sorted for deterministic output.
pub fn build_skill_coverage_map<'a>(
    registry: &SkillRegistry,
    items: impl IntoIterator<Item = &'a ContentItem>,
) -> BTreeMap<String, CoverageEntry> {
    let mut map: BTreeMap<String, CoverageEntry> = registry
        .codes()
        .map(|code| {
            (
                code.0.clone(),
                CoverageEntry {
                    has_content: false,
                    content_ids: Vec::new(),
                },
            )
        })
        .collect();

    for item in items {
        for code in &item.curricular_skill_codes {
            let Some(entry) = map.get_mut(&code.0) else {
                continue;
            };
            entry.has_content = true;
            if !entry.content_ids.contains(&item.id.0) {
                entry.content_ids.push(item.id.0.clone());
                entry.content_ids.sort();
            }
        }
    }

    map
}

/// Codes referenced by content that the registry does not define.
pub fn unregistered_codes<'a>(
    registry: &SkillRegistry,
    items: impl IntoIterator<Item = &'a ContentItem>,
) -> BTreeSet<SkillCode> {
    items
        .into_iter()
        .flat_map(|item| item.curricular_skill_codes.iter())
        .filter(|code| !registry.contains(code))
        .cloned()
        .collect()
}

/// Number of content items targeting each grade; grades with none report 0.
pub fn grade_summary<'a>(
    items: impl IntoIterator<Item = &'a ContentItem>,
) -> BTreeMap<Grade, usize> {
    let mut summary: BTreeMap<Grade, usize> =
        Grade::ALL.iter().map(|grade| (*grade, 0)).collect();
    for item in items {
        for grade in &item.grades {
            *summary.entry(*grade).or_default() += 1;
        }
    }
    summary
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Target skills of a track split by whether its content addresses them.
pub struct TrackCoverage {
    pub track_id: String,
    pub covered: Vec<SkillCode>,
    pub missing: Vec<SkillCode>,
}

impl TrackCoverage {
    /// Share of target skills covered, in `[0, 1]`; a track with no targets is fully covered.
    pub fn ratio(&self) -> f64 {
        let total = self.covered.len() + self.missing.len();
        if total == 0 {
            return 1.0;
        }
        self.covered.len() as f64 / total as f64
    }
}

/// Compare a track's target skills with the codes its content carries.
///
/// Fails when the track references content the store does not hold.
pub fn track_coverage(track: &LearningTrack, store: &ContentStore) -> Result<TrackCoverage> {
    let mut addressed: BTreeSet<&SkillCode> = BTreeSet::new();
    for entry in track.ordered_items() {
        let Some(item) = store.get(&entry.content_id) else {
            bail!(
                "track {} references unknown content {}",
                track.id,
                entry.content_id
            );
        };
        addressed.extend(item.curricular_skill_codes.iter());
    }

    let (covered, missing): (Vec<SkillCode>, Vec<SkillCode>) = track
        .target_skill_codes
        .iter()
        .cloned()
        .partition(|code| addressed.contains(code));

    Ok(TrackCoverage {
        track_id: track.id.0.clone(),
        covered,
        missing,
    })
}
