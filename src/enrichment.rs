//! Content annotation services.
//!
//! An `Enricher` produces the `AiIndexing` bundle attached to a content item.
//! Real deployments back it with an external model; `RegistryEnricher`
//! derives the annotations deterministically from the item and the skill
//! registry so the rest of the system can run without one.

use crate::catalog::{AiIndexing, ContentItem, SkillCode, Stage};
use crate::skills::SkillRegistry;
use anyhow::Result;
use std::collections::{BTreeSet, HashSet};

/// External annotation service.
pub trait Enricher {
    fn enrich(&self, item: &ContentItem) -> Result<AiIndexing>;
}

/// Derives annotations from item metadata and the skill registry.
pub struct RegistryEnricher<'a> {
    registry: &'a SkillRegistry,
}

impl<'a> RegistryEnricher<'a> {
    pub fn new(registry: &'a SkillRegistry) -> Self {
        Self { registry }
    }

    /// Registry codes that fit the item's stage and grades.
    ///
    /// Lower-secondary codes carry their grade in the prefix and must match
    /// one of the item's grades; upper-secondary codes span the whole stage.
    fn suggested_codes(&self, item: &ContentItem) -> BTreeSet<SkillCode> {
        let mut codes: BTreeSet<SkillCode> = item.curricular_skill_codes.clone();
        for entry in self.registry.for_stage(item.stage) {
            let fits = match item.stage {
                Stage::LowerSecondary => entry
                    .code
                    .grade_hint()
                    .is_some_and(|grade| item.grades.contains(&grade)),
                Stage::UpperSecondary => !item.grades.is_empty(),
            };
            if fits {
                codes.insert(entry.code.clone());
            }
        }
        codes
    }
}

impl Enricher for RegistryEnricher<'_> {
    fn enrich(&self, item: &ContentItem) -> Result<AiIndexing> {
        let topics = item
            .categories
            .iter()
            .map(|category| category.as_str().to_string())
            .collect();

        let mut seen = HashSet::new();
        let key_terms = item
            .keywords
            .iter()
            .map(|keyword| keyword.trim())
            .filter(|keyword| !keyword.is_empty() && seen.insert(keyword.to_lowercase()))
            .map(str::to_string)
            .collect();

        Ok(AiIndexing {
            topics,
            suggested_skill_codes: self.suggested_codes(item).into_iter().collect(),
            key_terms,
        })
    }
}

/// Returns the same annotations for every item.
pub struct StaticEnricher(pub AiIndexing);

impl Enricher for StaticEnricher {
    fn enrich(&self, _item: &ContentItem) -> Result<AiIndexing> {
        Ok(self.0.clone())
    }
}
