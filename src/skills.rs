//! Curricular skill registry.
//!
//! Supplies display metadata for the codes content items reference. The
//! filter core never consults it; reports and enrichment do.

use crate::catalog::{KnowledgeArea, SkillCode, Stage};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
/// One competency of the national curriculum.
pub struct SkillEntry {
    pub code: SkillCode,
    pub stage: Stage,
    pub area: KnowledgeArea,
    pub description: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RegistryFile {
    Wrapped { skills: Vec<SkillEntry> },
    Bare(Vec<SkillEntry>),
}

#[derive(Clone, Debug, Default)]
/// Skill entries keyed by code.
pub struct SkillRegistry {
    by_code: BTreeMap<SkillCode, SkillEntry>,
}

impl SkillRegistry {
    /// Read a registry file holding either `{"skills": [...]}` or a bare array.
    pub fn load(path: &Path) -> Result<Self> {
        let data =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let file: RegistryFile = serde_json::from_str(&data)
            .with_context(|| format!("parsing skill registry {}", path.display()))?;
        let entries = match file {
            RegistryFile::Wrapped { skills } => skills,
            RegistryFile::Bare(skills) => skills,
        };
        let registry = Self::from_entries(entries)
            .with_context(|| format!("validating skill registry {}", path.display()))?;
        tracing::debug!(path = %path.display(), skills = registry.len(), "skill registry loaded");
        Ok(registry)
    }

    /// Build a registry, rejecting empty or repeated codes.
    pub fn from_entries(entries: impl IntoIterator<Item = SkillEntry>) -> Result<Self> {
        let mut by_code = BTreeMap::new();
        for entry in entries {
            if entry.code.0.trim().is_empty() {
                bail!("skill registry contains an entry with no code");
            }
            if by_code.contains_key(&entry.code) {
                bail!("duplicate skill code {}", entry.code);
            }
            by_code.insert(entry.code.clone(), entry);
        }
        Ok(Self { by_code })
    }

    pub fn get(&self, code: &SkillCode) -> Option<&SkillEntry> {
        self.by_code.get(code)
    }

    pub fn contains(&self, code: &SkillCode) -> bool {
        self.by_code.contains_key(code)
    }

    /// Codes in sorted order.
    pub fn codes(&self) -> impl Iterator<Item = &SkillCode> {
        self.by_code.keys()
    }

    pub fn entries(&self) -> impl Iterator<Item = &SkillEntry> {
        self.by_code.values()
    }

    pub fn for_stage(&self, stage: Stage) -> impl Iterator<Item = &SkillEntry> {
        self.by_code.values().filter(move |entry| entry.stage == stage)
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}
