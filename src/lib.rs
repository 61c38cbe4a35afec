//! Content catalog core for EduRoboLab.
//!
//! The crate exposes the typed content model (stages, grades, subjects and
//! the other fixed enumerations), the faceted filter used by the catalog
//! page, the curricular skill registry, and coverage reports. Public
//! functions here are what the command line tools rely on: data-root
//! discovery, default data paths, and parsing of content streams.

use anyhow::{Context, Result, anyhow, bail};
use serde_json::Value;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

pub mod catalog;
pub mod coverage;
pub mod enrichment;
pub mod filter;
pub mod logging;
pub mod schema_loader;
pub mod skills;

#[cfg(test)]
mod test_support;

pub use catalog::{
    AiIndexing, CatalogIndex, Category, ContentId, ContentItem, ContentStore, ContentType,
    EstimatedTime, Format, Grade, KnowledgeArea, LearningTrack, ParseError, SkillCode, Stage,
    Subject, TrackId, Visibility, load_catalog_from_path,
};
pub use coverage::{
    CoverageEntry, TrackCoverage, build_skill_coverage_map, grade_summary, track_coverage,
    unregistered_codes,
};
pub use enrichment::{Enricher, RegistryEnricher, StaticEnricher};
pub use filter::{FilterDimension, FilterState, FilterValue, FilterView, apply};
pub use skills::{SkillEntry, SkillRegistry};

const CATALOG_FILE: &str = "data/catalog.json";
const SKILLS_FILE: &str = "data/skills.json";
const SCHEMA_DIR: &str = "schema";

/// Returns true when `candidate` holds the catalog data and schema.
fn is_data_root(candidate: &Path) -> bool {
    candidate.join(CATALOG_FILE).is_file() && candidate.join(SCHEMA_DIR).is_dir()
}

/// Accept an explicit root hint only when it points at a real data root.
fn data_root_from_hint(hint: &str) -> Option<PathBuf> {
    if hint.is_empty() {
        return None;
    }
    let hint_path = PathBuf::from(hint);
    if !hint_path.exists() || !is_data_root(&hint_path) {
        return None;
    }
    fs::canonicalize(hint_path).ok()
}

fn search_upwards(start: &Path) -> Option<PathBuf> {
    let mut dir = fs::canonicalize(start).ok()?;
    loop {
        if is_data_root(&dir) {
            return Some(dir);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

/// Locate the directory holding `data/` and `schema/`.
///
/// Honors `EDUROBOLAB_ROOT` when it points at a real root, then climbs up
/// from the current executable, then uses the build-time hint.
pub fn find_data_root() -> Result<PathBuf> {
    if let Ok(env_root) = env::var("EDUROBOLAB_ROOT") {
        if let Some(root) = data_root_from_hint(&env_root) {
            return Ok(root);
        }
    }

    if let Ok(exe_path) = env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            if let Some(root) = search_upwards(exe_dir) {
                return Ok(root);
            }
        }
    }

    if let Some(hint) = option_env!("EDUROBOLAB_ROOT_HINT") {
        if let Some(root) = data_root_from_hint(hint) {
            return Ok(root);
        }
    }

    Err(missing_data_root())
}

fn missing_data_root() -> anyhow::Error {
    anyhow!(
        "Unable to locate the EduRoboLab data directory. Set EDUROBOLAB_ROOT to a directory containing {CATALOG_FILE} and a {SCHEMA_DIR}/ directory."
    )
}

pub fn default_catalog_path(root: &Path) -> PathBuf {
    root.join(CATALOG_FILE)
}

pub fn default_skills_path(root: &Path) -> PathBuf {
    root.join(SKILLS_FILE)
}

/// Split a comma-delimited option value into trimmed, non-empty tokens.
///
/// Whitespace is kept inside tokens because labels such as
/// `Língua Portuguesa` contain spaces.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Parse content items from a JSON array, a single object, or NDJSON.
///
/// Empty input is an error. NDJSON is parsed line by line so the failing
/// line can be reported.
pub fn parse_content_stream(input: &str) -> Result<Vec<ContentItem>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        bail!("No input provided on stdin");
    }

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return match value {
            Value::Array(items) => items
                .into_iter()
                .map(serde_json::from_value)
                .collect::<Result<Vec<_>, _>>()
                .context("Unable to parse JSON array of content items"),
            Value::Object(_) => serde_json::from_value(value)
                .map(|item| vec![item])
                .context("Unable to parse content item"),
            _ => bail!("Unsupported JSON input; expected object or array"),
        };
    }

    let mut items = Vec::new();
    for (idx, line) in trimmed.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let item: ContentItem = serde_json::from_str(line)
            .with_context(|| format!("Unable to parse content item from line {}", idx + 1))?;
        items.push(item);
    }

    if items.is_empty() {
        bail!("No content items found in input stream");
    }

    Ok(items)
}
