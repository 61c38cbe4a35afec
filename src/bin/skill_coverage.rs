//! Curricular skill coverage report.
//!
//! Maps every registry skill to the catalog content that references it,
//! lists codes the registry does not know, and optionally adds per-grade
//! content counts and the target coverage of one learning track. Output is a
//! single pretty-printed JSON object on stdout.

use anyhow::{Result, anyhow, bail};
use edurobolab::{
    CatalogIndex, SkillRegistry, TrackId, build_skill_coverage_map, default_catalog_path,
    default_skills_path, find_data_root, grade_summary, logging, track_coverage,
    unregistered_codes,
};
use serde_json::{Map, Value, json};
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

fn main() {
    logging::init();
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = CliArgs::parse()?;
    let (catalog_path, skills_path) = match (args.catalog, args.skills) {
        (Some(catalog), Some(skills)) => (catalog, skills),
        (catalog, skills) => {
            let root = find_data_root()?;
            (
                catalog.unwrap_or_else(|| default_catalog_path(&root)),
                skills.unwrap_or_else(|| default_skills_path(&root)),
            )
        }
    };

    let index = CatalogIndex::load(&catalog_path)?;
    let registry = SkillRegistry::load(&skills_path)?;
    let catalog_key = index.metadata().key.clone();
    let (store, tracks) = index.into_parts();

    let mut report = Map::new();
    report.insert("catalog".to_string(), Value::String(catalog_key));
    report.insert(
        "skills".to_string(),
        serde_json::to_value(build_skill_coverage_map(&registry, store.items()))?,
    );
    let unknown: Vec<String> = unregistered_codes(&registry, store.items())
        .into_iter()
        .map(|code| code.0)
        .collect();
    if !unknown.is_empty() {
        tracing::warn!(count = unknown.len(), "content references unregistered skill codes");
    }
    report.insert("unregistered".to_string(), json!(unknown));

    if args.by_grade {
        let grades: Map<String, Value> = grade_summary(store.items())
            .into_iter()
            .map(|(grade, count)| (grade.as_str().to_string(), json!(count)))
            .collect();
        report.insert("grades".to_string(), Value::Object(grades));
    }

    if let Some(track_id) = &args.track {
        let track = tracks
            .iter()
            .find(|track| &track.id == track_id)
            .ok_or_else(|| anyhow!("track not found: {track_id}"))?;
        let coverage = track_coverage(track, &store)?;
        let mut value = serde_json::to_value(&coverage)?;
        value["ratio"] = json!(coverage.ratio());
        report.insert("track".to_string(), value);
    }

    println!("{}", serde_json::to_string_pretty(&Value::Object(report))?);
    Ok(())
}

struct CliArgs {
    catalog: Option<PathBuf>,
    skills: Option<PathBuf>,
    by_grade: bool,
    track: Option<TrackId>,
}

impl CliArgs {
    fn parse() -> Result<Self> {
        let mut args = env::args_os().skip(1);
        let mut parsed = CliArgs {
            catalog: None,
            skills: None,
            by_grade: false,
            track: None,
        };

        while let Some(arg_os) = args.next() {
            let arg = arg_os
                .into_string()
                .map_err(|_| anyhow!("argument is not valid UTF-8"))?;
            match arg.as_str() {
                "--catalog" => {
                    parsed.catalog = Some(PathBuf::from(next_value(&mut args, "--catalog")?))
                }
                "--skills" => {
                    parsed.skills = Some(PathBuf::from(next_value(&mut args, "--skills")?))
                }
                "--by-grade" => parsed.by_grade = true,
                "--track" => parsed.track = Some(TrackId(next_value(&mut args, "--track")?)),
                "--help" | "-h" => {
                    print!("{}", usage());
                    std::process::exit(0);
                }
                other => bail!("unknown flag: {other}\n{}", usage()),
            }
        }
        Ok(parsed)
    }
}

fn next_value(args: &mut impl Iterator<Item = OsString>, flag: &str) -> Result<String> {
    args.next()
        .map(|os| {
            os.into_string()
                .map_err(|_| anyhow!("value for {flag} is not valid UTF-8"))
        })
        .transpose()?
        .ok_or_else(|| anyhow!("missing value for {flag}"))
}

fn usage() -> &'static str {
    "Usage: skill-coverage [--catalog PATH] [--skills PATH] [--by-grade] [--track ID]\n\
Prints registry skill coverage for the catalog as JSON. Paths default to the data directory found via EDUROBOLAB_ROOT.\n"
}
