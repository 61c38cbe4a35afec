//! Faceted catalog filter.
//!
//! Loads a validated catalog (or content items from stdin), toggles the
//! requested filter values, and prints the visible items in catalog order as
//! NDJSON, or one summary line per item with `--summary`. Passing the same
//! value twice deselects it again, exactly like clicking a checkbox twice.

use anyhow::{Context, Result, anyhow, bail};
use edurobolab::{
    CatalogIndex, ContentId, ContentStore, FilterDimension, FilterState, FilterValue,
    default_catalog_path, filter, find_data_root, logging, parse_content_stream, split_list,
};
use std::env;
use std::ffi::OsString;
use std::io::{self, Read, Write};
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
    let store = load_store(&args.source)?;

    let mut stdout = io::stdout().lock();
    if let Some(id) = &args.show_id {
        let item = store
            .get(id)
            .ok_or_else(|| anyhow!("content not found: {id}"))?;
        writeln!(stdout, "{}", serde_json::to_string_pretty(item)?)?;
        return Ok(());
    }

    let mut filters = FilterState::new();
    for value in args.toggles {
        filters.toggle(value);
    }

    let visible = filter::apply(store.items(), &filters);
    tracing::info!(
        filters = %filters,
        total = store.len(),
        visible = visible.len(),
        "catalog filtered"
    );

    if visible.is_empty() {
        eprintln!("no content matches the selected filters");
        return Ok(());
    }

    for item in visible {
        if args.summary {
            writeln!(stdout, "{}", item.summary_line())?;
        } else {
            writeln!(stdout, "{}", serde_json::to_string(item)?)?;
        }
    }
    Ok(())
}

fn load_store(source: &InputSource) -> Result<ContentStore> {
    match source {
        InputSource::Catalog(path) => {
            let path = match path {
                Some(path) => path.clone(),
                None => default_catalog_path(&find_data_root()?),
            };
            Ok(CatalogIndex::load(&path)?.into_store())
        }
        InputSource::Stdin => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("reading stdin")?;
            Ok(ContentStore::new(parse_content_stream(&buf)?))
        }
    }
}

enum InputSource {
    Catalog(Option<PathBuf>),
    Stdin,
}

struct CliArgs {
    source: InputSource,
    toggles: Vec<FilterValue>,
    summary: bool,
    show_id: Option<ContentId>,
}

impl CliArgs {
    fn parse() -> Result<Self> {
        let mut args = env::args_os().skip(1);
        let mut catalog: Option<PathBuf> = None;
        let mut stdin = false;
        let mut toggles = Vec::new();
        let mut summary = false;
        let mut show_id = None;

        while let Some(arg_os) = args.next() {
            let arg = arg_os
                .into_string()
                .map_err(|_| anyhow!("argument is not valid UTF-8"))?;
            match arg.as_str() {
                "--catalog" => {
                    catalog = Some(PathBuf::from(next_value(&mut args, "--catalog")?));
                }
                "--stdin" => stdin = true,
                "--stage" | "--grade" | "--subject" | "--category" | "--skill" => {
                    let dimension: FilterDimension = arg[2..].parse()?;
                    let raw = next_value(&mut args, &arg)?;
                    push_values(&mut toggles, dimension, &raw)?;
                }
                "--filter" => {
                    let raw = next_value(&mut args, "--filter")?;
                    let (dimension, values) = raw
                        .split_once('=')
                        .ok_or_else(|| anyhow!("--filter expects dimension=value, got {raw}"))?;
                    push_values(&mut toggles, dimension.trim().parse()?, values)?;
                }
                "--summary" => summary = true,
                "--id" => show_id = Some(ContentId(next_value(&mut args, "--id")?)),
                "--help" | "-h" => {
                    print!("{}", usage());
                    std::process::exit(0);
                }
                other => bail!("unknown flag: {other}\n{}", usage()),
            }
        }

        if stdin && catalog.is_some() {
            bail!("--catalog and --stdin are mutually exclusive");
        }
        let source = if stdin {
            InputSource::Stdin
        } else {
            InputSource::Catalog(catalog)
        };

        Ok(Self {
            source,
            toggles,
            summary,
            show_id,
        })
    }
}

fn push_values(out: &mut Vec<FilterValue>, dimension: FilterDimension, raw: &str) -> Result<()> {
    let values = split_list(raw);
    if values.is_empty() {
        bail!("no value given for {dimension}");
    }
    for value in values {
        out.push(FilterValue::parse(dimension, &value)?);
    }
    Ok(())
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
    "Usage: catalog-filter [--catalog PATH | --stdin] [--stage V] [--grade V] [--subject V] [--category V] [--skill CODE] [--filter DIM=V] [--summary] [--id ID]\n\
Values may be comma-separated; each value toggles its selection. Dimensions: stage, grade, subject, category, curricularSkill.\n"
}
