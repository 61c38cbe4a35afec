//! JSON Schema loading for catalog files.
//!
//! Schemas declare their version as a `const` under
//! `/properties/schema_version/const`. The loader extracts that version,
//! optionally checks it against an allow list, and compiles the schema once
//! so callers can validate any number of documents.

use anyhow::{Context, Result, anyhow, bail};
use jsonschema::JSONSchema;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub const SCHEMA_VERSION_POINTER: &str = "/properties/schema_version/const";

/// Compiled schema plus the version it declares.
pub struct SchemaLoadResult {
    pub schema_version: String,
    pub compiled: JSONSchema,
}

impl SchemaLoadResult {
    /// Validate `instance`, joining every violation into one error message.
    pub fn validate(&self, instance: &Value) -> Result<()> {
        if let Err(errors) = self.compiled.validate(instance) {
            let details = errors
                .map(|err| format!("{}: {}", err.instance_path, err))
                .collect::<Vec<_>>()
                .join("\n");
            bail!("{details}");
        }
        Ok(())
    }
}

/// Load and compile a schema, rejecting versions outside `allowed_versions`.
pub fn load_json_schema(
    path: &Path,
    allowed_versions: Option<&BTreeSet<String>>,
) -> Result<SchemaLoadResult> {
    let file = File::open(path).with_context(|| format!("opening schema {}", path.display()))?;
    let schema_value: Value = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing schema {}", path.display()))?;

    let schema_version = extract_schema_version(&schema_value)
        .ok_or_else(|| anyhow!("schema {} missing schema_version const", path.display()))?;

    if let Some(allowed) = allowed_versions {
        if !allowed.contains(&schema_version) {
            bail!(
                "schema_version '{}' not in allowed set {:?}",
                schema_version,
                allowed
            );
        }
    }

    let compiled = JSONSchema::compile(&schema_value)
        .map_err(|err| anyhow!("compiling schema {}: {err}", path.display()))?;

    Ok(SchemaLoadResult {
        schema_version,
        compiled,
    })
}

/// Version identifiers share the `^[A-Za-z0-9_.-]+$` shape.
pub fn is_valid_version_token(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
}

fn extract_schema_version(schema: &Value) -> Option<String> {
    let version = schema
        .pointer(SCHEMA_VERSION_POINTER)
        .and_then(Value::as_str)?;
    is_valid_version_token(version).then(|| version.to_string())
}
