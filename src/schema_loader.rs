//! Bundled JSON Schema for snapshot files.
//!
//! The schema ships inside the binary so a snapshot can be checked wherever the
//! process runs. Validation happens on the raw `serde_json::Value` before
//! records are decoded, which yields every violation at once instead of
//! serde's first-error-wins message.

use anyhow::{Context, Result, anyhow, bail};
use jsonschema::JSONSchema;
use serde_json::Value;

pub(crate) const SNAPSHOT_SCHEMA: &str = include_str!("../schema/emoji_snapshot.schema.json");

/// Parse and compile the bundled snapshot schema.
pub(crate) fn load_snapshot_schema() -> Result<JSONSchema> {
    let raw: Value =
        serde_json::from_str(SNAPSHOT_SCHEMA).context("parsing bundled snapshot schema")?;
    JSONSchema::compile(&raw).map_err(|err| anyhow!("compiling bundled snapshot schema: {err}"))
}

/// Validate a parsed snapshot document, listing every schema violation.
pub(crate) fn validate_snapshot(value: &Value) -> Result<()> {
    let schema = load_snapshot_schema()?;
    if let Err(errors) = schema.validate(value) {
        let details = errors
            .map(|err| format!("{}: {}", err.instance_path, err))
            .collect::<Vec<_>>()
            .join("\n");
        bail!("snapshot failed schema validation:\n{}", details);
    }
    Ok(())
}
