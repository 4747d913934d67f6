//! Shared JSON Schema loader for the catalog document.
//!
//! Schemas can come from the copy embedded in the binary or from disk next to
//! an overriding catalog. Either way the schema's `schema_version` const is
//! checked against the allowed set before the validator is compiled.

use anyhow::{Context, Result, anyhow, bail};
use jsonschema::JSONSchema;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Result of loading and compiling a JSON Schema.
pub(crate) struct CompiledSchema {
    pub schema_version: String,
    compiled: JSONSchema,
}

/// Controls how schemas are checked before compilation.
pub(crate) struct SchemaLoadOptions<'a> {
    /// Where to find the schema_version const inside the schema payload.
    pub schema_version_pointer: &'a str,
    /// Allowed schema_version values; enforced when present.
    pub allowed_versions: Option<&'a BTreeSet<String>>,
}

impl<'a> Default for SchemaLoadOptions<'a> {
    fn default() -> Self {
        Self {
            schema_version_pointer: "/properties/schema_version/const",
            allowed_versions: None,
        }
    }
}

impl CompiledSchema {
    /// Validate `instance`, joining every schema violation into one error.
    pub fn validate(&self, instance: &Value, origin: &str) -> Result<()> {
        if let Err(errors) = self.compiled.validate(instance) {
            let details = errors
                .map(|err| err.to_string())
                .collect::<Vec<_>>()
                .join("\n");
            bail!("{origin} failed schema validation:\n{details}");
        }
        Ok(())
    }
}

pub(crate) fn load_json_schema_from_path(
    path: &Path,
    options: SchemaLoadOptions<'_>,
) -> Result<CompiledSchema> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("opening schema {}", path.display()))?;
    compile_json_schema(&raw, &path.display().to_string(), options)
}

pub(crate) fn compile_json_schema(
    raw: &str,
    origin: &str,
    options: SchemaLoadOptions<'_>,
) -> Result<CompiledSchema> {
    let schema_value: Value =
        serde_json::from_str(raw).with_context(|| format!("parsing schema {origin}"))?;

    let schema_version = extract_schema_version(&schema_value, options.schema_version_pointer)
        .ok_or_else(|| anyhow!("schema {origin} missing schema_version const"))?;

    if let Some(allowed) = options.allowed_versions {
        if !allowed.contains(&schema_version) {
            bail!(
                "schema_version '{}' not in allowed set {:?}",
                schema_version,
                allowed
            );
        }
    }

    let compiled = JSONSchema::compile(&schema_value)
        .map_err(|err| anyhow!("compiling schema {origin}: {err}"))?;

    Ok(CompiledSchema {
        schema_version,
        compiled,
    })
}

fn extract_schema_version(schema: &Value, pointer: &str) -> Option<String> {
    let version = schema.pointer(pointer).and_then(Value::as_str)?;
    if version
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        Some(version.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SCHEMA: &str = r#"{
        "type": "object",
        "required": ["schema_version", "count"],
        "properties": {
            "schema_version": { "const": "demo_v1" },
            "count": { "type": "integer", "minimum": 0 }
        }
    }"#;

    #[test]
    fn compiles_and_validates() {
        let schema = compile_json_schema(SCHEMA, "demo", SchemaLoadOptions::default()).unwrap();
        assert_eq!(schema.schema_version, "demo_v1");
        schema
            .validate(&json!({"schema_version": "demo_v1", "count": 3}), "doc")
            .unwrap();

        let err = schema
            .validate(&json!({"schema_version": "demo_v1", "count": -1}), "doc")
            .unwrap_err();
        assert!(err.to_string().contains("doc failed schema validation"));
    }

    #[test]
    fn rejects_versions_outside_allowed_set() {
        let allowed = BTreeSet::from(["other_v1".to_string()]);
        let err = compile_json_schema(
            SCHEMA,
            "demo",
            SchemaLoadOptions {
                allowed_versions: Some(&allowed),
                ..Default::default()
            },
        )
        .err()
        .expect("version outside allowed set");
        assert!(err.to_string().contains("demo_v1"));
    }
}
