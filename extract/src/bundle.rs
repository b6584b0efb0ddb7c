//! Loading, validating and bundling generated schema files.

use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use sha2::{Digest, Sha256};
use type2cli_core::{SchemaPackage, TypeSchema, validate_package, validate_schema};

use crate::error::{ExtractError, Result};

/// Resolves schema inputs into a sorted list of `.json` files.
///
/// Directories contribute the `.json` files directly inside them.
pub fn collect_schema_paths(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    if inputs.is_empty() {
        return Err(ExtractError::InvalidInput(
            "No schema paths were provided".to_string(),
        ));
    }

    let mut paths = BTreeSet::new();

    for input in inputs {
        if input.is_dir() {
            let entries = fs::read_dir(input).map_err(|e| ExtractError::io(input, e))?;
            for entry in entries {
                let path = entry.map_err(|e| ExtractError::io(input, e))?.path();
                if path.extension() == Some(OsStr::new("json")) {
                    paths.insert(path);
                }
            }
            continue;
        }

        if input.is_file() {
            if input.extension() != Some(OsStr::new("json")) {
                return Err(ExtractError::InvalidInput(format!(
                    "Schema file '{}' must end in .json",
                    input.display()
                )));
            }
            paths.insert(input.clone());
            continue;
        }

        return Err(ExtractError::InvalidInput(format!(
            "Schema path '{}' does not exist",
            input.display()
        )));
    }

    Ok(paths.into_iter().collect())
}

/// Reads one file holding either a single schema or a package, and
/// validates every schema in it.
pub fn load_schemas(path: &Path) -> Result<Vec<TypeSchema>> {
    let raw = fs::read_to_string(path).map_err(|e| ExtractError::io(path, e))?;
    let value: serde_json::Value = serde_json::from_str(&raw)?;

    let schemas = if value.get("schemas").is_some() {
        let package: SchemaPackage = serde_json::from_value(value)?;
        if let Some(first) = validate_package(&package).first() {
            return Err(invalid(path, first));
        }
        package.schemas
    } else {
        vec![serde_json::from_value(value)?]
    };

    for schema in &schemas {
        if let Some(first) = validate_schema(schema).first() {
            return Err(invalid(path, first));
        }
    }

    Ok(schemas)
}

/// Loads and validates every file, in order.
pub fn load_and_validate_schemas(paths: &[PathBuf]) -> Result<Vec<TypeSchema>> {
    let mut schemas = Vec::with_capacity(paths.len());
    for path in paths {
        schemas.extend(load_schemas(path)?);
    }
    Ok(schemas)
}

/// Bundles schema files into a validated, timestamped and hashed package.
pub fn bundle_schema_files(
    paths: &[PathBuf],
    version: &str,
    name: Option<String>,
) -> Result<SchemaPackage> {
    let mut package = SchemaPackage::new(version);
    package.name = name;
    package.schemas = load_and_validate_schemas(paths)?;
    package.sort();

    if let Some(first) = validate_package(&package).first() {
        return Err(ExtractError::InvalidInput(format!(
            "Schema package validation failed: {first}"
        )));
    }

    package.generated_at = Some(Utc::now().to_rfc3339());
    package.bundle_hash = Some(bundle_hash(&package.schemas)?);
    Ok(package)
}

/// Hex SHA-256 of the schemas' compact JSON encoding.
pub fn bundle_hash(schemas: &[TypeSchema]) -> Result<String> {
    let bytes = serde_json::to_vec(schemas)?;
    let digest = Sha256::digest(&bytes);
    Ok(digest.iter().map(|b| format!("{b:02x}")).collect())
}

fn invalid(path: &Path, err: &impl std::fmt::Display) -> ExtractError {
    ExtractError::InvalidInput(format!(
        "Schema validation failed for '{}': {err}",
        path.display()
    ))
}
