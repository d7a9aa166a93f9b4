/*
 * data.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Render context construction from data files and `-D` definitions.

use anyhow::{Context, Result, bail};
use lina::TemplateValue;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Merge data files and definitions into one mapping context.
///
/// Files are merged in order at the top level, later keys win. Definitions
/// are applied last.
pub fn build_context(files: &[PathBuf], definitions: &[String]) -> Result<TemplateValue> {
    let mut merged = Map::new();

    for path in files {
        match load_data_file(path)? {
            Value::Object(map) => merged.extend(map),
            Value::Null => {}
            _ => bail!(
                "Data file {} must contain a mapping at the top level",
                path.display()
            ),
        }
    }

    for definition in definitions {
        let (key, value) = parse_definition(definition)?;
        merged.insert(key, value);
    }

    Ok(TemplateValue::from(Value::Object(merged)))
}

/// Load a JSON or YAML file.
///
/// `.json` files are parsed as JSON; everything else as YAML, which also
/// accepts JSON documents.
pub fn load_data_file(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read data file {}", path.display()))?;

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if is_json {
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse JSON data file {}", path.display()))
    } else {
        serde_yaml::from_str(&text)
            .with_context(|| format!("Failed to parse YAML data file {}", path.display()))
    }
}

/// Parse `KEY=VALUE`. The value is read as a YAML scalar, so `42` and `true`
/// keep their types and anything else becomes a string.
pub fn parse_definition(definition: &str) -> Result<(String, Value)> {
    let Some((key, raw)) = definition.split_once('=') else {
        bail!("Invalid definition '{}', expected KEY=VALUE", definition);
    };
    let key = key.trim();
    if key.is_empty() {
        bail!("Invalid definition '{}', the key is empty", definition);
    }

    let value = match serde_yaml::from_str::<Value>(raw) {
        Ok(value @ (Value::Bool(_) | Value::Number(_))) => value,
        _ => Value::String(raw.to_string()),
    };
    Ok((key.to_string(), value))
}
