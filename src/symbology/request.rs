//! Build a [`ConvertRequest`] from configuration
//!
//! The universe comes from one of: a JSON request file, the inline
//! comma-separated config value, or a newline-delimited universe file. The
//! universe file, when configured, replaces the list from the other two.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use serde_json::Value;

use super::{ConvertRequest, Field};
use crate::config::AppConfig;

/// Most identifiers read from a universe file
pub const MAX_UNIVERSE: usize = 99;

/// A request plus everything worth telling the user about how it was built
#[derive(Debug, Default)]
pub struct BuiltRequest {
    pub request: ConvertRequest,
    pub warnings: Vec<String>,
}

#[derive(Deserialize)]
struct JsonRequestFile {
    #[serde(default)]
    universe: Vec<Value>,
    #[serde(default)]
    to: Vec<Value>,
}

/// Text of the scalar entries in a JSON array. Numbers and booleans are
/// stringified; nulls, arrays and objects are skipped and named in `warnings`.
fn scalar_texts(key: &str, values: &[Value], warnings: &mut Vec<String>) -> Vec<String> {
    let mut texts = Vec::with_capacity(values.len());
    for value in values {
        match value {
            Value::String(s) => texts.push(s.clone()),
            Value::Number(n) => texts.push(n.to_string()),
            Value::Bool(b) => texts.push(b.to_string()),
            other => warnings.push(format!(
                "Ignoring `{}` entry that is not text or a number: {}",
                key, other
            )),
        }
    }
    texts
}

/// Build the convert request described by `config`.
///
/// Never fails: read or parse errors are logged and recorded in
/// `warnings`, and whatever was filled in before the error is returned.
pub fn build_convert_request(config: &AppConfig) -> BuiltRequest {
    let mut built = BuiltRequest::default();
    if let Err(err) = fill_request(config, &mut built) {
        tracing::warn!("Unable to build convert request: {:#}", err);
        built
            .warnings
            .push(format!("Unable to convert data to request message: {:#}", err));
    }
    built
}

fn fill_request(config: &AppConfig, built: &mut BuiltRequest) -> Result<()> {
    if config.use_json_request_file {
        let path = config
            .json_request_file
            .as_deref()
            .ok_or_else(|| anyhow!("json_request_file is required when use_json_request_file is set"))?;
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read request file: {}", path.display()))?;
        let file: JsonRequestFile = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse request file: {}", path.display()))?;

        built.request.universe = scalar_texts("universe", &file.universe, &mut built.warnings);
        let to = scalar_texts("to", &file.to, &mut built.warnings);
        apply_fields(built, &to);
    } else {
        built.request.universe = split_list(config.universe.as_deref());
        apply_fields(built, &split_list(config.to_fields.as_deref()));
    }

    if let Some(path) = config
        .universe_list_file_path
        .as_deref()
        .filter(|path| !path.as_os_str().is_empty())
    {
        built.request.universe = read_universe_file(path)?;
    }
    Ok(())
}

fn apply_fields(built: &mut BuiltRequest, values: &[String]) {
    let (fields, warning) = parse_fields(values);
    built.request.to = fields;
    if let Some(warning) = warning {
        built.warnings.push(warning);
    }
}

/// Split a comma-separated value, dropping blank entries.
fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

/// Keep the values that name a [`Field`].
///
/// Returns the valid fields in input order, plus a message naming the
/// rejected values when there were any.
pub fn parse_fields<S: AsRef<str>>(values: &[S]) -> (Vec<Field>, Option<String>) {
    let mut fields = Vec::with_capacity(values.len());
    let mut invalid = Vec::new();

    for value in values {
        match value.as_ref().parse::<Field>() {
            Ok(field) => fields.push(field),
            Err(_) => invalid.push(value.as_ref().trim().to_string()),
        }
    }

    let warning = (!invalid.is_empty()).then(|| {
        let valid: Vec<&str> = Field::ALL.iter().map(Field::as_str).collect();
        format!(
            "Ignoring invalid field(s): {}. Valid fields are {}",
            invalid.join(", "),
            valid.join(", ")
        )
    });
    (fields, warning)
}

/// Read up to [`MAX_UNIVERSE`] non-blank lines from a universe file.
pub fn read_universe_file(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open universe file: {}", path.display()))?;

    let mut universe = Vec::new();
    for line in BufReader::new(file).lines() {
        let line =
            line.with_context(|| format!("Failed to read universe file: {}", path.display()))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        universe.push(line.to_string());
        if universe.len() == MAX_UNIVERSE {
            break;
        }
    }
    Ok(universe)
}
