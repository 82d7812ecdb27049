//! JSON helpers and boundary parsing.
//!
//! Untrusted input (seed traits, tunable patches) is parsed here and
//! rejected with [`IoError::Validation`] before it reaches the engine.

use crate::error::{IoError, Result};
use ameba_core::Tunables;
use ameba_data::Traits;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;

pub fn to_json_pretty<T>(data: &T) -> Result<String>
where
    T: Serialize,
{
    Ok(serde_json::to_string_pretty(data)?)
}

/// Deserializes data from a JSON string. Blank input is a validation error.
pub fn from_json<T>(json: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    if json.trim().is_empty() {
        return Err(IoError::validation("Empty JSON string"));
    }
    Ok(serde_json::from_str(json)?)
}

/// Writes JSON to `path`, creating parent directories.
///
/// The data goes to a sibling temp file first and is renamed into place, so
/// readers never observe a half-written file.
pub fn write_json_file<T, P>(data: &T, path: P) -> Result<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let json = to_json_pretty(data)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            IoError::FileSystem(e).with_context(format!("creating {}", parent.display()))
        })?;
    }
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json)
        .and_then(|()| std::fs::rename(&tmp, path))
        .map_err(|e| IoError::FileSystem(e).with_context(format!("writing {}", path.display())))
}

pub fn read_json_file<T, P>(path: P) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)
        .map_err(|e| IoError::FileSystem(e).with_context(format!("reading {}", path.display())))?;
    from_json(&json)
}

fn object(value: Value, what: &str) -> Result<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(IoError::validation(format!(
            "{what} must be a JSON object, got {other}"
        ))),
    }
}

/// Extracts `keys` from `map` as finite numbers.
///
/// A recognised key holding anything but a finite number is rejected;
/// every other key is ignored.
fn numeric_fields(map: &Map<String, Value>, keys: &[&str]) -> Result<HashMap<String, f64>> {
    let mut out = HashMap::new();
    for &key in keys {
        let Some(value) = map.get(key) else {
            continue;
        };
        match value.as_f64().filter(|v| v.is_finite()) {
            Some(v) => {
                out.insert(key.to_string(), v);
            }
            None => {
                return Err(IoError::validation(format!(
                    "`{key}` must be a finite number, got {value}"
                )))
            }
        }
    }
    Ok(out)
}

/// Parses seed traits supplied with a spawn request.
///
/// `null` means no seed. Unknown keys are dropped with a debug log.
pub fn parse_traits(json: &str) -> Result<Option<Traits>> {
    let value: Value = from_json(json)?;
    if value.is_null() {
        return Ok(None);
    }
    let map = object(value, "traits")?;
    let fields = numeric_fields(&map, &Traits::KEYS)?;
    let (traits, _) = Traits::from_map(&fields);
    let ignored: Vec<&String> = map
        .keys()
        .filter(|k| !Traits::KEYS.iter().any(|key| *key == k.as_str()))
        .collect();
    if !ignored.is_empty() {
        tracing::debug!(?ignored, "Ignoring unknown trait keys");
    }
    Ok(Some(traits))
}

/// Parses a tunables patch into the mapping `World::apply_config` accepts.
///
/// Only the tunable keys survive; world dimensions and unknown keys are
/// silently dropped.
pub fn parse_tunables_patch(json: &str) -> Result<HashMap<String, f64>> {
    let value: Value = from_json(json)?;
    let map = object(value, "config patch")?;
    numeric_fields(
        &map,
        &[
            Tunables::FOOD_SPAWN_PROB_KEY,
            Tunables::REPRODUCTION_BASE_CHANCE_KEY,
        ],
    )
}
