//! Normalization of a bundle's `machines` section.
//!
//! Decoded bundles key machines by strings (`"0"`, `"1"`, ...) or, when the
//! decoder is YAML-aware, by integers. Both forms normalize to a map keyed by
//! machine number. The attributes under each machine are opaque here.

use crate::error::ValidationError;
use serde::Serialize;
use serde_yaml::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Machine attributes keyed by machine number.
pub type MachineMap = BTreeMap<u64, Value>;

/// Validate a raw `machines` value and re-key it by machine number.
///
/// Either every key normalizes or the whole call fails. Feeding the result
/// back in (as a mapping value) returns an equal map.
pub fn normalize_machines(raw: Value) -> Result<MachineMap, ValidationError> {
    let entries = match raw {
        Value::Mapping(entries) => entries,
        other => return Err(ValidationError::MalformedMachines(describe(&other))),
    };

    let mut seen = BTreeSet::new();
    let mut indices = Vec::with_capacity(entries.len());
    for key in entries.keys() {
        let Some(index) = machine_index(key) else {
            return Err(ValidationError::MalformedMachines(compact(&entries)));
        };
        if !seen.insert(index) {
            return Err(ValidationError::DuplicateMachine {
                machines: compact(&entries),
                machine: index,
            });
        }
        indices.push(index);
    }

    Ok(indices
        .into_iter()
        .zip(entries.into_iter().map(|(_, attrs)| attrs))
        .collect())
}

/// Machine number for an integer key or an ASCII-digit string key.
fn machine_index(key: &Value) -> Option<u64> {
    match key {
        Value::Number(number) => number.as_u64(),
        Value::String(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
            s.parse().ok()
        }
        _ => None,
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_owned(),
        Value::String(s) => s.clone(),
        other => compact(other),
    }
}

fn compact<T: Serialize + fmt::Debug>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("{value:?}"))
}
