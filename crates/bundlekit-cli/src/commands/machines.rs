use super::{json_pretty, mark_ok, EXIT_SUCCESS};
use bundlekit_schema::normalize_machines;
use serde_yaml::Value;
use std::path::Path;

/// Normalize the machines of a bundle file.
///
/// With `key` set, the machines mapping is read from that top-level field of
/// the document; otherwise the whole document is the mapping. YAML decoding
/// also covers JSON bundles.
pub fn run(file: &Path, key: Option<&str>, json: bool) -> Result<u8, String> {
    let content = std::fs::read_to_string(file)
        .map_err(|e| format!("input error: failed to read {}: {e}", file.display()))?;
    let document: Value = serde_yaml::from_str(&content)
        .map_err(|e| format!("input error: failed to decode {}: {e}", file.display()))?;
    tracing::debug!(file = %file.display(), key = ?key, "decoded bundle document");

    let raw = match key {
        None => document,
        Some(key) => match document {
            Value::Mapping(mut bundle) => bundle.remove(key).unwrap_or(Value::Null),
            _ => {
                return Err(format!(
                    "input error: {} is not a bundle mapping",
                    file.display()
                ))
            }
        },
    };

    let machines = normalize_machines(raw).map_err(|e| format!("validation error: {e}"))?;
    tracing::debug!(count = machines.len(), "normalized machines");

    if json {
        println!("{}", json_pretty(&machines)?);
    } else if machines.is_empty() {
        println!("no machines defined");
    } else {
        for (id, attrs) in &machines {
            let attrs = serde_json::to_string(attrs).unwrap_or_else(|_| format!("{attrs:?}"));
            println!("{}", mark_ok(&format!("machine {id}  {attrs}")));
        }
    }
    Ok(EXIT_SUCCESS)
}
