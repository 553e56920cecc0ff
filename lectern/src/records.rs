use std::fs;
use std::io::Read;
use std::path::Path;

use lectern_tree::MenuRecord;
use serde_json::Value;
use thiserror::Error;

/// Path argument that selects standard input.
pub(crate) const STDIN_PATH: &str = "-";

/// Envelope keys the admin API wraps record lists in.
const ENVELOPE_KEYS: [&str; 2] = ["data", "rows"];

/// Errors emitted while loading exported records.
#[derive(Debug, Error)]
pub(crate) enum RecordsError {
    #[error("records IO failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("records JSON failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a record array or an object with a `data`/`rows` array")]
    UnexpectedShape,
}

/// Read records from a file, or from stdin when `path` is `-`.
pub(crate) fn load_records(
    path: &Path,
) -> Result<Vec<MenuRecord>, RecordsError> {
    let payload = if path.as_os_str() == STDIN_PATH {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(path)?
    };

    let records = parse_records(&payload)?;
    log::info!("loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Parse a bare record array or an API envelope around one.
pub(crate) fn parse_records(
    payload: &str,
) -> Result<Vec<MenuRecord>, RecordsError> {
    let value: Value = serde_json::from_str(payload)?;
    let list = unwrap_envelope(value).ok_or(RecordsError::UnexpectedShape)?;
    Ok(serde_json::from_value(list)?)
}

fn unwrap_envelope(value: Value) -> Option<Value> {
    match value {
        Value::Array(_) => Some(value),
        Value::Object(mut fields) => ENVELOPE_KEYS
            .iter()
            .filter_map(|key| fields.remove(*key))
            .find_map(unwrap_envelope),
        _ => None,
    }
}
