//! Loading raw customer payloads from disk or stdin.

use std::io::Read;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::{IngestError, Result};

/// Path that selects standard input instead of a file.
pub const STDIN_PATH: &str = "-";

/// Parse a raw response body.
///
/// A blank body parses to `Value::Null`, which normalization reports as an
/// empty payload rather than a parse error.
pub fn parse_payload(body: &str) -> Result<Value> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(body)?)
}

/// Read a payload from `path`, or from stdin when `path` is `-`.
pub fn load_payload(path: &Path) -> Result<Value> {
    let body = read_source(path)?;
    debug!(path = %path.display(), bytes = body.len(), "loaded payload");
    parse_payload(&body)
}

/// Read and deserialize a typed JSON document (config files, request lists).
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let body = read_source(path)?;
    Ok(serde_json::from_str(&body)?)
}

fn read_source(path: &Path) -> Result<String> {
    if path.as_os_str() == STDIN_PATH {
        let mut body = String::new();
        std::io::stdin()
            .read_to_string(&mut body)
            .map_err(|source| IngestError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        return Ok(body);
    }
    std::fs::read_to_string(path).map_err(|source| IngestError::Read {
        path: path.to_path_buf(),
        source,
    })
}
