//! JSON rendering for outlines and collection reports.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::{Error, Result};

/// Indentation of pretty output.
const PRETTY_INDENT: &[u8] = b"    ";

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON, four-space indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize a value to JSON. Non-ASCII text is written as-is.
pub fn to_json<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let mut out = Vec::new();
    let result = match format {
        JsonFormat::Pretty => {
            let formatter = PrettyFormatter::with_indent(PRETTY_INDENT);
            let mut ser = Serializer::with_formatter(&mut out, formatter);
            value.serialize(&mut ser)
        }
        JsonFormat::Compact => value.serialize(&mut Serializer::new(&mut out)),
    };
    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))?;

    String::from_utf8(out).map_err(|e| Error::Render(e.to_string()))
}

/// Serialize a value and write it to `path`, creating parent directories.
pub fn write_json<T: Serialize + ?Sized>(value: &T, path: &Path, format: JsonFormat) -> Result<()> {
    let json = to_json(value, format)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, json)?;
    Ok(())
}
