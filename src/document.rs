// k8s-schema-fixup/src/document.rs

use serde_json::{Map, Value};
use std::{
    fs,
    io::{Read, Write},
    path::Path,
};
use tracing::debug;

use crate::error::{Result, SchemaError};

/// Path value that selects standard input instead of a file.
pub const STDIN_PATH: &str = "-";

/// Reads and parses the whole document before anything else happens.
pub fn load(path: &Path) -> Result<Value> {
    let bytes = if path.as_os_str() == STDIN_PATH {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .map_err(|source| SchemaError::InputNotFound { path: path.to_path_buf(), source })?;
        buf
    } else {
        fs::read(path).map_err(|source| SchemaError::InputNotFound { path: path.to_path_buf(), source })?
    };
    debug!(path = %path.display(), bytes = bytes.len(), "loaded schema document");
    parse_slice(&bytes, &path.display().to_string())
}

pub fn parse(text: &str, origin: &str) -> Result<Value> {
    parse_slice(text.as_bytes(), origin)
}

/// Invalid UTF-8 is reported as malformed JSON, not as a read failure.
pub fn parse_slice(bytes: &[u8], origin: &str) -> Result<Value> {
    serde_json::from_slice(bytes).map_err(|e| {
        let full = e.to_string();
        let location = format!(" at line {} column {}", e.line(), e.column());
        SchemaError::MalformedJson {
            origin: origin.to_string(),
            line: e.line(),
            column: e.column(),
            message: full.strip_suffix(&location).unwrap_or(&full).to_string(),
        }
    })
}

/// Pretty-prints with 2-space indentation and a trailing newline.
pub fn emit<W: Write>(mut out: W, value: &Value) -> Result<()> {
    serde_json::to_writer_pretty(&mut out, value).map_err(std::io::Error::from)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

pub fn definitions(document: &Value) -> Result<&Map<String, Value>> {
    document
        .as_object()
        .ok_or_else(|| SchemaError::shape("", "an object"))?
        .get("definitions")
        .ok_or_else(|| SchemaError::shape("/definitions", "a 'definitions' key"))?
        .as_object()
        .ok_or_else(|| SchemaError::shape("/definitions", "an object"))
}

pub fn definitions_mut(document: &mut Value) -> Result<&mut Map<String, Value>> {
    document
        .as_object_mut()
        .ok_or_else(|| SchemaError::shape("", "an object"))?
        .get_mut("definitions")
        .ok_or_else(|| SchemaError::shape("/definitions", "a 'definitions' key"))?
        .as_object_mut()
        .ok_or_else(|| SchemaError::shape("/definitions", "an object"))
}

/// Escapes one JSON pointer reference token (RFC 6901).
pub fn escape_token(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

pub fn unescape_token(token: &str) -> String {
    token.replace("~1", "/").replace("~0", "~")
}

pub(crate) fn pointer(segments: &[&str]) -> String {
    segments.iter().map(|s| format!("/{}", escape_token(s))).collect()
}
