// k8s-schema-fixup/src/error.rs

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("cannot read input {}", path.display())]
    InputNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in {origin} at line {line}, column {column}: {message}")]
    MalformedJson {
        origin: String,
        line: usize,
        column: usize,
        message: String,
    },

    /// `pointer` is an RFC 6901 JSON pointer into the input document.
    #[error("unexpected shape at '{pointer}': expected {expected}")]
    UnexpectedShape { pointer: String, expected: &'static str },

    #[error("no base URI configured for oneOf references (pass --base-uri or set base_uri in the config file)")]
    MissingBaseUri,

    #[error("invalid base URI '{uri}': {reason}")]
    InvalidBaseUri { uri: String, reason: &'static str },

    #[error("config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SchemaError {
    pub(crate) fn shape(pointer: impl Into<String>, expected: &'static str) -> Self {
        Self::UnexpectedShape { pointer: pointer.into(), expected }
    }
}

pub type Result<T, E = SchemaError> = std::result::Result<T, E>;
