// k8s-schema-fixup/src/one_of.rs

use serde_json::{json, Value};
use tracing::info;

use crate::{
    document::{self, escape_token},
    error::{Result, SchemaError},
};

/// Base URI that every generated `$ref` is resolved against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RefBase(String);

impl RefBase {
    /// Accepts the URI with or without its trailing `#`.
    pub fn new(uri: impl Into<String>) -> Result<Self> {
        let mut uri = uri.into();
        if uri.trim().is_empty() {
            return Err(SchemaError::MissingBaseUri);
        }
        if uri.split_once('#').is_some_and(|(_, fragment)| !fragment.is_empty()) {
            return Err(SchemaError::InvalidBaseUri { uri, reason: "already has a fragment" });
        }
        if !uri.ends_with('#') {
            uri.push('#');
        }
        Ok(Self(uri))
    }

    pub fn definition_ref(&self, key: &str) -> String {
        format!("{}/definitions/{}", self.0, escape_token(key))
    }

    pub fn as_str(&self) -> &str { &self.0 }
}

/// Builds `{"oneOf": [{"$ref": ...}, ...]}` over every definition, in input order.
///
/// References are not checked for resolvability; see [`crate::refs`].
pub fn aggregate(document: &Value, base: &RefBase) -> Result<Value> {
    let defs = document::definitions(document)?;
    let refs: Vec<Value> = defs
        .keys()
        .map(|key| json!({ "$ref": base.definition_ref(key) }))
        .collect();
    info!(count = refs.len(), base = base.as_str(), "built oneOf aggregate");
    Ok(json!({ "oneOf": refs }))
}
