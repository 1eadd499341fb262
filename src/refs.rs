// k8s-schema-fixup/src/refs.rs

use serde_json::{Map, Value};
use std::fmt;

use crate::{
    document::{self, escape_token, unescape_token},
    error::Result,
};

const LOCAL_PREFIX: &str = "#/definitions/";

/// A local `$ref` whose target definition does not exist in the document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DanglingRef {
    /// Key of the definition containing the reference.
    pub from: String,
    /// JSON pointer to the `$ref` member.
    pub pointer: String,
    /// Unescaped name of the missing definition.
    pub target: String,
}

impl fmt::Display for DanglingRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: $ref to missing definition '{}' at {}", self.from, self.target, self.pointer)
    }
}

pub fn dangling_refs(document: &Value) -> Result<Vec<DanglingRef>> {
    let defs = document::definitions(document)?;
    let mut found = Vec::new();
    for (name, definition) in defs {
        let base = format!("/definitions/{}", escape_token(name));
        walk(defs, name, definition, &base, &mut found);
    }
    Ok(found)
}

fn walk(defs: &Map<String, Value>, from: &str, node: &Value, at: &str, found: &mut Vec<DanglingRef>) {
    match node {
        Value::Object(map) => {
            for (key, child) in map {
                let here = format!("{at}/{}", escape_token(key));
                if key == "$ref" {
                    if let Some(target) = child.as_str().and_then(|r| r.strip_prefix(LOCAL_PREFIX)) {
                        let target = unescape_token(target);
                        if !defs.contains_key(&target) {
                            found.push(DanglingRef { from: from.to_string(), pointer: here, target });
                        }
                    }
                    continue;
                }
                walk(defs, from, child, &here, found);
            }
        }
        Value::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                walk(defs, from, child, &format!("{at}/{i}"), found);
            }
        }
        _ => {}
    }
}
