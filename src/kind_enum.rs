// k8s-schema-fixup/src/kind_enum.rs

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::{
    document::{self, pointer},
    error::{Result, SchemaError},
};

/// How shape violations inside individual definitions are handled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strictness {
    /// Fail on the first malformed definition.
    #[default]
    Strict,
    /// Log and skip malformed definitions.
    Permissive,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum KindOutcome {
    NoProperties,
    NoKind,
    EnumPresent,
    EnumMissing,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BackfillReport {
    pub visited: usize,
    pub filled: Vec<String>,
    pub kept: Vec<String>,
    /// Definitions without `properties` or without a `kind` property.
    pub skipped: usize,
    /// Only populated in permissive mode.
    pub malformed: Vec<String>,
}

/// Final dot-separated segment of a fully-qualified definition name.
pub fn short_name(fq_name: &str) -> &str {
    fq_name.rsplit('.').next().unwrap_or(fq_name)
}

/// Sets `properties.kind.enum` to `[short_name]` on every definition that has a
/// `kind` property without an `enum`. Existing enums are never touched.
///
/// Nothing is mutated unless the whole document passes inspection, so a strict
/// failure leaves `document` as it was.
pub fn backfill(document: &mut Value, strictness: Strictness) -> Result<BackfillReport> {
    let defs = document::definitions_mut(document)?;
    let mut report = BackfillReport::default();
    let mut to_fill = Vec::new();

    for (name, definition) in defs.iter() {
        report.visited += 1;
        match inspect(name, definition) {
            Ok(KindOutcome::NoProperties | KindOutcome::NoKind) => report.skipped += 1,
            Ok(KindOutcome::EnumPresent) => report.kept.push(name.clone()),
            Ok(KindOutcome::EnumMissing) => to_fill.push(name.clone()),
            Err(err) if strictness == Strictness::Permissive => {
                warn!(definition = %name, error = %err, "skipping malformed definition");
                report.malformed.push(name.clone());
            }
            Err(err) => return Err(err),
        }
    }

    for name in to_fill {
        if let Some(kind) = kind_property_mut(defs, &name) {
            let short = short_name(&name).to_string();
            debug!(definition = %name, kind = %short, "backfilled kind enum");
            kind.insert("enum".into(), Value::Array(vec![Value::String(short)]));
            report.filled.push(name);
        }
    }

    info!(
        visited = report.visited,
        filled = report.filled.len(),
        kept = report.kept.len(),
        skipped = report.skipped,
        malformed = report.malformed.len(),
        "kind enum backfill complete"
    );
    Ok(report)
}

fn inspect(name: &str, definition: &Value) -> Result<KindOutcome> {
    let definition = definition
        .as_object()
        .ok_or_else(|| SchemaError::shape(pointer(&["definitions", name]), "an object"))?;
    let Some(properties) = definition.get("properties") else {
        return Ok(KindOutcome::NoProperties);
    };
    let properties = properties.as_object().ok_or_else(|| {
        SchemaError::shape(pointer(&["definitions", name, "properties"]), "an object")
    })?;
    let Some(kind) = properties.get("kind") else {
        return Ok(KindOutcome::NoKind);
    };
    let kind = kind.as_object().ok_or_else(|| {
        SchemaError::shape(pointer(&["definitions", name, "properties", "kind"]), "an object")
    })?;
    match kind.get("enum") {
        None => Ok(KindOutcome::EnumMissing),
        Some(Value::Array(_)) => Ok(KindOutcome::EnumPresent),
        Some(_) => Err(SchemaError::shape(
            pointer(&["definitions", name, "properties", "kind", "enum"]),
            "an array",
        )),
    }
}

fn kind_property_mut<'a>(defs: &'a mut Map<String, Value>, name: &str) -> Option<&'a mut Map<String, Value>> {
    defs.get_mut(name)?
        .get_mut("properties")?
        .get_mut("kind")?
        .as_object_mut()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "definitions": {
                "x.y.Foo": {"properties": {"kind": {"type": "string"}}},
                "x.y.Bar": {"properties": {"kind": {"type": "string", "enum": ["Custom"]}}},
                "x.y.NoKind": {"properties": {"apiVersion": {"type": "string"}}},
                "x.y.Bare": {"type": "object"}
            }
        })
    }

    #[test]
    fn short_name_takes_last_segment() {
        assert_eq!(short_name("a.b.Widget"), "Widget");
        assert_eq!(short_name("Widget"), "Widget");
        assert_eq!(short_name("io.k8s.api.core.v1.Pod"), "Pod");
        assert_eq!(short_name("trailing."), "");
    }

    #[test]
    fn fills_missing_enum_and_keeps_existing() {
        let mut doc = sample();
        let report = backfill(&mut doc, Strictness::Strict).unwrap();
        assert_eq!(doc["definitions"]["x.y.Foo"]["properties"]["kind"]["enum"], json!(["Foo"]));
        assert_eq!(doc["definitions"]["x.y.Bar"]["properties"]["kind"]["enum"], json!(["Custom"]));
        assert_eq!(report.visited, 4);
        assert_eq!(report.filled, vec!["x.y.Foo".to_string()]);
        assert_eq!(report.kept, vec!["x.y.Bar".to_string()]);
        assert_eq!(report.skipped, 2);
    }

    #[test]
    fn definitions_without_kind_or_properties_are_untouched() {
        let mut doc = sample();
        backfill(&mut doc, Strictness::Strict).unwrap();
        assert_eq!(doc["definitions"]["x.y.NoKind"], sample()["definitions"]["x.y.NoKind"]);
        assert_eq!(doc["definitions"]["x.y.Bare"], json!({"type": "object"}));
    }

    #[test]
    fn running_twice_changes_nothing_more() {
        let mut once = sample();
        backfill(&mut once, Strictness::Strict).unwrap();
        let mut twice = once.clone();
        let report = backfill(&mut twice, Strictness::Strict).unwrap();
        assert_eq!(once, twice);
        assert!(report.filled.is_empty());
    }

    #[test]
    fn empty_existing_enum_is_preserved() {
        let mut doc = json!({"definitions": {"a.Empty": {"properties": {"kind": {"enum": []}}}}});
        backfill(&mut doc, Strictness::Strict).unwrap();
        assert_eq!(doc["definitions"]["a.Empty"]["properties"]["kind"]["enum"], json!([]));
    }

    #[test]
    fn strict_mode_rejects_without_mutating() {
        let mut doc = json!({
            "definitions": {
                "a.Good": {"properties": {"kind": {"type": "string"}}},
                "a/b.Bad": {"properties": ["kind"]}
            }
        });
        let before = doc.clone();
        let err = backfill(&mut doc, Strictness::Strict).unwrap_err();
        match err {
            SchemaError::UnexpectedShape { pointer, expected } => {
                assert_eq!(pointer, "/definitions/a~1b.Bad/properties");
                assert_eq!(expected, "an object");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(doc, before);
    }

    #[test]
    fn strict_mode_rejects_non_array_enum() {
        let mut doc = json!({"definitions": {"a.B": {"properties": {"kind": {"enum": "B"}}}}});
        let err = backfill(&mut doc, Strictness::Strict).unwrap_err();
        assert!(matches!(err, SchemaError::UnexpectedShape { ref pointer, .. } if pointer == "/definitions/a.B/properties/kind/enum"));
    }

    #[test]
    fn permissive_mode_skips_malformed_definitions() {
        let mut doc = json!({
            "definitions": {
                "a.Good": {"properties": {"kind": {"type": "string"}}},
                "a.Odd": "not a definition",
                "a.Weird": {"properties": {"kind": true}}
            }
        });
        let report = backfill(&mut doc, Strictness::Permissive).unwrap();
        assert_eq!(report.filled, vec!["a.Good".to_string()]);
        assert_eq!(report.malformed, vec!["a.Odd".to_string(), "a.Weird".to_string()]);
        assert_eq!(doc["definitions"]["a.Odd"], json!("not a definition"));
        assert_eq!(doc["definitions"]["a.Weird"]["properties"]["kind"], json!(true));
    }

    #[test]
    fn missing_definitions_is_fatal_even_when_permissive() {
        let mut doc = json!({"oneOf": []});
        assert!(backfill(&mut doc, Strictness::Permissive).is_err());
    }

    #[test]
    fn key_order_is_preserved() {
        let mut doc = json!({"definitions": {"z.Z": {}, "a.A": {"properties": {"kind": {}}}, "m.M": {}}});
        backfill(&mut doc, Strictness::Strict).unwrap();
        let keys: Vec<_> = doc["definitions"].as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["z.Z", "a.A", "m.M"]);
    }
}
