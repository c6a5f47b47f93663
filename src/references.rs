//! Reference path rewriting and local `$ref` dereferencing.

use crate::config::RefRewrite;
use crate::error::{ConversionError, Result};
use crate::search::visit_objects_with_key_mut;
use percent_encoding::percent_decode_str;
use serde_json::{Map, Value};

pub const COMPONENTS_PREFIX: &str = "#/components/schemas";
pub const DEFINITIONS_PREFIX: &str = "#/definitions";

/// Point every `#/components/schemas` reference at `#/definitions`.
pub fn rewrite_component_refs(schema: Value, mode: RefRewrite) -> Result<Value> {
    match mode {
        RefRewrite::Text => {
            let text = serde_json::to_string(&schema)?;
            let rewritten = text.replace(COMPONENTS_PREFIX, DEFINITIONS_PREFIX);
            Ok(serde_json::from_str(&rewritten)?)
        }
        RefRewrite::Structural => {
            let mut schema = schema;
            visit_objects_with_key_mut(&mut schema, "$ref", |obj| {
                if let Some(Value::String(reference)) = obj.get_mut("$ref") {
                    if let Some(rest) = reference.strip_prefix(COMPONENTS_PREFIX) {
                        *reference = format!("{}{}", DEFINITIONS_PREFIX, rest);
                    }
                }
            });
            Ok(schema)
        }
    }
}

/// Replace every local `$ref` in `schema` with the value it points to.
///
/// References resolve against `schema` itself. Circular, dangling and
/// non-local references are errors; nothing is returned on failure.
pub fn dereference(schema: &Value) -> Result<Value> {
    let mut active = Vec::new();
    resolve(schema, schema, &mut active)
}

fn resolve(node: &Value, root: &Value, active: &mut Vec<String>) -> Result<Value> {
    match node {
        Value::Object(map) => match map.get("$ref") {
            Some(Value::String(reference)) => resolve_reference(reference, map, root, active),
            _ => {
                let mut resolved = Map::new();
                for (key, value) in map {
                    resolved.insert(key.clone(), resolve(value, root, active)?);
                }
                Ok(Value::Object(resolved))
            }
        },
        Value::Array(items) => items
            .iter()
            .map(|item| resolve(item, root, active))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        _ => Ok(node.clone()),
    }
}

fn resolve_reference(
    reference: &str,
    holder: &Map<String, Value>,
    root: &Value,
    active: &mut Vec<String>,
) -> Result<Value> {
    if active.iter().any(|r| r == reference) {
        return Err(ConversionError::ResolutionError(format!(
            "circular reference {}",
            reference
        )));
    }

    let pointer = reference.strip_prefix('#').ok_or_else(|| {
        ConversionError::ResolutionError(format!("external reference {} is not supported", reference))
    })?;
    let pointer = percent_decode_str(pointer).decode_utf8().map_err(|e| {
        ConversionError::ResolutionError(format!("{} is not valid UTF-8: {}", reference, e))
    })?;
    let target = root.pointer(&pointer).ok_or_else(|| {
        ConversionError::ResolutionError(format!("{} does not point into the schema", reference))
    })?;

    active.push(reference.to_string());
    let resolved = resolve(target, root, active);
    active.pop();
    let resolved = resolved?;

    let siblings: Vec<_> = holder.iter().filter(|(key, _)| key.as_str() != "$ref").collect();
    match resolved {
        Value::Object(mut merged) if !siblings.is_empty() => {
            for (key, value) in siblings {
                merged.insert(key.clone(), resolve(value, root, active)?);
            }
            Ok(Value::Object(merged))
        }
        other => Ok(other),
    }
}
