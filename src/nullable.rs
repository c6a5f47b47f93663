//! Rewrites OpenAPI `nullable` markers into JSON Schema type unions.

use crate::search::visit_objects_with_key_mut;
use serde_json::{Map, Value};
use tracing::warn;

const NULLABLE: &str = "nullable";
const NULL_TYPE: &str = "null";

/// Strip every `nullable` key under `tree` and widen the matching `type`
/// with `"null"`. Only presence of the key matters, not its value.
///
/// Returns the number of fragments rewritten. A second run over the same
/// tree finds nothing and returns 0.
pub fn normalize_nullable(tree: &mut Value) -> usize {
    let mut rewritten = 0;
    visit_objects_with_key_mut(tree, NULLABLE, |fragment| {
        fragment.shift_remove(NULLABLE);
        widen_type(fragment);
        rewritten += 1;
    });
    rewritten
}

fn widen_type(fragment: &mut Map<String, Value>) {
    let null = Value::String(NULL_TYPE.to_string());
    match fragment.get_mut("type") {
        None | Some(Value::Null) => {
            warn!("nullable schema fragment has no type, emitting type \"null\"");
            fragment.insert("type".to_string(), null);
        }
        Some(Value::Array(types)) => {
            if !types.contains(&null) {
                types.push(null);
            }
        }
        Some(original) => {
            let single = original.take();
            *original = Value::Array(vec![single, null]);
        }
    }
}
