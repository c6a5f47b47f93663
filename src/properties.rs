//! Synthesis of top-level `properties` from schemas embedded in path
//! operations and AsyncAPI messages.

use crate::error::{ConversionError, Result};
use crate::search::find_objects_with_key;
use serde_json::{Map, Value};
use tracing::debug;

/// Numbers anonymous primitive schemas (`integer-1`, `string-2`, ...).
///
/// One counter is shared by every fragment of a single conversion run.
#[derive(Debug, Default)]
pub struct AnonymousCounter {
    next: usize,
}

impl AnonymousCounter {
    pub fn new() -> Self {
        Self::default()
    }

    fn name_for(&mut self, type_name: &str) -> String {
        self.next += 1;
        format!("{}-{}", type_name, self.next)
    }
}

/// Collect every object holding a `schema` key and name its fragment.
///
/// The fragment stays where it is in `tree` and takes the `description` of
/// its containing object there; a container without one clears the
/// fragment's own. The returned properties are taken from `tree` once every
/// fragment has been visited, so they reflect edits made through nested
/// containers too. Later fragments overwrite earlier ones with the same name.
pub fn synthesize_properties(
    tree: &mut Value,
    counter: &mut AnonymousCounter,
) -> Result<Map<String, Value>> {
    let pointers: Vec<String> = find_objects_with_key(tree, "schema")
        .into_iter()
        .map(|(pointer, _)| pointer)
        .collect();

    let mut named = Vec::with_capacity(pointers.len());
    for pointer in pointers {
        // Gone if an earlier description edit removed one of its ancestors.
        let Some(Value::Object(container)) = tree.pointer(&pointer) else {
            continue;
        };
        let Some(Value::Object(fragment)) = container.get("schema") else {
            return Err(ConversionError::SynthesisError(format!(
                "found a non-object schema: {}",
                container["schema"]
            )));
        };

        let name = property_name(container, fragment, counter)?;
        let description = container.get("description").cloned();

        let fragment_pointer = format!("{}/schema", pointer);
        if let Some(Value::Object(fragment)) = tree.pointer_mut(&fragment_pointer) {
            match description {
                Some(description) => {
                    fragment.insert("description".to_string(), description);
                }
                None => {
                    fragment.shift_remove("description");
                }
            }
        }

        debug!(property = %name, pointer = %fragment_pointer, "synthesized property");
        named.push((name, fragment_pointer));
    }

    let mut properties = Map::new();
    for (name, pointer) in named {
        if let Some(fragment) = tree.pointer(&pointer) {
            properties.insert(name, fragment.clone());
        }
    }

    Ok(properties)
}

fn property_name(
    container: &Map<String, Value>,
    fragment: &Map<String, Value>,
    counter: &mut AnonymousCounter,
) -> Result<String> {
    let explicit = container
        .get("name")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty());
    if let Some(name) = explicit {
        return Ok(name.to_string());
    }

    match fragment.get("type") {
        Some(Value::String(t)) if t == "array" => {
            let items_ref = fragment
                .get("items")
                .and_then(|items| items.get("$ref"))
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    ConversionError::SynthesisError(
                        "an unnamed array schema must have items with a $ref".to_string(),
                    )
                })?;
            Ok(format!("arrayOf{}", last_segment(items_ref)))
        }
        None | Some(Value::Null) => {
            let reference = fragment
                .get("$ref")
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    ConversionError::SynthesisError(format!(
                        "schema has neither a type nor a $ref: {}",
                        Value::Object(fragment.clone())
                    ))
                })?;
            Ok(lowercase_first(last_segment(reference)))
        }
        Some(other) => {
            let label = type_label(other).ok_or_else(|| {
                ConversionError::SynthesisError(format!("unsupported schema type {}", other))
            })?;
            Ok(counter.name_for(&label))
        }
    }
}

/// Textual form of a `type` value: a list such as `["string", "null"]`
/// reads `string,null`. Object types have no name.
fn type_label(type_value: &Value) -> Option<String> {
    match type_value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        Value::Array(types) => types
            .iter()
            .map(type_label)
            .collect::<Option<Vec<_>>>()
            .map(|labels| labels.join(",")),
        Value::Object(_) => None,
    }
}

/// Build one property per AsyncAPI message whose `payload` is an object.
///
/// The property is the message without its `payload`, overlaid with the
/// payload's own fields.
pub fn message_properties(messages: &Map<String, Value>) -> Map<String, Value> {
    let mut properties = Map::new();

    for (name, message) in messages {
        let Some(message) = message.as_object() else {
            continue;
        };
        let Some(Value::Object(payload)) = message.get("payload") else {
            continue;
        };

        let mut merged: Map<String, Value> = message
            .iter()
            .filter(|(key, _)| key.as_str() != "payload")
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        for (key, value) in payload {
            merged.insert(key.clone(), value.clone());
        }

        properties.insert(name.clone(), Value::Object(merged));
    }

    properties
}

fn last_segment(reference: &str) -> &str {
    reference.rsplit('/').next().unwrap_or(reference)
}

fn lowercase_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn synthesize(mut document: Value) -> Result<Map<String, Value>> {
        synthesize_properties(&mut document, &mut AnonymousCounter::new())
    }

    #[test]
    fn explicit_name_wins() {
        let props = synthesize(json!({
            "parameters": [{ "in": "body", "name": "body", "schema": { "$ref": "#/definitions/Pet" } }]
        }))
        .unwrap();
        assert_eq!(props["body"], json!({ "$ref": "#/definitions/Pet" }));
    }

    #[test]
    fn array_is_named_after_item_reference() {
        let props = synthesize(json!({
            "responses": { "200": {
                "description": "A list of pets",
                "schema": { "type": "array", "items": { "$ref": "#/definitions/Pet" } }
            } }
        }))
        .unwrap();
        assert_eq!(
            props["arrayOfPet"],
            json!({ "type": "array", "items": { "$ref": "#/definitions/Pet" }, "description": "A list of pets" })
        );
    }

    #[test]
    fn anonymous_primitives_are_numbered_per_run() {
        let props = synthesize(json!({
            "a": { "schema": { "type": "integer" } },
            "b": { "schema": { "type": "string" } },
            "c": { "schema": { "type": "integer" } }
        }))
        .unwrap();
        let names: Vec<_> = props.keys().cloned().collect();
        assert_eq!(names, vec!["integer-1", "string-2", "integer-3"]);
    }

    #[test]
    fn reference_is_named_with_lowercased_first_letter() {
        let props = synthesize(json!({
            "content": { "application/json": { "schema": { "$ref": "#/components/schemas/PetDTO" } } }
        }))
        .unwrap();
        assert!(props.contains_key("petDTO"));
    }

    #[test]
    fn missing_container_description_clears_fragment_description() {
        let props = synthesize(json!({
            "x": { "schema": { "$ref": "#/definitions/Pet", "description": "inner" } }
        }))
        .unwrap();
        assert_eq!(props["pet"], json!({ "$ref": "#/definitions/Pet" }));
    }

    #[test]
    fn empty_name_falls_back_to_type_naming() {
        let props = synthesize(json!({
            "parameters": [{ "in": "query", "name": "", "schema": { "type": "boolean" } }]
        }))
        .unwrap();
        let names: Vec<_> = props.keys().cloned().collect();
        assert_eq!(names, vec!["boolean-1"]);
    }

    #[test]
    fn type_list_is_named_by_its_text() {
        let props = synthesize(json!({
            "a": { "schema": { "type": "integer" } },
            "b": { "schema": { "type": ["string", "null"] } }
        }))
        .unwrap();
        let names: Vec<_> = props.keys().cloned().collect();
        assert_eq!(names, vec!["integer-1", "string,null-2"]);
        assert_eq!(props["string,null-2"], json!({ "type": ["string", "null"] }));
    }

    #[test]
    fn description_edit_applies_to_the_fragment_in_place() {
        let mut document = json!({
            "definitions": { "Job": { "type": "object", "properties": {
                "schema": { "type": "string", "description": "inner" }
            } } }
        });
        let props = synthesize_properties(&mut document, &mut AnonymousCounter::new()).unwrap();
        assert_eq!(props["string-1"], json!({ "type": "string" }));
        assert_eq!(
            document["definitions"]["Job"]["properties"]["schema"],
            json!({ "type": "string" })
        );
    }

    #[test]
    fn nested_container_edits_show_in_the_outer_property() {
        let props = synthesize(json!({
            "response": {
                "description": "outer",
                "schema": {
                    "type": "object",
                    "schema": { "$ref": "#/definitions/Tag", "description": "dropped" }
                }
            }
        }))
        .unwrap();
        assert_eq!(props["object-1"]["description"], json!("outer"));
        assert_eq!(
            props["object-1"]["schema"],
            json!({ "$ref": "#/definitions/Tag", "description": "outer" })
        );
        assert_eq!(props["tag"], json!({ "$ref": "#/definitions/Tag", "description": "outer" }));
    }

    #[test]
    fn fragment_without_type_or_ref_aborts() {
        let err = synthesize(json!({ "x": { "schema": { "properties": {} } } })).unwrap_err();
        assert!(err.to_string().contains("each schema that is not a $ref must have a type"));
    }

    #[test]
    fn array_without_item_reference_aborts() {
        let err = synthesize(json!({
            "x": { "schema": { "type": "array", "items": { "type": "string" } } }
        }))
        .unwrap_err();
        assert!(matches!(err, ConversionError::SynthesisError(_)));
    }

    #[test]
    fn message_payload_is_merged_over_message_fields() {
        let messages = json!({
            "UserSignedUp": {
                "title": "User signed up",
                "description": "message level",
                "payload": { "type": "object", "description": "payload level" }
            },
            "Ping": { "payload": "not an object" }
        });
        let props = message_properties(messages.as_object().unwrap());
        assert_eq!(props.len(), 1);
        assert_eq!(
            props["UserSignedUp"],
            json!({ "title": "User signed up", "description": "payload level", "type": "object" })
        );
    }
}
