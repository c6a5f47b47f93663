//! Key search over an arbitrary `serde_json::Value` tree.
//!
//! Objects are reported in pre-order: a matching object comes before any
//! matching object nested inside it, and siblings keep their container's
//! order. Traversal uses an explicit stack so deep documents do not exhaust
//! the call stack.

use serde_json::{Map, Value};

/// Collect every object in `tree` that has `key` as one of its own keys,
/// together with its JSON pointer from the root of `tree`.
pub fn find_objects_with_key<'a>(
    tree: &'a Value,
    key: &str,
) -> Vec<(String, &'a Map<String, Value>)> {
    let mut found = Vec::new();
    let mut stack = vec![(String::new(), tree)];

    while let Some((pointer, node)) = stack.pop() {
        match node {
            Value::Object(map) => {
                stack.extend(
                    map.iter()
                        .rev()
                        .map(|(k, v)| (format!("{}/{}", pointer, escape_token(k)), v)),
                );
                if map.contains_key(key) {
                    found.push((pointer, map));
                }
            }
            Value::Array(items) => stack.extend(
                items
                    .iter()
                    .enumerate()
                    .rev()
                    .map(|(i, v)| (format!("{}/{}", pointer, i), v)),
            ),
            _ => {}
        }
    }

    found
}

/// Escape a key for use as a JSON pointer reference token.
fn escape_token(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}

/// Visit every object in `tree` that has `key`, allowing it to be rewritten.
///
/// The visitor runs before the object's children are searched, so changes it
/// makes to the object's own values are what gets traversed.
pub fn visit_objects_with_key_mut<F>(tree: &mut Value, key: &str, mut visit: F)
where
    F: FnMut(&mut Map<String, Value>),
{
    let mut stack = vec![tree];

    while let Some(node) = stack.pop() {
        match node {
            Value::Object(map) => {
                if map.contains_key(key) {
                    visit(map);
                }
                stack.extend(map.values_mut().rev());
            }
            Value::Array(items) => stack.extend(items.iter_mut().rev()),
            _ => {}
        }
    }
}
