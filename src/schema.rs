use serde::Serialize;
use serde_json::{Map, Value, json};

/// Name of the property every generated schema requires.
pub const SCHEMA_VERSION: &str = "schemaVersion";

/// The assembled JSON Schema. Fields serialize in declaration order.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OutputSchema {
    #[serde(rename = "$schema")]
    pub schema: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(rename = "$id")]
    pub id: Option<String>,

    pub title: String,

    pub version: String,

    pub description: String,

    pub additional_properties: bool,

    pub properties: Map<String, Value>,

    pub required: Vec<String>,

    pub definitions: Map<String, Value>,
}

impl OutputSchema {
    /// A schema with only the mandatory `schemaVersion` property.
    pub fn skeleton(
        schema: &str,
        id: Option<&str>,
        title: &str,
        version: &str,
        description: &str,
        additional_properties: bool,
    ) -> Self {
        let mut properties = Map::new();
        properties.insert(SCHEMA_VERSION.to_string(), json!({ "type": "string" }));

        Self {
            schema: schema.to_string(),
            id: id.map(str::to_string),
            title: title.to_string(),
            version: version.to_string(),
            description: description.to_string(),
            additional_properties,
            properties,
            required: Vec::new(),
            definitions: Map::new(),
        }
    }
}
