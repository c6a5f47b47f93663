use crate::config::Config;
use crate::dialect::SourceDocument;
use crate::error::Result;
use crate::nullable::normalize_nullable;
use crate::properties::{AnonymousCounter, message_properties, synthesize_properties};
use crate::references::{dereference, rewrite_component_refs};
use crate::schema::{OutputSchema, SCHEMA_VERSION};
use serde_json::Value;
use tracing::debug;

pub struct SchemaConverter {
    config: Config,
}

impl SchemaConverter {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Assemble the JSON Schema for an already classified document.
    ///
    /// The steps run in a fixed order: the reference rewrite works on the
    /// fully assembled schema and must precede dereferencing.
    pub fn convert(&self, document: &SourceDocument) -> Result<Value> {
        let metadata = document.metadata();
        let mut output = OutputSchema::skeleton(
            &self.config.schema,
            self.config.schema_id(),
            &metadata.title,
            &metadata.version,
            metadata.description_or_default(),
            self.config.additional_properties,
        );

        // Description edits made while naming fragments land in this copy,
        // which then supplies the messages and definitions as well.
        let mut tree = document.tree().clone();
        let dialect = document.dialect();
        let mut counter = AnonymousCounter::new();
        let synthesized = synthesize_properties(&mut tree, &mut counter)?;

        if let Some(messages) = dialect.messages(&tree) {
            output.properties.extend(message_properties(messages));
        }
        output.properties.extend(synthesized);
        debug!(count = output.properties.len(), "collected properties");

        output.definitions = dialect.definitions(&tree);
        output.required = vec![SCHEMA_VERSION.to_string()];

        let mut schema = serde_json::to_value(output)?;
        let rewritten = normalize_nullable(&mut schema["definitions"])
            + normalize_nullable(&mut schema["properties"]);
        debug!(rewritten, "normalized nullable fragments");

        if dialect.needs_ref_rewrite() {
            schema = rewrite_component_refs(schema, self.config.ref_rewrite)?;
        }

        if self.config.resolve_refs {
            schema = dereference(&schema)?;
            debug!("dereferenced schema");
        }

        Ok(schema)
    }

    /// Assemble and pretty-print with the configured indent.
    pub fn convert_to_string(&self, document: &SourceDocument) -> Result<String> {
        let schema = self.convert(document)?;
        to_pretty_string(&schema, self.config.indent)
    }
}

fn to_pretty_string(value: &Value, indent: usize) -> Result<String> {
    use serde::Serialize;

    let indent = " ".repeat(indent);
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8(buffer)?)
}
