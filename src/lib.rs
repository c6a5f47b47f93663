//! Convert Swagger 2, OpenAPI 3 and AsyncAPI 2 documents into a single JSON
//! Schema describing the data entities they define.
//!
//! ```no_run
//! use api_to_jsonschema::{Config, build_schema};
//! use serde_json::json;
//!
//! let document = json!({
//!     "openapi": "3.0.0",
//!     "info": { "title": "Widgets", "version": "1.0" },
//!     "components": { "schemas": { "Widget": { "type": "string", "nullable": true } } }
//! });
//!
//! let schema = build_schema(&document, &Config::default()).unwrap();
//! assert_eq!(schema["definitions"]["Widget"]["type"], json!(["string", "null"]));
//! ```

pub mod config;
pub mod converter;
pub mod dialect;
pub mod error;
pub mod nullable;
pub mod properties;
pub mod references;
pub mod schema;
pub mod search;

pub use config::{Config, RefRewrite};
pub use converter::SchemaConverter;
pub use dialect::{Dialect, Metadata, SourceDocument};
pub use error::{ConversionError, Result};
pub use schema::OutputSchema;

use serde_json::Value;

/// Build the JSON Schema for an already decoded API document.
pub fn build_schema(document: &Value, config: &Config) -> Result<Value> {
    let document = SourceDocument::from_value(document.clone(), "input document")?;
    SchemaConverter::new(config.clone()).convert(&document)
}

/// Decode YAML or JSON text into a classified, validated document.
pub fn parse_document(text: &str, origin: &str) -> Result<SourceDocument> {
    SourceDocument::parse(text, origin)
}

/// Parse, convert and pretty-print in one step.
pub fn convert_str(text: &str, origin: &str, config: &Config) -> Result<String> {
    let document = parse_document(text, origin)?;
    SchemaConverter::new(config.clone()).convert_to_string(&document)
}
