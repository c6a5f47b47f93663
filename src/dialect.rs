//! Dialect detection and metadata extraction for source API documents.

use crate::error::{ConversionError, Result};
use serde_json::{Map, Value};
use std::fmt;
use tracing::{debug, warn};

/// Description used when `info.description` is absent.
pub const DEFAULT_DESCRIPTION: &str = "No description provided";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Swagger2,
    OpenApi3,
    AsyncApi2,
}

impl Dialect {
    /// Classify a document by its root marker. `swagger` is checked first,
    /// then `openapi`, then `asyncapi`.
    pub fn detect(document: &Value) -> Option<Dialect> {
        const MARKERS: [(&str, &str, Dialect); 3] = [
            ("swagger", "2", Dialect::Swagger2),
            ("openapi", "3", Dialect::OpenApi3),
            ("asyncapi", "2", Dialect::AsyncApi2),
        ];

        MARKERS.iter().find_map(|(field, major, dialect)| {
            document
                .get(field)
                .and_then(scalar_to_string)
                .filter(|version| version.starts_with(major))
                .map(|_| *dialect)
        })
    }

    /// Path segments of the definitions container in the source document.
    pub fn definitions_path(self) -> &'static [&'static str] {
        match self {
            Dialect::Swagger2 => &["definitions"],
            Dialect::OpenApi3 | Dialect::AsyncApi2 => &["components", "schemas"],
        }
    }

    /// Copy of the definitions container of `tree`, empty when absent.
    pub fn definitions(self, tree: &Value) -> Map<String, Value> {
        lookup(tree, self.definitions_path())
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default()
    }

    /// `components.messages` of `tree` for AsyncAPI, `None` for the others.
    pub fn messages(self, tree: &Value) -> Option<&Map<String, Value>> {
        match self {
            Dialect::AsyncApi2 => {
                lookup(tree, &["components", "messages"]).and_then(Value::as_object)
            }
            Dialect::Swagger2 | Dialect::OpenApi3 => None,
        }
    }

    /// Whether references into `#/components/schemas` must be moved to
    /// `#/definitions`.
    pub fn needs_ref_rewrite(self) -> bool {
        !matches!(self, Dialect::Swagger2)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dialect::Swagger2 => "Swagger 2",
            Dialect::OpenApi3 => "OpenAPI 3",
            Dialect::AsyncApi2 => "AsyncAPI 2",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Metadata {
    pub title: String,
    pub version: String,
    pub description: Option<String>,
}

impl Metadata {
    /// Validate and read the `info` object.
    pub fn extract(document: &Value) -> Result<Self> {
        let info = document.get("info").ok_or(ConversionError::MissingInfo)?;
        let title = info
            .get("title")
            .and_then(scalar_to_string)
            .ok_or(ConversionError::MissingTitle)?;
        let version = info
            .get("version")
            .and_then(scalar_to_string)
            .ok_or(ConversionError::MissingVersion)?;
        let description = info.get("description").and_then(scalar_to_string);

        if description.is_none() {
            warn!("The description is missing in the Swagger YAML, using a placeholder");
        }

        Ok(Self {
            title,
            version,
            description,
        })
    }

    pub fn description_or_default(&self) -> &str {
        self.description.as_deref().unwrap_or(DEFAULT_DESCRIPTION)
    }
}

/// A parsed, classified and validated API document.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    dialect: Dialect,
    metadata: Metadata,
    tree: Value,
}

impl SourceDocument {
    /// Decode YAML or JSON text and classify it. `origin` names the input in
    /// error messages.
    pub fn parse(text: &str, origin: &str) -> Result<Self> {
        let tree: Value = serde_yaml::from_str(text)?;
        Self::from_value(tree, origin)
    }

    pub fn from_value(tree: Value, origin: &str) -> Result<Self> {
        let dialect = Dialect::detect(&tree).ok_or_else(|| ConversionError::UnrecognizedDialect {
            origin: origin.to_string(),
        })?;
        let metadata = Metadata::extract(&tree)?;
        debug!(origin, %dialect, title = %metadata.title, "classified API document");

        Ok(Self {
            dialect,
            metadata,
            tree,
        })
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn tree(&self) -> &Value {
        &self.tree
    }

    /// The definitions container, empty when the document declares none.
    pub fn definitions(&self) -> Map<String, Value> {
        self.dialect.definitions(&self.tree)
    }

    /// `components.messages` for AsyncAPI documents, `None` for the others.
    pub fn messages(&self) -> Option<&Map<String, Value>> {
        self.dialect.messages(&self.tree)
    }
}

fn lookup<'a>(tree: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(tree, |node, segment| node.get(segment))
}

/// Strings as-is; YAML numbers and booleans in their textual form.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
