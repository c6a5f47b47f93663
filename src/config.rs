use serde::{Deserialize, Serialize};

/// Meta-schema written to `$schema` when nothing else is configured.
pub const DRAFT_07: &str = "http://json-schema.org/draft-07/schema#";

/// How `#/components/schemas` references are moved to `#/definitions`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RefRewrite {
    /// Substitute the prefix everywhere in the serialized document.
    #[default]
    Text,
    /// Only rewrite `$ref` string values that start with the prefix.
    Structural,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub schema: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub resolve_refs: bool,

    pub additional_properties: bool,

    pub indent: usize,

    pub ref_rewrite: RefRewrite,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema: DRAFT_07.to_string(),
            id: None,
            resolve_refs: false,
            additional_properties: false,
            indent: 2,
            ref_rewrite: RefRewrite::default(),
        }
    }
}

impl Config {
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = schema.into();
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_resolve_refs(mut self, resolve_refs: bool) -> Self {
        self.resolve_refs = resolve_refs;
        self
    }

    pub fn with_additional_properties(mut self, additional_properties: bool) -> Self {
        self.additional_properties = additional_properties;
        self
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_ref_rewrite(mut self, ref_rewrite: RefRewrite) -> Self {
        self.ref_rewrite = ref_rewrite;
        self
    }

    /// The `$id` to emit, if any. An empty id counts as unset.
    pub fn schema_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_draft_07_without_id() {
        let config = Config::default();
        assert_eq!(config.schema, DRAFT_07);
        assert_eq!(config.schema_id(), None);
        assert!(!config.resolve_refs);
        assert!(!config.additional_properties);
        assert_eq!(config.ref_rewrite, RefRewrite::Text);
    }

    #[test]
    fn empty_id_is_treated_as_unset() {
        let config = Config::default().with_id("");
        assert_eq!(config.schema_id(), None);
    }

    #[test]
    fn partial_config_fills_in_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"resolveRefs": true, "refRewrite": "structural"}"#).unwrap();
        assert!(config.resolve_refs);
        assert_eq!(config.ref_rewrite, RefRewrite::Structural);
        assert_eq!(config.schema, DRAFT_07);
        assert_eq!(config.indent, 2);
    }
}
