use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConversionError>;

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("Failed to parse API document: {0}")]
    ParseError(String),

    #[error("{origin} is not a Swagger 2, OpenAPI 3 or AsyncAPI 2 document")]
    UnrecognizedDialect { origin: String },

    #[error("The info object is missing in the Swagger YAML")]
    MissingInfo,

    #[error("The title is missing in the Swagger YAML")]
    MissingTitle,

    #[error("The version is missing in the Swagger YAML")]
    MissingVersion,

    #[error("each schema that is not a $ref must have a type: {0}")]
    SynthesisError(String),

    #[error("Could not resolve $refs: {0}")]
    ResolutionError(String),

    #[error("Failed to serialize JSON Schema: {0}")]
    SerializeError(#[from] serde_json::Error),

    #[error("Serialized JSON Schema is not valid UTF-8: {0}")]
    EncodingError(#[from] std::string::FromUtf8Error),
}

impl From<serde_yaml::Error> for ConversionError {
    fn from(err: serde_yaml::Error) -> Self {
        ConversionError::ParseError(err.to_string())
    }
}
