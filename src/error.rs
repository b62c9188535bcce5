use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum GriddleError {
    #[error("Invalid service response: {0}")]
    InvalidResponse(String),

    #[error("Facet not found: {0}")]
    UnknownFacet(String),

    #[error("No value '{value}' in facet '{facet}'")]
    UnknownValue { facet: String, value: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, GriddleError>;

impl From<serde_json::Error> for GriddleError {
    fn from(e: serde_json::Error) -> Self {
        GriddleError::Json(e.to_string())
    }
}
