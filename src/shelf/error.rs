use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShelfError {
    #[error("No {kind} matches \"{term}\"")]
    NotFound { kind: &'static str, term: String },

    #[error("A {kind} with {field} \"{value}\" already exists")]
    Uniqueness {
        kind: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("\"{field}\" is not an editable field of {kind}")]
    InvalidField { kind: &'static str, field: String },

    #[error("Invalid {field} \"{value}\": {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl ShelfError {
    pub fn not_found(kind: &'static str, term: impl Into<String>) -> Self {
        ShelfError::NotFound {
            kind,
            term: term.into(),
        }
    }

    pub fn invalid_value(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        ShelfError::InvalidValue {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ShelfError>;
