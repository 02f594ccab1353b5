use thiserror::Error;

/// Failure to turn imported text into a document.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("line {line}: {message}")]
    Subset { line: usize, message: String },

    #[error("Invalid YAML ({yaml}) and invalid JSON ({json})")]
    Syntax { yaml: String, json: String },

    #[error("Document root must be a mapping, found {0}")]
    NotAMapping(&'static str),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Unknown list: {0}")]
    UnknownList(String),

    #[error("Category index {0} out of bounds")]
    CategoryOutOfBounds(usize),

    #[error("Item index {index} out of bounds for {list}")]
    ItemOutOfBounds { list: String, index: usize },

    #[error("No field named {0}")]
    UnknownField(String),
}

/// Backend round-trip failures, carrying the message shown to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("{0}")]
    Status(String),

    #[error("{0}")]
    Rejected(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}
