use thiserror::Error;

/// Main error type for KGrag
#[derive(Error, Debug)]
pub enum KgragError {
    /// Traversal mode outside {bidirectional, outgoing, ingoing}
    #[error("Invalid mode: {0}")]
    InvalidMode(String),

    /// Graph construction referenced a concept missing from the index
    #[error("Unknown concept: {0}")]
    UnknownConcept(String),

    /// Graph construction referenced a relation missing from the index
    #[error("Unknown relation: {0}")]
    UnknownRelation(String),

    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Triple extraction API errors
    #[error("Extraction API error: {0}")]
    Extraction(String),

    /// Parse errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Convenient Result type using KgragError
pub type Result<T> = std::result::Result<T, KgragError>;
