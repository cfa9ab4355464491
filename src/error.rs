use thiserror::Error;

#[derive(Error, Debug)]
pub enum ValidatorError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no projects to validate")]
    EmptyBatch,

    #[error("registry error: {0}")]
    Registry(String),
}

pub type Result<T> = std::result::Result<T, ValidatorError>;
