use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Script template error: {0}")]
    Template(String),

    #[error("Failed to launch script: {0}")]
    Launch(String),

    #[error("Job not found: {0}")]
    JobNotFound(uuid::Uuid),
}

pub type Result<T> = std::result::Result<T, ProvisionError>;
