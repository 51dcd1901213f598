use thiserror::Error;

#[derive(Debug, Error)]
pub enum SaferError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Evidence source error: {0}")]
    Source(String),

    #[error("Invalid ChEMBL ID format: '{0}'. Expected CHEMBL followed by digits (e.g. CHEMBL25)")]
    InvalidDrugId(String),

    #[error("Drug not found: {0}")]
    DrugNotFound(String),

    #[error("Request blocked by sandbox: {0}")]
    Security(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Query cancelled for {0}")]
    Cancelled(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, SaferError>;
