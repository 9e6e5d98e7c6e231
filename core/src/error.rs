use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenError {
    #[error("Configuration error: {reason}")]
    Config { reason: String },

    #[error("Cannot create output directory '{path}': {source}")]
    OutputRoot {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GenError {
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config { reason: reason.into() }
    }
}

pub type GenResult<T> = Result<T, GenError>;
