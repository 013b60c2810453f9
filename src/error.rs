#[derive(thiserror::Error, Debug)]
pub enum LedgerError {
    #[error("{0}")]
    InvalidArgument(String),
    #[error("Failed to get state for {0}")]
    NotFound(String),
    #[error("Stored value under {key} is not valid JSON: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to encode value: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("State store failure: {0}")]
    Store(#[from] sled::Error),
    #[error("{0}")]
    Unrecognized(String),
}

pub type Result<T> = std::result::Result<T, LedgerError>;

impl LedgerError {
    pub(crate) fn argument_count(expected: usize) -> Self {
        Self::InvalidArgument(format!(
            "Incorrect number of arguments. Expecting {expected}"
        ))
    }
}
