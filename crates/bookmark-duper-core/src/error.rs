use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Bookmarks file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The bookmark tree could not be read. Terminal for the current scan.
    #[error("Failed to read bookmark tree: {0}")]
    Retrieval(String),

    /// A single removal request failed. Counted by the deletion executor,
    /// never propagated out of a deletion run.
    #[error("Failed to remove item {id}: {reason}")]
    ItemRemoval { id: String, reason: String },

    #[error("{0}")]
    Other(String),
}

impl Error {
    pub fn removal(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::ItemRemoval {
            id: id.into(),
            reason: reason.into(),
        }
    }
}
