use std::io;

use thiserror::Error;

/// Errors raised while fetching, repairing, normalizing or merging draw archives.
#[derive(Debug, Error)]
pub enum LotteryError {
    /// The archive could not be downloaded or is not a readable single-file archive.
    #[error("failed to retrieve archive '{url}': {reason}")]
    Retrieval { url: String, reason: String },

    /// A cell did not parse under the expected date format or number type.
    #[error("cannot parse '{value}' as {expected} ({location})")]
    Format {
        value: String,
        expected: String,
        location: String,
    },

    /// A column the current step needs is absent from the archive.
    #[error("missing column '{column}' in {table}")]
    Schema { column: String, table: String },

    #[error("cannot merge draw tables: {0}")]
    Merge(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("archive store failure: {0}")]
    Store(#[from] rusqlite::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, LotteryError>;

impl LotteryError {
    pub(crate) fn retrieval(url: &str, reason: impl ToString) -> Self {
        Self::Retrieval {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}
