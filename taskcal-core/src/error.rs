//! Error types for taskcal.

use thiserror::Error;

/// Errors that can occur while building calendar feeds.
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Invalid date '{0}'")]
    InvalidDate(String),

    #[error("Invalid deadline on CSV row {row}: '{value}'")]
    InvalidDeadline { row: usize, value: String },

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error(
        "Row {0} has a deadline but no section was declared before it; \
         provide a section name"
    )]
    MissingSection(usize),

    #[error("Section name '{0}' contains no letters or digits")]
    EmptySectionName(String),

    #[error("ICS parse error: {0}")]
    IcsParse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for taskcal operations.
pub type FeedResult<T> = Result<T, FeedError>;
