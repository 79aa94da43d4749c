//! Error types for table construction and insertion.

/// Errors produced by [`ExtendibleHashTable`](crate::ExtendibleHashTable).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Construction parameters were rejected.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// What was wrong with the parameters.
        message: String,
    },

    /// Storing the value would need a directory deeper than the configured limit.
    ///
    /// The table is left untouched apart from splits that already completed,
    /// and the value is not stored.
    #[error("inserting {value} needs global depth above the limit of {max_global_depth}")]
    DepthLimit {
        /// The value that could not be placed.
        value: i64,
        /// The configured maximum global depth.
        max_global_depth: u32,
    },
}

impl Error {
    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
