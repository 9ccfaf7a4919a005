//! Error types for search SQL resolution.
//!
//! Resolution itself is deterministic computation, so the only errors are
//! configuration problems: metadata that cannot describe a valid query, a
//! request that references something the metadata does not map, or a named
//! collaborator (dialect, pagination strategy, operator) that does not exist.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// Result alias used throughout the crate.
pub type SearchResult<T> = Result<T, SearchError>;

/// The error type for every fallible operation in this crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// A summary (sum) was requested on a field with no database column.
    #[error("summary field '{field}' is not mapped to a database column")]
    UnmappedSummaryField { field: String },

    /// A filter names a field with no database column.
    #[error("filter field '{field}' is not mapped to a database column")]
    UnmappedFilterField { field: String },

    /// The metadata builder rejected its input.
    #[error("invalid metadata: {message}")]
    InvalidMetadata { message: String },

    /// The dialect name is not one of the supported engines.
    #[error("unknown dialect '{name}', expected one of mysql, postgresql, oracle, sqlserver, sqlite")]
    UnknownDialect { name: String },

    /// The operator name does not parse.
    #[error("unknown operator '{operator}'")]
    UnknownOperator { operator: String },

    /// The pagination type is not `page` or `offset`.
    #[error("unknown pagination type '{name}', expected page or offset")]
    UnknownPagination { name: String },
}

impl SearchError {
    /// Creates an [`SearchError::InvalidMetadata`] error.
    pub fn invalid_metadata(message: impl Into<String>) -> Self {
        SearchError::InvalidMetadata {
            message: message.into(),
        }
    }

    /// Returns true for errors caused by entity metadata or a request that the
    /// metadata cannot serve, as opposed to an unknown collaborator name.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SearchError::UnmappedSummaryField { .. }
                | SearchError::UnmappedFilterField { .. }
                | SearchError::InvalidMetadata { .. }
        )
    }
}
