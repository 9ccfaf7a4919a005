//! Request pagination strategies.
//!
//! Requests express pagination either as a page number and size, or as a row
//! offset and maximum. A [`Pagination`] turns either form into the
//! [`PageParam`] the dialects consume.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SearchError;
use crate::param::PageParam;

/// Strategy name, as configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaginationKind {
    /// Page number and page size.
    #[default]
    Page,
    /// Row offset and maximum row count.
    Offset,
}

impl FromStr for PaginationKind {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "page" => Ok(PaginationKind::Page),
            "offset" => Ok(PaginationKind::Offset),
            _ => Err(SearchError::UnknownPagination {
                name: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for PaginationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaginationKind::Page => write!(f, "page"),
            PaginationKind::Offset => write!(f, "offset"),
        }
    }
}

/// A configured pagination strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pagination {
    /// `(page, size)`: offset is `(page - start) * size`.
    PageNum {
        /// Number of the first page (usually 0 or 1).
        start: u64,
        /// Upper clamp on the page size.
        max_allowed_size: u64,
        /// Page size when the request has none.
        default_size: u64,
    },
    /// `(offset, max)`: offset is `offset - start`.
    MaxOffset {
        /// The first offset.
        start: u64,
        /// Upper clamp on the row count.
        max_allowed_size: u64,
        /// Row count when the request has none.
        default_size: u64,
    },
}

impl Default for Pagination {
    fn default() -> Self {
        Pagination::PageNum {
            start: 0,
            max_allowed_size: 100,
            default_size: 15,
        }
    }
}

impl Pagination {
    /// Creates the strategy named by `kind`.
    pub fn new(kind: PaginationKind, start: u64, max_allowed_size: u64, default_size: u64) -> Self {
        match kind {
            PaginationKind::Page => Pagination::PageNum {
                start,
                max_allowed_size,
                default_size,
            },
            PaginationKind::Offset => Pagination::MaxOffset {
                start,
                max_allowed_size,
                default_size,
            },
        }
    }

    /// The strategy kind.
    pub fn kind(&self) -> PaginationKind {
        match self {
            Pagination::PageNum { .. } => PaginationKind::Page,
            Pagination::MaxOffset { .. } => PaginationKind::Offset,
        }
    }

    /// Maps the request's position (page number or offset) and size to a page.
    ///
    /// An absent position means the first page; an absent size uses the
    /// default; sizes are clamped to the allowed maximum.
    pub fn page(&self, position: Option<u64>, size: Option<u64>) -> PageParam {
        match *self {
            Pagination::PageNum {
                start,
                max_allowed_size,
                default_size,
            } => {
                let size = size.unwrap_or(default_size).min(max_allowed_size);
                let page = position.unwrap_or(start).saturating_sub(start);
                PageParam::new(page.saturating_mul(size), size)
            }
            Pagination::MaxOffset {
                start,
                max_allowed_size,
                default_size,
            } => {
                let size = size.unwrap_or(default_size).min(max_allowed_size);
                let offset = position.unwrap_or(start).saturating_sub(start);
                PageParam::new(offset, size)
            }
        }
    }
}
