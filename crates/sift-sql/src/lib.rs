//! Sift search-to-SQL resolution
//!
//! This crate compiles a declarative per-entity search request into
//! dialect-correct SQL with positionally bound parameters. Given entity
//! [`Metadata`] (fields, select expressions, table, join condition, group-by,
//! distinct flag) and a [`SearchParam`] (filters, order, page, fetch
//! directives), the [`SqlResolver`] produces a [`SearchSql`] holding a
//! paginated list statement and an optional count/sum ("cluster") statement.
//!
//! # Features
//!
//! - **Thirteen filter operators**: comparisons, `like` variants, open-ended
//!   ranges, null checks and multi-value alternation, optionally case-folded
//! - **Five dialects**: MySQL, PostgreSQL, Oracle, SQL Server, SQLite
//! - **Embedded parameters**: `:name` binds a value, `:name:` splices one
//! - **Aggregates**: totals and per-field sums, safe over distinct and
//!   grouped queries
//! - **Date correction**: day-precision date ranges widen to whole days
//!
//! # Architecture
//!
//! - [`snippet`] - Parametrized SQL snippets and their resolution
//! - [`alias`] - Collision-free alias generation
//! - [`metadata`] - Entity search metadata
//! - [`param`] - Request parameters
//! - [`filter`] - Field predicate compilation
//! - [`correct`] - Value correction for temporal fields
//! - [`dialect`] - Engine-specific pagination and case folding
//! - [`pagination`] - Page-number and offset request strategies
//! - [`resolver`] - The orchestrating resolver
//! - [`search_sql`] - Resolution output
//! - [`error`] - Error types
//!
//! # Quick Start
//!
//! ```
//! use sift_sql::{
//!     FetchType, FieldMeta, FieldParam, FieldType, Metadata, Operator, PageParam, SearchParam,
//!     SqlResolver, SqlValue,
//! };
//!
//! let metadata = Metadata::builder("t")
//!     .field("id", FieldMeta::select("t.id", FieldType::Long))
//!     .field("name", FieldMeta::select("t.name", FieldType::Text))
//!     .build()
//!     .unwrap();
//!
//! let param = SearchParam::new(FetchType::list_only())
//!     .with_field_param(FieldParam::new("name", Operator::Include, vec![SqlValue::text("jo")]))
//!     .with_page(PageParam::new(0, 10));
//!
//! let sql = SqlResolver::default().resolve(&metadata, &param).unwrap();
//! assert_eq!(
//!     sql.list_sql.as_deref(),
//!     Some("select t.id id, t.name name from t where t.name like ? limit ?, ?")
//! );
//! ```

#![warn(missing_docs)]

pub mod alias;
pub mod correct;
pub mod dialect;
pub mod error;
pub mod filter;
pub mod metadata;
pub mod pagination;
pub mod param;
pub mod resolver;
pub mod search_sql;
pub mod snippet;
pub mod value;

pub use correct::{DateValueCorrector, PassThrough, ValueCorrector};
pub use dialect::{Dialect, DialectKind};
pub use error::{SearchError, SearchResult};
pub use metadata::{FieldMeta, FieldType, Metadata, MetadataBuilder};
pub use pagination::{Pagination, PaginationKind};
pub use param::{FetchType, FieldParam, Operator, Order, OrderParam, PageParam, SearchParam};
pub use resolver::SqlResolver;
pub use search_sql::SearchSql;
pub use snippet::{ParamLookup, SqlSnippet};
pub use value::{SqlFragment, SqlValue};
