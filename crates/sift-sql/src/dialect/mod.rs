//! SQL dialects.
//!
//! A [`Dialect`] captures the two places where engines disagree for search
//! queries: how a page of rows is selected, and how a column is compared
//! case-insensitively. Each supported engine has one implementation;
//! [`DialectKind`] names them for configuration.

use std::fmt::Debug;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::SearchError;
use crate::param::PageParam;
use crate::value::SqlFragment;

mod mysql;
mod oracle;
mod postgres;
mod sqlite;
mod sqlserver;

pub use mysql::MySqlDialect;
pub use oracle::OracleDialect;
pub use postgres::PostgreSqlDialect;
pub use sqlite::SqliteDialect;
pub use sqlserver::SqlServerDialect;

/// Engine-specific SQL synthesis.
pub trait Dialect: Send + Sync + Debug {
    /// Short engine name, as accepted by [`DialectKind::from_str`].
    fn name(&self) -> &'static str;

    /// Builds the paginated statement from the select clause and the
    /// from/where/group-by text.
    ///
    /// The returned parameters are only the pagination values; they bind after
    /// every parameter of `from_where_sql`, in placeholder order. A page without
    /// `max` yields the plain concatenation and no parameters.
    fn paginate(&self, select_sql: &str, from_where_sql: &str, page: &PageParam) -> SqlFragment;

    /// Wraps a column in the engine's case-insensitive comparison form.
    fn case_fold(&self, column: &str) -> String {
        format!("upper({})", column)
    }
}

/// Identifies a supported engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DialectKind {
    /// MySQL and MariaDB.
    #[default]
    MySql,
    /// PostgreSQL.
    PostgreSql,
    /// Oracle (rownum pagination).
    Oracle,
    /// Microsoft SQL Server 2012 and later.
    SqlServer,
    /// SQLite.
    Sqlite,
}

impl DialectKind {
    /// Every supported engine.
    pub const ALL: [DialectKind; 5] = [
        DialectKind::MySql,
        DialectKind::PostgreSql,
        DialectKind::Oracle,
        DialectKind::SqlServer,
        DialectKind::Sqlite,
    ];

    /// Creates the dialect implementation for this engine.
    pub fn dialect(&self) -> Arc<dyn Dialect> {
        match self {
            DialectKind::MySql => Arc::new(MySqlDialect),
            DialectKind::PostgreSql => Arc::new(PostgreSqlDialect),
            DialectKind::Oracle => Arc::new(OracleDialect),
            DialectKind::SqlServer => Arc::new(SqlServerDialect),
            DialectKind::Sqlite => Arc::new(SqliteDialect),
        }
    }
}

impl std::fmt::Display for DialectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DialectKind::MySql => write!(f, "mysql"),
            DialectKind::PostgreSql => write!(f, "postgresql"),
            DialectKind::Oracle => write!(f, "oracle"),
            DialectKind::SqlServer => write!(f, "sqlserver"),
            DialectKind::Sqlite => write!(f, "sqlite"),
        }
    }
}

impl FromStr for DialectKind {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(DialectKind::MySql),
            "postgresql" | "postgres" | "pg" => Ok(DialectKind::PostgreSql),
            "oracle" => Ok(DialectKind::Oracle),
            "sqlserver" | "mssql" => Ok(DialectKind::SqlServer),
            "sqlite" => Ok(DialectKind::Sqlite),
            _ => Err(SearchError::UnknownDialect {
                name: s.to_string(),
            }),
        }
    }
}
