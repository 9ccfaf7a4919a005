//! SQLite dialect.

use crate::param::PageParam;
use crate::value::SqlFragment;

use super::Dialect;
use super::postgres::limit_offset;

/// SQLite: same `limit ? offset ?` shape as PostgreSQL.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDialect;

impl Dialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn paginate(&self, select_sql: &str, from_where_sql: &str, page: &PageParam) -> SqlFragment {
        limit_offset(select_sql, from_where_sql, page)
    }
}
