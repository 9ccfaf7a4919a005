//! PostgreSQL dialect.

use crate::param::PageParam;
use crate::value::{SqlFragment, SqlValue};

use super::Dialect;

/// Emits `limit ? offset ?`, shared with SQLite.
pub(super) fn limit_offset(select_sql: &str, from_where_sql: &str, page: &PageParam) -> SqlFragment {
    let sql = format!("{}{}", select_sql, from_where_sql);
    match page.max {
        Some(max) => SqlFragment::with_params(
            format!("{} limit ? offset ?", sql),
            vec![SqlValue::count(max), SqlValue::count(page.offset)],
        ),
        None => SqlFragment::new(sql),
    }
}

/// PostgreSQL: `limit ? offset ?` binding row count then offset.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgreSqlDialect;

impl Dialect for PostgreSqlDialect {
    fn name(&self) -> &'static str {
        "postgresql"
    }

    fn paginate(&self, select_sql: &str, from_where_sql: &str, page: &PageParam) -> SqlFragment {
        limit_offset(select_sql, from_where_sql, page)
    }
}
