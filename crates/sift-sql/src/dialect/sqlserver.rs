//! SQL Server dialect.

use crate::param::PageParam;
use crate::value::{SqlFragment, SqlValue};

use super::Dialect;

/// SQL Server 2012+: `offset ? rows fetch next ? rows only`.
///
/// SQL Server requires an `order by` before `offset`; requests paginating
/// without an order must supply one through the metadata or the request.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlServerDialect;

impl Dialect for SqlServerDialect {
    fn name(&self) -> &'static str {
        "sqlserver"
    }

    fn paginate(&self, select_sql: &str, from_where_sql: &str, page: &PageParam) -> SqlFragment {
        let sql = format!("{}{}", select_sql, from_where_sql);
        match page.max {
            Some(max) => SqlFragment::with_params(
                format!("{} offset ? rows fetch next ? rows only", sql),
                vec![SqlValue::count(page.offset), SqlValue::count(max)],
            ),
            None => SqlFragment::new(sql),
        }
    }
}
