//! Oracle dialect.
//!
//! Pagination wraps the statement twice around `rownum`: the inner wrapper
//! caps rows at `offset + max`, the outer one drops the first `offset`.

use crate::param::PageParam;
use crate::value::{SqlFragment, SqlValue};

use super::Dialect;

/// Oracle: rownum-bounded subqueries binding `offset + max` then `offset`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OracleDialect;

impl Dialect for OracleDialect {
    fn name(&self) -> &'static str {
        "oracle"
    }

    fn paginate(&self, select_sql: &str, from_where_sql: &str, page: &PageParam) -> SqlFragment {
        let sql = format!("{}{}", select_sql, from_where_sql);
        let Some(max) = page.max else {
            return SqlFragment::new(sql);
        };
        SqlFragment::with_params(
            format!(
                "select * from (select row_.*, rownum rownum_ from ({}) row_ where rownum <= ?) table_ where table_.rownum_ > ?",
                sql
            ),
            vec![
                SqlValue::count(page.offset.saturating_add(max)),
                SqlValue::count(page.offset),
            ],
        )
    }
}
