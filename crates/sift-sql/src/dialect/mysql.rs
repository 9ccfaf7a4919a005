//! MySQL dialect.

use crate::param::PageParam;
use crate::value::{SqlFragment, SqlValue};

use super::Dialect;

/// MySQL and MariaDB: `limit ?, ?` binding offset then row count.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlDialect;

impl Dialect for MySqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn paginate(&self, select_sql: &str, from_where_sql: &str, page: &PageParam) -> SqlFragment {
        let sql = format!("{}{}", select_sql, from_where_sql);
        match page.max {
            Some(max) => SqlFragment::with_params(
                format!("{} limit ?, ?", sql),
                vec![SqlValue::count(page.offset), SqlValue::count(max)],
            ),
            None => SqlFragment::new(sql),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_binds_offset_first() {
        let fragment = MySqlDialect.paginate("select t.id id", " from t", &PageParam::new(20, 10));
        assert_eq!(fragment.sql, "select t.id id from t limit ?, ?");
        assert_eq!(fragment.params, vec![SqlValue::Integer(20), SqlValue::Integer(10)]);
    }

    #[test]
    fn test_unbounded_page() {
        let fragment = MySqlDialect.paginate("select 1", " from t", &PageParam::unbounded());
        assert_eq!(fragment.sql, "select 1 from t");
        assert!(fragment.params.is_empty());
    }
}
