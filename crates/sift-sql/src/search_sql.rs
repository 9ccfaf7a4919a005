//! Resolution output.

use serde::Serialize;

use crate::value::SqlValue;

/// The statements produced for one request.
///
/// List and cluster parameters are independent: each binds positionally,
/// 1-indexed in array order, to its own statement. Result columns map back
/// through the alias strings verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchSql {
    /// The paginated list statement, when the list was requested.
    pub list_sql: Option<String>,
    /// Bound values of the list statement.
    pub list_params: Vec<SqlValue>,
    /// Aliases of the selected columns, in field order.
    pub list_aliases: Vec<String>,
    /// The count/sum statement, when a total or summaries were requested.
    pub cluster_sql: Option<String>,
    /// Bound values of the cluster statement.
    pub cluster_params: Vec<SqlValue>,
    /// Alias of the total count column.
    pub count_alias: Option<String>,
    /// Aliases of the sum columns, parallel to the requested summary fields.
    pub summary_aliases: Vec<String>,
    /// Whether the list statement should be executed.
    pub should_query_list: bool,
    /// Whether the cluster statement should be executed.
    pub should_query_cluster: bool,
}

impl SearchSql {
    /// Whether a total count is computed by the cluster statement.
    pub fn should_query_total(&self) -> bool {
        self.count_alias.is_some()
    }
}
