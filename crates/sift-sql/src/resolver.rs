//! The SQL resolver.
//!
//! [`SqlResolver::resolve`] turns [`Metadata`] and a [`SearchParam`] into a
//! [`SearchSql`]: a paginated list statement and an optional cluster
//! (count/sum) statement, each with its own bound parameters.
//!
//! Assembly runs in a fixed order: select clause, from/where clause, group-by,
//! the cluster statement, then ordering and pagination of the list statement.
//! Bound values are collected in a [`ParamLists`] accumulator that every step
//! appends to explicitly. Join conditions, filters and group-by values restrict
//! both statements and go to both lists; select-level values reach the cluster
//! list only for distinct queries, whose cluster statement wraps the full list
//! query as a subquery.

use std::sync::Arc;

use crate::alias;
use crate::correct::{DateValueCorrector, ValueCorrector};
use crate::dialect::{Dialect, MySqlDialect};
use crate::error::{SearchError, SearchResult};
use crate::filter::FilterCompiler;
use crate::metadata::Metadata;
use crate::param::{FetchType, SearchParam};
use crate::search_sql::SearchSql;
use crate::snippet::resolve;
use crate::value::{SqlFragment, SqlValue};

/// Bound values of the list and cluster statements, collected side by side.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamLists {
    /// Values of the list statement.
    pub list: Vec<SqlValue>,
    /// Values of the cluster statement.
    pub cluster: Vec<SqlValue>,
}

impl ParamLists {
    /// Appends values that bind in both statements.
    pub fn push_both(&mut self, params: Vec<SqlValue>) {
        self.cluster.extend(params.iter().cloned());
        self.list.extend(params);
    }

    /// Appends values that bind in the list statement only.
    pub fn push_list(&mut self, params: Vec<SqlValue>) {
        self.list.extend(params);
    }
}

/// The aggregate part of a cluster statement.
#[derive(Debug)]
struct Cluster {
    sql: String,
    count_alias: Option<String>,
    summary_aliases: Vec<String>,
}

/// Allocates aggregate aliases against a probe text that grows with every
/// allocation, so generated aliases are unique among themselves too.
struct AliasProbe {
    text: String,
}

impl AliasProbe {
    fn new(existing: &str) -> Self {
        Self {
            text: existing.to_string(),
        }
    }

    fn claim(&mut self, alias: String) -> String {
        self.text.push(' ');
        self.text.push_str(&alias);
        alias
    }

    fn column(&mut self, seed: &str) -> String {
        let alias = alias::column_alias(seed, &self.text);
        self.claim(alias)
    }

    fn table(&mut self) -> String {
        let alias = alias::table_alias(&self.text);
        self.claim(alias)
    }
}

/// Resolves search requests to SQL for one dialect.
///
/// Holds no per-request state; one instance can serve any number of
/// concurrent resolutions.
#[derive(Debug, Clone)]
pub struct SqlResolver {
    dialect: Arc<dyn Dialect>,
    corrector: Arc<dyn ValueCorrector>,
}

impl Default for SqlResolver {
    fn default() -> Self {
        Self::new(Arc::new(MySqlDialect), Arc::new(DateValueCorrector))
    }
}

impl SqlResolver {
    /// Creates a resolver.
    pub fn new(dialect: Arc<dyn Dialect>, corrector: Arc<dyn ValueCorrector>) -> Self {
        Self { dialect, corrector }
    }

    /// Resolves `param` against `metadata`.
    ///
    /// # Errors
    ///
    /// [`SearchError::UnmappedFilterField`] when a filter names a field without
    /// a database column, and [`SearchError::UnmappedSummaryField`] when a sum is
    /// requested on one. No partial output is returned.
    pub fn resolve(&self, metadata: &Metadata, param: &SearchParam) -> SearchResult<SearchSql> {
        let fetch = &param.fetch;
        let distinct = metadata.is_distinct();
        let mut lists = ParamLists::default();

        // select
        let mut columns = Vec::new();
        let mut list_aliases = Vec::new();
        for field in metadata.field_names() {
            let Some(snippet) = metadata.select_snippet(field) else {
                continue;
            };
            let alias = metadata.alias(field).unwrap_or(field.as_str()).to_string();
            let expr = resolve(snippet, param);
            columns.push(format!("{} {}", expr.sql, alias));
            if distinct {
                lists.push_both(expr.params);
            } else {
                lists.push_list(expr.params);
            }
            list_aliases.push(alias);
        }
        let select_sql = format!(
            "select {}{}",
            if distinct { "distinct " } else { "" },
            columns.join(", ")
        );

        // from / where
        let table = resolve(metadata.table(), param);
        let mut from_where = format!(" from {}", table.sql);
        lists.push_both(table.params);

        let mut conjuncts = Vec::new();
        if let Some(join_cond) = metadata.join_cond() {
            let cond = resolve(join_cond, param);
            conjuncts.push(SqlFragment::with_params(format!("({})", cond.sql), cond.params));
        }
        let compiler = FilterCompiler::new(self.dialect.as_ref(), self.corrector.as_ref());
        for field_param in &param.field_params {
            let column = metadata.column(&field_param.name).ok_or_else(|| {
                SearchError::UnmappedFilterField {
                    field: field_param.name.clone(),
                }
            })?;
            let field_type = metadata.field_type(&field_param.name).unwrap_or_default();
            if let Some(fragment) = compiler.compile(
                field_type,
                column,
                field_param.operator,
                &field_param.values,
                field_param.ignore_case,
            ) {
                conjuncts.push(fragment);
            }
        }
        if !conjuncts.is_empty() {
            let condition = SqlFragment::join(conjuncts, " and ");
            from_where.push_str(" where ");
            from_where.push_str(&condition.sql);
            lists.push_both(condition.params);
        }

        if let Some(group_by) = metadata.group_by() {
            let group = resolve(group_by, param);
            from_where.push_str(" group by ");
            from_where.push_str(&group.sql);
            lists.push_both(group.params);
        }

        let mut search_sql = SearchSql {
            should_query_list: fetch.list,
            should_query_cluster: fetch.should_query_cluster(),
            ..Default::default()
        };

        if fetch.should_query_cluster() {
            let cluster = cluster_statement(metadata, fetch, &select_sql, &from_where)?;
            search_sql.cluster_sql = Some(cluster.sql);
            search_sql.cluster_params = lists.cluster;
            search_sql.count_alias = cluster.count_alias;
            search_sql.summary_aliases = cluster.summary_aliases;
        }

        if fetch.list {
            let mut list_from = from_where;
            if let Some(order) = &param.order {
                let sort_alias = metadata
                    .select_snippet(&order.sort)
                    .and_then(|_| metadata.alias(&order.sort));
                match sort_alias {
                    Some(sort_alias) => {
                        list_from.push_str(" order by ");
                        list_from.push_str(sort_alias);
                        if let Some(direction) = order.order {
                            list_from.push(' ');
                            list_from.push_str(&direction.to_string());
                        }
                    }
                    None => {
                        tracing::debug!(sort = %order.sort, "sort field is not selected, ordering ignored");
                    }
                }
            }
            let page = self.dialect.paginate(&select_sql, &list_from, &param.page);
            lists.list.extend(page.params);
            search_sql.list_sql = Some(page.sql);
            search_sql.list_params = lists.list;
            search_sql.list_aliases = list_aliases;
        }

        tracing::debug!(
            dialect = self.dialect.name(),
            list_sql = ?search_sql.list_sql,
            list_params = ?search_sql.list_params,
            cluster_sql = ?search_sql.cluster_sql,
            cluster_params = ?search_sql.cluster_params,
            "resolved search sql"
        );
        Ok(search_sql)
    }
}

fn summary_column<'m>(metadata: &'m Metadata, field: &str) -> SearchResult<&'m str> {
    metadata
        .column(field)
        .ok_or_else(|| SearchError::UnmappedSummaryField {
            field: field.to_string(),
        })
}

/// Builds the count/sum statement.
///
/// - distinct: `select <aggs> from (<select><from-where>) <tbl>`, summing each
///   field's column. The column must be visible in the subquery's select list.
/// - grouped: `select <aggs> from (select <inner><from-where>) <tbl>`, where
///   the inner query sums per group and the outer one counts groups and sums
///   the per-group sums.
/// - otherwise: `select <aggs><from-where>`.
fn cluster_statement(
    metadata: &Metadata,
    fetch: &FetchType,
    select_sql: &str,
    from_where: &str,
) -> SearchResult<Cluster> {
    let mut count_alias = None;
    let mut summary_aliases = Vec::new();
    let mut outer = Vec::new();

    if metadata.is_distinct() {
        let original = format!("{}{}", select_sql, from_where);
        let mut probe = AliasProbe::new(&original);
        if fetch.total {
            let alias = probe.column("count");
            outer.push(format!("count(*) {}", alias));
            count_alias = Some(alias);
        }
        for field in &fetch.summary_fields {
            let column = summary_column(metadata, field)?;
            let alias = probe.column(field);
            outer.push(format!("sum({}) {}", column, alias));
            summary_aliases.push(alias);
        }
        let table_alias = probe.table();
        return Ok(Cluster {
            sql: format!("select {} from ({}) {}", outer.join(", "), original, table_alias),
            count_alias,
            summary_aliases,
        });
    }

    let mut probe = AliasProbe::new(from_where);
    if fetch.total {
        let alias = probe.column("count");
        outer.push(format!("count(*) {}", alias));
        count_alias = Some(alias);
    }

    if metadata.group_by().is_none() {
        for field in &fetch.summary_fields {
            let column = summary_column(metadata, field)?;
            let alias = probe.column(field);
            outer.push(format!("sum({}) {}", column, alias));
            summary_aliases.push(alias);
        }
        return Ok(Cluster {
            sql: format!("select {}{}", outer.join(", "), from_where),
            count_alias,
            summary_aliases,
        });
    }

    let mut inner = Vec::new();
    for field in &fetch.summary_fields {
        let column = summary_column(metadata, field)?;
        let alias = probe.column(field);
        inner.push(format!("sum({}) {}", column, alias));
        outer.push(format!("sum({}) {}", alias, alias));
        summary_aliases.push(alias);
    }
    if inner.is_empty() {
        if let Some(alias) = &count_alias {
            inner.push(format!("count(*) {}", alias));
        }
    }
    let table_alias = probe.table();
    Ok(Cluster {
        sql: format!(
            "select {} from (select {}{}) {}",
            outer.join(", "),
            inner.join(", "),
            from_where,
            table_alias
        ),
        count_alias,
        summary_aliases,
    })
}
