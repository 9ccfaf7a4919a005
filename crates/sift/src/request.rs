//! JSON request definitions.
//!
//! A request file pairs an entity definition with one search:
//!
//! ```json
//! {
//!   "entity": {
//!     "table": "users u",
//!     "fields": [
//!       { "name": "id", "type": "long", "select": "u.id" },
//!       { "name": "name", "select": "u.name" }
//!     ]
//!   },
//!   "search": {
//!     "fetch": { "list": true, "total": true },
//!     "filters": [{ "field": "name", "op": "sw", "values": ["jo"], "ignore_case": true }],
//!     "order": "-id",
//!     "page": 0,
//!     "size": 20
//!   }
//! }
//! ```

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use sift_sql::{
    FetchType, FieldMeta, FieldParam, FieldType, Metadata, Operator, OrderParam, Pagination,
    SearchParam, SearchResult, SqlValue,
};

/// A complete request file.
#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    /// The entity searched.
    pub entity: EntityDef,
    /// The search to resolve.
    #[serde(default)]
    pub search: SearchDef,
}

/// Entity metadata as written in a request file.
#[derive(Debug, Clone, Deserialize)]
pub struct EntityDef {
    /// Table reference snippet.
    pub table: String,
    /// Fields in select order.
    #[serde(default)]
    pub fields: Vec<FieldDef>,
    /// Join condition snippet.
    #[serde(default)]
    pub join_cond: Option<String>,
    /// Group-by snippet.
    #[serde(default)]
    pub group_by: Option<String>,
    /// Select distinct rows.
    #[serde(default)]
    pub distinct: bool,
}

/// One field of an entity.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldDef {
    /// Field name.
    pub name: String,
    /// Column alias; the field name when absent.
    #[serde(default)]
    pub alias: Option<String>,
    /// Value type.
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    /// Select expression; the field is not selected when absent.
    #[serde(default)]
    pub select: Option<String>,
    /// Database column for filters and sums, when it differs from `select`.
    #[serde(default)]
    pub column: Option<String>,
}

/// Fetch directives of a search.
#[derive(Debug, Clone, Deserialize)]
pub struct FetchDef {
    /// Fetch the list.
    #[serde(default = "default_true")]
    pub list: bool,
    /// Fetch the total count.
    #[serde(default)]
    pub total: bool,
    /// Fields to sum.
    #[serde(default)]
    pub summary: Vec<String>,
}

impl Default for FetchDef {
    fn default() -> Self {
        Self {
            list: true,
            total: false,
            summary: Vec::new(),
        }
    }
}

/// One filter of a search.
#[derive(Debug, Clone, Deserialize)]
pub struct FilterDef {
    /// Field filtered.
    pub field: String,
    /// Operator code or name; `eq` when absent.
    #[serde(default = "default_operator")]
    pub op: String,
    /// Operator values.
    #[serde(default)]
    pub values: Vec<SqlValue>,
    /// Compare case-insensitively.
    #[serde(default)]
    pub ignore_case: bool,
}

/// A search as written in a request file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchDef {
    /// What to fetch.
    #[serde(default)]
    pub fetch: FetchDef,
    /// Filters, in order.
    #[serde(default)]
    pub filters: Vec<FilterDef>,
    /// Sort field, `-` prefixed for descending.
    #[serde(default)]
    pub order: Option<String>,
    /// Page number, or offset for offset pagination.
    #[serde(default)]
    pub page: Option<u64>,
    /// Page size.
    #[serde(default)]
    pub size: Option<u64>,
    /// Values of parameters embedded in entity snippets.
    #[serde(default)]
    pub params: HashMap<String, SqlValue>,
}

fn default_true() -> bool {
    true
}

fn default_operator() -> String {
    Operator::Equal.code().to_string()
}

impl FieldDef {
    fn to_field_meta(&self) -> FieldMeta {
        let meta = match (&self.select, &self.column) {
            (Some(select), Some(column)) => {
                FieldMeta::select(select, self.field_type).with_column(column.as_str())
            }
            (Some(select), None) => FieldMeta::select(select, self.field_type),
            (None, Some(column)) => FieldMeta::column(column, self.field_type),
            (None, None) => FieldMeta::unmapped(self.field_type),
        };
        match &self.alias {
            Some(alias) => meta.with_alias(alias.as_str()),
            None => meta,
        }
    }
}

impl EntityDef {
    /// Builds validated metadata.
    pub fn to_metadata(&self) -> SearchResult<Metadata> {
        let mut builder = Metadata::builder(&self.table).distinct(self.distinct);
        for field in &self.fields {
            builder = builder.field(field.name.as_str(), field.to_field_meta());
        }
        if let Some(join_cond) = &self.join_cond {
            builder = builder.join_cond(join_cond);
        }
        if let Some(group_by) = &self.group_by {
            builder = builder.group_by(group_by);
        }
        builder.build()
    }
}

impl SearchDef {
    /// Builds the search parameters, paging with `pagination`.
    pub fn to_search_param(&self, pagination: &Pagination) -> SearchResult<SearchParam> {
        let fetch = FetchType {
            list: self.fetch.list,
            total: self.fetch.total,
            summary_fields: self.fetch.summary.clone(),
        };
        let mut param = SearchParam::new(fetch).with_page(pagination.page(self.page, self.size));
        for filter in &self.filters {
            let operator: Operator = filter.op.parse()?;
            param = param.with_field_param(
                FieldParam::new(filter.field.as_str(), operator, filter.values.clone())
                    .ignore_case(filter.ignore_case),
            );
        }
        if let Some(order) = &self.order {
            param = param.with_order(OrderParam::parse(order));
        }
        for (name, value) in &self.params {
            param = param.with_embed_param(name.as_str(), value.clone());
        }
        Ok(param)
    }
}

/// Loads a request from `path`, or from stdin when `path` is `-`.
pub fn load(path: &str) -> anyhow::Result<Request> {
    let text = if path == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read request from stdin")?;
        text
    } else {
        std::fs::read_to_string(Path::new(path))
            .with_context(|| format!("Failed to read request file {}", path))?
    };
    serde_json::from_str(&text).with_context(|| format!("Invalid request JSON in {}", path))
}
