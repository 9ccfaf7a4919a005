//! Search metadata for one entity.
//!
//! [`Metadata`] describes how an entity maps onto SQL: which fields exist,
//! what each is selected as and aliased to, the table reference, and the
//! optional join condition, group-by clause and distinct flag. It is built once
//! with [`MetadataBuilder`] and then shared read-only across resolutions.
//!
//! # Example
//!
//! ```
//! use sift_sql::metadata::{FieldMeta, FieldType, Metadata};
//!
//! let metadata = Metadata::builder("t")
//!     .field("id", FieldMeta::select("t.id", FieldType::Long))
//!     .field("name", FieldMeta::select("t.name", FieldType::Text))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(metadata.field_names(), ["id", "name"]);
//! assert_eq!(metadata.alias("name"), Some("name"));
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{SearchError, SearchResult};
use crate::snippet::SqlSnippet;

/// The value type of an entity field.
///
/// Serialised by its display name and deserialised through [`FromStr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FieldType {
    /// Character data.
    #[default]
    Text,
    /// 32-bit integer.
    Integer,
    /// 64-bit integer.
    Long,
    /// Single precision float.
    Float,
    /// Double precision float.
    Double,
    /// Exact decimal.
    Decimal,
    /// Boolean.
    Bool,
    /// Calendar date.
    Date,
    /// Date and time.
    DateTime,
    /// Time of day.
    Time,
}

impl FieldType {
    /// Returns true for date and time types, whose filter values go through
    /// value correction.
    pub fn is_temporal(&self) -> bool {
        matches!(self, FieldType::Date | FieldType::DateTime | FieldType::Time)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Text => write!(f, "text"),
            FieldType::Integer => write!(f, "integer"),
            FieldType::Long => write!(f, "long"),
            FieldType::Float => write!(f, "float"),
            FieldType::Double => write!(f, "double"),
            FieldType::Decimal => write!(f, "decimal"),
            FieldType::Bool => write!(f, "bool"),
            FieldType::Date => write!(f, "date"),
            FieldType::DateTime => write!(f, "datetime"),
            FieldType::Time => write!(f, "time"),
        }
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "string" => Ok(FieldType::Text),
            "integer" | "int" => Ok(FieldType::Integer),
            "long" => Ok(FieldType::Long),
            "float" => Ok(FieldType::Float),
            "double" => Ok(FieldType::Double),
            "decimal" => Ok(FieldType::Decimal),
            "bool" | "boolean" => Ok(FieldType::Bool),
            "date" => Ok(FieldType::Date),
            "datetime" | "timestamp" => Ok(FieldType::DateTime),
            "time" => Ok(FieldType::Time),
            _ => Err(format!("unknown field type: {}", s)),
        }
    }
}

impl TryFrom<String> for FieldType {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<FieldType> for String {
    fn from(field_type: FieldType) -> Self {
        field_type.to_string()
    }
}

/// Mapping of a single field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMeta {
    field_type: FieldType,
    alias: Option<String>,
    select: Option<SqlSnippet>,
    column: Option<String>,
}

impl FieldMeta {
    /// A selected field whose select expression is `sql`.
    ///
    /// The expression is parsed for embedded parameters. Without parameters it
    /// also serves as the field's database column for filters and sums; an
    /// expression with parameters needs an explicit [`FieldMeta::with_column`].
    pub fn select(sql: &str, field_type: FieldType) -> Self {
        let select = SqlSnippet::parse(sql);
        let column = select.params().is_empty().then(|| sql.to_string());
        Self {
            field_type,
            alias: None,
            select: Some(select),
            column,
        }
    }

    /// A field that is not selected but may still be filtered or summed on
    /// through `column`.
    pub fn column(column: &str, field_type: FieldType) -> Self {
        Self {
            field_type,
            alias: None,
            select: None,
            column: Some(column.to_string()),
        }
    }

    /// A field with neither a select expression nor a column.
    pub fn unmapped(field_type: FieldType) -> Self {
        Self {
            field_type,
            alias: None,
            select: None,
            column: None,
        }
    }

    /// Overrides the alias, which otherwise defaults to the field name.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Overrides the database column used by filters and sums.
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }
}

/// Immutable description of how one entity is searched.
#[derive(Debug, Clone)]
pub struct Metadata {
    fields: Vec<String>,
    aliases: HashMap<String, String>,
    types: HashMap<String, FieldType>,
    selects: HashMap<String, SqlSnippet>,
    columns: HashMap<String, String>,
    table: SqlSnippet,
    join_cond: Option<SqlSnippet>,
    group_by: Option<SqlSnippet>,
    distinct: bool,
}

impl Metadata {
    /// Starts building metadata over the table snippet `table`.
    pub fn builder(table: &str) -> MetadataBuilder {
        MetadataBuilder::new(table)
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> &[String] {
        &self.fields
    }

    /// The configured alias of `field`.
    pub fn alias(&self, field: &str) -> Option<&str> {
        self.aliases.get(field).map(String::as_str)
    }

    /// The value type of `field`.
    pub fn field_type(&self, field: &str) -> Option<FieldType> {
        self.types.get(field).copied()
    }

    /// The select expression of `field`, if it is selected.
    pub fn select_snippet(&self, field: &str) -> Option<&SqlSnippet> {
        self.selects.get(field)
    }

    /// The database column of `field`.
    pub fn column(&self, field: &str) -> Option<&str> {
        self.columns.get(field).map(String::as_str)
    }

    /// The table reference snippet.
    pub fn table(&self) -> &SqlSnippet {
        &self.table
    }

    /// The join condition, if any.
    pub fn join_cond(&self) -> Option<&SqlSnippet> {
        self.join_cond.as_ref()
    }

    /// The group-by clause, if any.
    pub fn group_by(&self) -> Option<&SqlSnippet> {
        self.group_by.as_ref()
    }

    /// Whether the list query selects distinct rows.
    pub fn is_distinct(&self) -> bool {
        self.distinct
    }
}

/// Builder for [`Metadata`].
#[derive(Debug, Clone)]
pub struct MetadataBuilder {
    table: String,
    fields: Vec<(String, FieldMeta)>,
    join_cond: Option<String>,
    group_by: Option<String>,
    distinct: bool,
}

impl MetadataBuilder {
    /// Creates a builder over the table snippet `table`.
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            fields: Vec::new(),
            join_cond: None,
            group_by: None,
            distinct: false,
        }
    }

    /// Appends a field. Field order is select order.
    pub fn field(mut self, name: impl Into<String>, meta: FieldMeta) -> Self {
        self.fields.push((name.into(), meta));
        self
    }

    /// Sets the join condition; blank text means no join condition.
    pub fn join_cond(mut self, cond: &str) -> Self {
        self.join_cond = Some(cond.to_string());
        self
    }

    /// Sets the group-by clause; blank text means no grouping.
    pub fn group_by(mut self, group_by: &str) -> Self {
        self.group_by = Some(group_by.to_string());
        self
    }

    /// Sets the distinct flag.
    pub fn distinct(mut self, distinct: bool) -> Self {
        self.distinct = distinct;
        self
    }

    /// Validates and builds the metadata.
    ///
    /// Fails when the table is blank, a field name repeats, or two fields share
    /// an alias.
    pub fn build(self) -> SearchResult<Metadata> {
        let table = SqlSnippet::parse(&self.table);
        if table.is_blank() {
            return Err(SearchError::invalid_metadata("table snippet is blank"));
        }

        let mut fields = Vec::with_capacity(self.fields.len());
        let mut aliases = HashMap::new();
        let mut types = HashMap::new();
        let mut selects = HashMap::new();
        let mut columns = HashMap::new();
        let mut seen_aliases = HashSet::new();

        for (name, meta) in self.fields {
            if types.contains_key(&name) {
                return Err(SearchError::invalid_metadata(format!(
                    "field '{}' is declared twice",
                    name
                )));
            }
            let alias = meta.alias.unwrap_or_else(|| name.clone());
            if !seen_aliases.insert(alias.clone()) {
                return Err(SearchError::invalid_metadata(format!(
                    "alias '{}' of field '{}' is already used",
                    alias, name
                )));
            }
            aliases.insert(name.clone(), alias);
            types.insert(name.clone(), meta.field_type);
            if let Some(select) = meta.select {
                selects.insert(name.clone(), select);
            }
            if let Some(column) = meta.column {
                columns.insert(name.clone(), column);
            }
            fields.push(name);
        }

        Ok(Metadata {
            fields,
            aliases,
            types,
            selects,
            columns,
            table,
            join_cond: parse_optional(self.join_cond),
            group_by: parse_optional(self.group_by),
            distinct: self.distinct,
        })
    }
}

fn parse_optional(text: Option<String>) -> Option<SqlSnippet> {
    text.map(|t| SqlSnippet::parse(&t)).filter(|s| !s.is_blank())
}
